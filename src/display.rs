/*!
 * Plain-text rendering of questions for the command line.
 */

use std::fmt;

use crate::database::models::Question;

const RULE_WIDTH: usize = 60;

/// Framed plain-text view of a question: header, context, alternatives, answer, files
pub struct QuestionView<'a>(pub &'a Question);

impl fmt::Display for QuestionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let question = self.0;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "{}", question.title)?;
        writeln!(f, "Year: {} | Question: {}", question.year, question.index)?;

        if let Some(discipline) = &question.discipline {
            writeln!(f, "Discipline: {}", discipline.label)?;
        }
        if let Some(language) = &question.language {
            writeln!(f, "Language: {}", language.label)?;
        }

        if let Some(context) = &question.context {
            writeln!(f, "\nContext:\n{}", context)?;
        }
        if let Some(introduction) = &question.alternatives_introduction {
            writeln!(f, "\n{}", introduction)?;
        }

        if !question.alternatives.is_empty() {
            writeln!(f, "\nAlternatives:")?;
            for alt in &question.alternatives {
                let marker = if alt.is_correct { "*" } else { " " };
                write!(f, "{} {}) {}", marker, alt.letter, alt.text)?;
                if let Some(path) = &alt.file_path {
                    write!(f, " [{}]", path)?;
                }
                writeln!(f)?;
            }
        }

        if let Some(answer) = &question.correct_alternative {
            writeln!(f, "\nCorrect answer: {}", answer)?;
        }

        if !question.files.is_empty() {
            writeln!(f, "\nFiles: {}", question.files.join(", "))?;
        }

        writeln!(f, "{}", rule)
    }
}
