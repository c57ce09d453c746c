/*!
 * Repository layer for catalog queries.
 *
 * This module provides a high-level API over the question store,
 * abstracting away the SQL details and hydrating question rows with their
 * alternatives and files.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use rand::Rng;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use std::path::Path;

use super::connection::DatabaseConnection;
use super::models::{
    Alternative, LabeledValue, Pagination, Question, QuestionFilter, QuestionPage,
};
use super::query::{QuestionQuery, question_by_id_sql};
use crate::store::QuestionStore;

/// Question row before hydration
struct QuestionRow {
    id: i64,
    title: String,
    index: i64,
    year: i64,
    context: Option<String>,
    alternatives_introduction: Option<String>,
    correct_alternative: Option<String>,
    discipline: Option<LabeledValue>,
    language: Option<LabeledValue>,
}

/// Repository for catalog queries
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open the question store at `path` read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = DatabaseConnection::open(path)?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection handle
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Question Operations
    // =========================================================================

    /// List one page of questions matching the filter
    pub async fn list_questions(
        &self,
        filter: &QuestionFilter,
        pagination: Pagination,
    ) -> Result<QuestionPage> {
        let filter = filter.clone();

        self.db
            .execute_async(move |conn| Self::list_questions_sync(conn, &filter, pagination))
            .await
    }

    fn list_questions_sync(
        conn: &Connection,
        filter: &QuestionFilter,
        pagination: Pagination,
    ) -> Result<QuestionPage> {
        let query = QuestionQuery::from_filter(filter);
        let total = Self::count_sync(conn, &query)?;

        let rows = Self::query_rows(conn, &query.page_sql(), &query.page_params(&pagination))?;
        debug!(
            "Listing page {} (limit {}) of {} matching questions",
            pagination.page(),
            pagination.limit(),
            total
        );

        let data = rows
            .into_iter()
            .map(|row| Self::hydrate(conn, row))
            .collect::<Result<Vec<_>>>()?;

        Ok(QuestionPage {
            data,
            total,
            page: pagination.page(),
            limit: pagination.limit(),
            total_pages: pagination.total_pages(total),
        })
    }

    /// Get a question by ID
    pub async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.db
            .execute_async(move |conn| Self::get_question_sync(conn, id))
            .await
    }

    /// Get a question by ID (synchronous version for reuse inside other lookups)
    fn get_question_sync(conn: &Connection, id: i64) -> Result<Option<Question>> {
        let row = conn
            .query_row(&question_by_id_sql(), [id], Self::map_question_row)
            .optional()
            .with_context(|| format!("Failed to load question {}", id))?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(conn, row)?)),
            None => Ok(None),
        }
    }

    /// Pick one matching question uniformly at random
    pub async fn get_random_question(&self, filter: &QuestionFilter) -> Result<Option<Question>> {
        let filter = filter.clone();

        self.db
            .execute_async(move |conn| Self::random_question_sync(conn, &filter))
            .await
    }

    fn random_question_sync(conn: &Connection, filter: &QuestionFilter) -> Result<Option<Question>> {
        let query = QuestionQuery::from_filter(filter);
        let count = Self::count_sync(conn, &query)?;

        if count == 0 {
            debug!("Random draw found no matching questions");
            return Ok(None);
        }

        let offset = rand::rng().random_range(0..count);
        let mut params = query.params().to_vec();
        params.push(Value::Integer(offset));

        let id: Option<i64> = conn
            .query_row(&query.id_at_offset_sql(), params_from_iter(params.iter()), |row| {
                row.get(0)
            })
            .optional()
            .context("Failed to pick a random question")?;

        debug!("Random draw picked offset {} of {}: {:?}", offset, count, id);

        match id {
            Some(id) => Self::get_question_sync(conn, id),
            None => Ok(None),
        }
    }

    /// All matching questions, fully hydrated and in listing order
    pub async fn export_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>> {
        let filter = filter.clone();

        self.db
            .execute_async(move |conn| {
                let query = QuestionQuery::from_filter(&filter);
                let rows = Self::query_rows(conn, &query.select_all_sql(), query.params())?;

                rows.into_iter()
                    .map(|row| Self::hydrate(conn, row))
                    .collect::<Result<Vec<_>>>()
            })
            .await
    }

    fn count_sync(conn: &Connection, query: &QuestionQuery) -> Result<i64> {
        let total = conn
            .query_row(&query.count_sql(), params_from_iter(query.params().iter()), |row| {
                row.get(0)
            })
            .context("Failed to count questions")?;

        Ok(total)
    }

    fn query_rows(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<QuestionRow>> {
        let mut stmt = conn.prepare(sql).context("Failed to prepare question query")?;

        let rows = stmt
            .query_map(params_from_iter(params.iter()), Self::map_question_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read question rows")?;

        Ok(rows)
    }

    fn map_question_row(row: &Row) -> rusqlite::Result<QuestionRow> {
        Ok(QuestionRow {
            id: row.get(0)?,
            title: row.get(1)?,
            index: row.get(2)?,
            year: row.get(3)?,
            context: non_empty(row.get(4)?),
            alternatives_introduction: non_empty(row.get(5)?),
            correct_alternative: non_empty(row.get(6)?),
            discipline: LabeledValue::from_columns(row.get(7)?, row.get(8)?),
            language: LabeledValue::from_columns(row.get(9)?, row.get(10)?),
        })
    }

    /// Attach alternatives and files to a question row
    fn hydrate(conn: &Connection, row: QuestionRow) -> Result<Question> {
        let alternatives = Self::alternatives_sync(conn, row.id)?;
        let files = Self::files_sync(conn, row.id)?;

        Ok(Question {
            id: row.id,
            title: row.title,
            index: row.index,
            year: row.year,
            context: row.context,
            alternatives_introduction: row.alternatives_introduction,
            correct_alternative: row.correct_alternative,
            discipline: row.discipline,
            language: row.language,
            alternatives,
            files,
        })
    }

    fn alternatives_sync(conn: &Connection, question_id: i64) -> Result<Vec<Alternative>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT letter, text, file_path, is_correct
            FROM alternatives
            WHERE question_id = ?1
            ORDER BY letter
            "#,
        )?;

        let alternatives = stmt
            .query_map([question_id], |row| {
                Ok(Alternative {
                    letter: row.get(0)?,
                    text: row.get(1)?,
                    file_path: non_empty(row.get(2)?),
                    is_correct: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to load alternatives of question {}", question_id))?;

        Ok(alternatives)
    }

    fn files_sync(conn: &Connection, question_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT file_path
            FROM question_files
            WHERE question_id = ?1
            ORDER BY id
            "#,
        )?;

        let files = stmt
            .query_map([question_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .with_context(|| format!("Failed to load files of question {}", question_id))?;

        Ok(files)
    }

    // =========================================================================
    // Catalog Enumerations
    // =========================================================================

    /// Every distinct exam year, newest first
    pub async fn list_years(&self) -> Result<Vec<i64>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare("SELECT DISTINCT year FROM questions ORDER BY year DESC")?;
                let years = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<i64>>>()
                    .context("Failed to list years")?;
                Ok(years)
            })
            .await
    }

    /// All disciplines, ordered by label
    pub async fn list_disciplines(&self) -> Result<Vec<LabeledValue>> {
        self.db
            .execute_async(|conn| Self::labeled_values_sync(conn, "disciplines"))
            .await
    }

    /// All languages, ordered by label
    pub async fn list_languages(&self) -> Result<Vec<LabeledValue>> {
        self.db
            .execute_async(|conn| Self::labeled_values_sync(conn, "languages"))
            .await
    }

    fn labeled_values_sync(conn: &Connection, table: &'static str) -> Result<Vec<LabeledValue>> {
        let sql = format!("SELECT DISTINCT label, value FROM {} ORDER BY label", table);
        let mut stmt = conn.prepare(&sql)?;

        let values = stmt
            .query_map([], |row| Ok(LabeledValue::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to list {}", table))?;

        Ok(values)
    }
}

/// The loader stores missing optional text as an empty string
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[async_trait]
impl QuestionStore for Repository {
    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        pagination: Pagination,
    ) -> Result<QuestionPage> {
        Repository::list_questions(self, filter, pagination).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        Repository::get_question_by_id(self, id).await
    }

    async fn get_random_question(&self, filter: &QuestionFilter) -> Result<Option<Question>> {
        Repository::get_random_question(self, filter).await
    }

    async fn list_years(&self) -> Result<Vec<i64>> {
        Repository::list_years(self).await
    }

    async fn list_disciplines(&self) -> Result<Vec<LabeledValue>> {
        Repository::list_disciplines(self).await
    }

    async fn list_languages(&self) -> Result<Vec<LabeledValue>> {
        Repository::list_languages(self).await
    }

    async fn export_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>> {
        Repository::export_questions(self, filter).await
    }
}
