/*!
 * Read interface over the question catalog.
 *
 * HTTP handlers and CLI commands depend on this trait rather than on the
 * SQLite repository, so tests can substitute an in-process double.
 */

use anyhow::Result;
use async_trait::async_trait;

use crate::database::models::{LabeledValue, Pagination, Question, QuestionFilter, QuestionPage};

/// Common trait for question catalog backends
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// One page of hydrated questions matching `filter`, plus the total match count
    async fn list_questions(
        &self,
        filter: &QuestionFilter,
        pagination: Pagination,
    ) -> Result<QuestionPage>;

    /// Hydrated question by id; `None` when no row matches
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;

    /// Uniformly chosen question among those matching `filter`; `None` when none match
    async fn get_random_question(&self, filter: &QuestionFilter) -> Result<Option<Question>>;

    /// Every distinct exam year, newest first
    async fn list_years(&self) -> Result<Vec<i64>>;

    /// All disciplines ordered by label
    async fn list_disciplines(&self) -> Result<Vec<LabeledValue>>;

    /// All languages ordered by label
    async fn list_languages(&self) -> Result<Vec<LabeledValue>>;

    /// Every hydrated question matching `filter`, in listing order
    async fn export_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>>;
}
