/*!
 * SQL construction for question lookups.
 *
 * A `QuestionQuery` turns a `QuestionFilter` into a conjunction of equality
 * predicates over the joined question/discipline/language tables, and
 * renders the count, page, export and random-pick statements that share
 * those predicates. Values are always bound as parameters.
 */

use rusqlite::types::Value;

use super::models::{Pagination, QuestionFilter};

/// Columns read for every question row, in the order `repository` maps them
pub const QUESTION_COLUMNS: &str = "q.id, q.title, q.index_number, q.year, q.context, \
     q.alternatives_introduction, q.correct_alternative, \
     d.label, d.value, l.label, l.value";

/// Questions left-joined with their optional discipline and language
pub const JOINED_TABLES: &str = "FROM questions q \
     LEFT JOIN disciplines d ON q.discipline_id = d.id \
     LEFT JOIN languages l ON q.language_id = l.id";

/// Fixed listing order; `q.id` breaks ties between same-index questions
pub const LISTING_ORDER: &str = "ORDER BY q.year DESC, q.index_number ASC, q.id ASC";

/// Filter predicates plus their bound values
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    conditions: Vec<&'static str>,
    params: Vec<Value>,
}

impl QuestionQuery {
    /// Build the predicate set for the present filter fields
    pub fn from_filter(filter: &QuestionFilter) -> Self {
        let mut query = Self::default();

        if let Some(year) = filter.year {
            query.push("q.year = ?", Value::Integer(year));
        }
        if let Some(discipline) = &filter.discipline {
            query.push("d.value = ?", Value::Text(discipline.clone()));
        }
        if let Some(language) = &filter.language {
            query.push("l.value = ?", Value::Text(language.clone()));
        }

        query
    }

    fn push(&mut self, condition: &'static str, value: Value) {
        self.conditions.push(condition);
        self.params.push(value);
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Values bound by the filter predicates, in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// `SELECT COUNT(*)` over the filtered join
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) {}{}", JOINED_TABLES, self.where_clause())
    }

    /// One page of question rows; binds `params()` followed by limit and offset
    pub fn page_sql(&self) -> String {
        format!(
            "SELECT {} {}{} {} LIMIT ? OFFSET ?",
            QUESTION_COLUMNS,
            JOINED_TABLES,
            self.where_clause(),
            LISTING_ORDER
        )
    }

    /// Filter values followed by the page window
    pub fn page_params(&self, pagination: &Pagination) -> Vec<Value> {
        let mut params = self.params.clone();
        params.push(Value::Integer(pagination.limit() as i64));
        params.push(Value::Integer(pagination.offset()));
        params
    }

    /// Every matching question row in listing order
    pub fn select_all_sql(&self) -> String {
        format!(
            "SELECT {} {}{} {}",
            QUESTION_COLUMNS,
            JOINED_TABLES,
            self.where_clause(),
            LISTING_ORDER
        )
    }

    /// The id of the n-th matching question by id; binds `params()` then the offset
    pub fn id_at_offset_sql(&self) -> String {
        format!(
            "SELECT q.id {}{} ORDER BY q.id LIMIT 1 OFFSET ?",
            JOINED_TABLES,
            self.where_clause()
        )
    }
}

/// Single question row by primary key
pub fn question_by_id_sql() -> String {
    format!("SELECT {} {} WHERE q.id = ?1", QUESTION_COLUMNS, JOINED_TABLES)
}
