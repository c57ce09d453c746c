/*!
 * Catalog entity models and DTOs.
 *
 * These structures are built from rows of the question store and serialize
 * directly into the JSON shapes served by the HTTP API.
 */

use serde::{Deserialize, Serialize};

use crate::errors::FilterError;

/// Default page number when none is requested
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when none is requested
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest accepted page size
pub const MAX_LIMIT: u32 = 100;

/// Display label plus filterable slug, used for disciplines and languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    /// Human-readable label (e.g. "Matemática e suas Tecnologias")
    pub label: String,
    /// Stable slug used for filtering (e.g. "matematica")
    pub value: String,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Build from a pair of nullable joined columns
    ///
    /// Returns `None` when the left join found no row, which shows up as a
    /// missing label or value.
    pub fn from_columns(label: Option<String>, value: Option<String>) -> Option<Self> {
        match (label, value) {
            (Some(label), Some(value)) => Some(Self { label, value }),
            _ => None,
        }
    }
}

/// One answer option of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    /// Option letter, unique within a question
    pub letter: String,
    /// Option text
    pub text: String,
    /// Image shown instead of or alongside the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Whether this is the right answer
    pub is_correct: bool,
}

/// A fully hydrated exam question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub title: String,
    /// Ordinal of the question within its exam year
    pub index: i64,
    pub year: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives_introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_alternative: Option<String>,
    pub discipline: Option<LabeledValue>,
    pub language: Option<LabeledValue>,
    pub alternatives: Vec<Alternative>,
    pub files: Vec<String>,
}

impl Question {
    /// The alternative flagged as correct, if any
    pub fn correct_option(&self) -> Option<&Alternative> {
        self.alternatives.iter().find(|alt| alt.is_correct)
    }
}

/// Paginated envelope returned by question listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPage {
    pub data: Vec<Question>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

/// Equality filters applied to question queries; absent fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub year: Option<i64>,
    pub discipline: Option<String>,
    pub language: Option<String>,
}

impl QuestionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_discipline(mut self, discipline: impl Into<String>) -> Self {
        self.discipline = Some(discipline.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// True when no field restricts the result set
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.discipline.is_none() && self.language.is_none()
    }
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Validate a page request: `page >= 1` and `1 <= limit <= MAX_LIMIT`
    pub fn new(page: i64, limit: i64) -> Result<Self, FilterError> {
        if page < 1 {
            return Err(FilterError::PageOutOfRange(page));
        }
        if page > i64::from(u32::MAX) {
            return Err(FilterError::PageTooLarge(page));
        }
        if limit < 1 || limit > MAX_LIMIT as i64 {
            return Err(FilterError::LimitOutOfRange {
                value: limit,
                max: MAX_LIMIT,
            });
        }

        Ok(Self {
            page: page as u32,
            limit: limit as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip before this page starts
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Number of pages needed for `total` rows
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let limit = self.limit as i64;
        (total + limit - 1) / limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}
