/*!
 * Query and path parameter validation.
 *
 * The query string is deserialized into `FilterQuery`, which rejects
 * unknown and repeated names, then range-checked into a `QuestionFilter`
 * plus `Pagination`.
 */

use serde::{Deserialize, Deserializer, de};
use std::fmt::Display;
use std::str::FromStr;

use crate::database::models::{DEFAULT_LIMIT, DEFAULT_PAGE, Pagination, QuestionFilter};
use crate::errors::FilterError;

/// Raw query parameters accepted by the question endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub discipline: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

/// Trimmed value parsed into `T`; an empty value counts as absent
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid value '{}': {}", value, e))),
    }
}

/// Validated filter and page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub filter: QuestionFilter,
    pub pagination: Pagination,
}

impl FilterQuery {
    /// Apply range checks and defaults
    pub fn into_params(self) -> Result<FilterParams, FilterError> {
        if let Some(year) = self.year {
            if year < 1 {
                return Err(FilterError::YearOutOfRange(year));
            }
        }

        let pagination = Pagination::new(
            self.page.unwrap_or(i64::from(DEFAULT_PAGE)),
            self.limit.unwrap_or(i64::from(DEFAULT_LIMIT)),
        )?;

        Ok(FilterParams {
            filter: QuestionFilter {
                year: self.year,
                discipline: self.discipline,
                language: self.language,
            },
            pagination,
        })
    }
}

/// Parse the `{id}` path segment
pub fn parse_question_id(raw: &str) -> Result<i64, FilterError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FilterError::InvalidId(raw.to_string()))
}
