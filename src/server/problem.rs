use axum::http::StatusCode;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use log::error;
use serde::Serialize;
use serde::ser::SerializeMap;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::errors::ApiError;

/// Problem-details error body: `{"status": 404, "title": "...", "detail": "..."}`
#[derive(Debug)]
pub struct ProblemDetails {
    status: StatusCode,
    details: BTreeMap<Cow<'static, str>, String>,
}

impl Serialize for ProblemDetails {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.details.len() + 1))?;
        map.serialize_entry("status", &self.status.as_u16())?;
        for (k, v) in &self.details {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl ProblemDetails {
    /// Problem with the canonical reason phrase as title
    pub fn new(status: StatusCode) -> Self {
        let problem = Self {
            status,
            details: BTreeMap::new(),
        };
        match status.canonical_reason() {
            Some(reason) => problem.with_title(reason),
            None => problem,
        }
    }

    pub fn with_title(mut self, value: &str) -> Self {
        self.details.insert(Cow::Borrowed("title"), value.to_string());
        self
    }

    pub fn with_detail(mut self, value: &str) -> Self {
        self.details.insert(Cow::Borrowed("detail"), value.to_string());
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl ApiError {
    /// HTTP status for this error class
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Problem body; storage failures carry no internal detail
    pub fn to_problem(&self) -> ProblemDetails {
        let problem = ProblemDetails::new(self.status_code());
        match self {
            ApiError::InvalidInput(err) => problem.with_detail(&err.to_string()),
            ApiError::NotFound(message) => problem.with_detail(message),
            ApiError::Storage(_) => problem.with_detail("The question store could not be queried"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(err) = &self {
            error!("Storage failure: {:#}", err);
        }
        self.to_problem().into_response()
    }
}
