use axum::{
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::Json,
};
use log::debug;
use std::sync::Arc;

use crate::database::models::{LabeledValue, Question, QuestionPage};
use crate::errors::{ApiError, FilterError};
use crate::server::params::{FilterParams, FilterQuery, parse_question_id};
use crate::store::QuestionStore;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }
}

type FilterQueryResult = Result<Query<FilterQuery>, QueryRejection>;

fn filter_params(query: FilterQueryResult) -> Result<FilterParams, ApiError> {
    let Query(raw) = query.map_err(|rejection| FilterError::InvalidQuery(rejection.body_text()))?;
    Ok(raw.into_params()?)
}

/// `GET /questions`
pub async fn list_questions(
    State(state): State<AppState>,
    query: FilterQueryResult,
) -> Result<Json<QuestionPage>, ApiError> {
    let params = filter_params(query)?;
    debug!(
        "GET /questions filter={:?} page={} limit={}",
        params.filter,
        params.pagination.page(),
        params.pagination.limit()
    );

    let page = state
        .store
        .list_questions(&params.filter, params.pagination)
        .await?;

    Ok(Json(page))
}

/// `GET /questions/random`
///
/// Accepts the same parameters as the listing; paging values are validated
/// but play no part in the draw.
pub async fn random_question(
    State(state): State<AppState>,
    query: FilterQueryResult,
) -> Result<Json<Question>, ApiError> {
    let params = filter_params(query)?;
    debug!("GET /questions/random filter={:?}", params.filter);

    state
        .store
        .get_random_question(&params.filter)
        .await?
        .map(Json)
        .ok_or_else(ApiError::no_matching_question)
}

/// `GET /questions/{id}`
pub async fn get_question(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Question>, ApiError> {
    let Path(raw_id) = path.map_err(|rejection| FilterError::InvalidId(rejection.body_text()))?;
    let id = parse_question_id(&raw_id)?;
    debug!("GET /questions/{}", id);

    state
        .store
        .get_question_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::question_not_found(id))
}

/// `GET /years`
pub async fn list_years(State(state): State<AppState>) -> Result<Json<Vec<i64>>, ApiError> {
    Ok(Json(state.store.list_years().await?))
}

/// `GET /disciplines`
pub async fn list_disciplines(
    State(state): State<AppState>,
) -> Result<Json<Vec<LabeledValue>>, ApiError> {
    Ok(Json(state.store.list_disciplines().await?))
}

/// `GET /languages`
pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<LabeledValue>>, ApiError> {
    Ok(Json(state.store.list_languages().await?))
}
