use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    app_config::ServerConfig,
    server::handlers::{
        AppState, get_question, list_disciplines, list_languages, list_questions, list_years,
        random_question,
    },
    store::QuestionStore,
};

/// Public prefix of the static image directory
pub const IMAGES_PREFIX: &str = "/images";

/// Catalog routes, relative to the base path
pub fn api_router(store: Arc<dyn QuestionStore>) -> Router {
    Router::new()
        .route("/questions", get(list_questions))
        .route("/questions/random", get(random_question))
        .route("/questions/{id}", get(get_question))
        .route("/years", get(list_years))
        .route("/disciplines", get(list_disciplines))
        .route("/languages", get(list_languages))
        .with_state(AppState::new(store))
}

/// Full application router: catalog under the base path, images, CORS and request logging
pub fn create_router(config: &ServerConfig, store: Arc<dyn QuestionStore>) -> Router {
    let api = api_router(store);
    let router = if config.base_path.is_empty() {
        api
    } else {
        Router::new().nest(&config.base_path, api)
    };

    router
        .nest_service(IMAGES_PREFIX, ServeDir::new(&config.images_dir))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_requests))
                .layer(cors_layer(config)),
        )
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let permissive = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .allow_origin(Any);

    if config.allows_any_origin() {
        return permissive;
    }

    let origins: Result<Vec<HeaderValue>, _> = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse())
        .collect();

    match origins {
        Ok(origins) => CorsLayer::new()
            .allow_methods([Method::GET])
            .allow_headers(Any)
            .allow_origin(origins),
        Err(_) => {
            warn!("Invalid CORS origins, falling back to allow all");
            permissive
        }
    }
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );

    response
}
