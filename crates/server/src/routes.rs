use std::sync::Arc;

use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::{BookRepository, BookService, SeaOrmBookRepository};

use crate::openapi::ApiDoc;

pub mod books;

/// Shared handler state. The repository is injected, so tests can swap in the in-memory one.
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<BookService<dyn BookRepository>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn BookRepository>) -> Self {
        Self { books: Arc::new(BookService::new(repo)) }
    }

    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmBookRepository::new(db)))
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, OpenAPI document and the book endpoints.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let books = Router::new()
        .route("/book", get(books::list).post(books::create))
        .route("/book/:id", get(books::get).put(books::update).delete(books::delete))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(books)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx 以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
