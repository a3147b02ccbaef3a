use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use minijinja::context;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::AppError;
use crate::page::PageContext;
use crate::state::AppState;

pub mod blog;
pub mod categories;
pub mod posts;

/// Router settings that come from configuration rather than state.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    pub static_dir: String,
    pub max_upload_bytes: usize,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn about(State(state): State<AppState>, page: PageContext) -> Result<Html<String>, AppError> {
    state.views.render("about.html", context! { page => page })
}

async fn not_found(State(state): State<AppState>, page: PageContext) -> Result<(StatusCode, Html<String>), AppError> {
    let html = state.views.render("404.html", context! { page => page })?;
    Ok((StatusCode::NOT_FOUND, html))
}

/// Build the application router: pages, form handlers, static assets and health.
pub fn build_router(state: AppState, cfg: RouterConfig) -> Router {
    let pages = Router::new()
        .route("/", get(|| async { Redirect::to("/blog") }))
        .route("/about", get(about))
        .route("/blog", get(blog::index))
        .route("/blog/:id", get(blog::show));

    let posts = Router::new()
        .route("/posts", get(posts::list))
        .route("/posts/add", get(posts::add_form).post(posts::add))
        .route("/posts/delete/:id", get(posts::delete))
        .layer(DefaultBodyLimit::max(cfg.max_upload_bytes));

    let categories = Router::new()
        .route("/categories", get(categories::list))
        .route("/categories/add", get(categories::add_form).post(categories::add))
        .route("/categories/delete/:id", get(categories::delete));

    pages
        .merge(posts)
        .merge(categories)
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(&cfg.static_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
