use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use minijinja::context;
use tracing::{error, warn};

use service::blog::input::{parse_id, CategoryInput};

use crate::errors::AppError;
use crate::page::PageContext;
use crate::routes::blog::NO_RESULTS;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, page: PageContext) -> Result<Html<String>, AppError> {
    let categories = match state.blog.repo().get_categories().await {
        Ok(list) => list,
        Err(e) => {
            warn!(error = %e, event = "categories_unavailable", "listing categories failed");
            Vec::new()
        }
    };
    let message = categories.is_empty().then_some(NO_RESULTS);
    state.views.render(
        "categories.html",
        context! { page => page, categories => categories, message => message },
    )
}

pub async fn add_form(State(state): State<AppState>, page: PageContext) -> Result<Html<String>, AppError> {
    state.views.render("add_category.html", context! { page => page })
}

pub async fn add(State(state): State<AppState>, Form(input): Form<CategoryInput>) -> Result<Redirect, AppError> {
    state.blog.repo().add_category(input).await.map_err(|e| {
        error!(error = %e, event = "category_create_failed", "creating category failed");
        AppError::internal("Unable to add category")
    })?;
    Ok(Redirect::to("/categories"))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect, AppError> {
    let repo = state.blog.repo();
    let res = match parse_id(&id) {
        Ok(id) => repo.delete_category_by_id(id).await,
        Err(e) => Err(e),
    };
    res.map_err(|e| {
        error!(error = %e, category_id = %id, event = "category_delete_failed", "removing category failed");
        AppError::internal("Unable to remove category")
    })?;
    Ok(Redirect::to("/categories"))
}
