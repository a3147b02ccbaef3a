//! Public blog page: published posts, a featured post and category navigation.

use axum::{
    extract::{Path, State},
    response::Html,
};
use serde::Serialize;
use tracing::warn;

use models::{category, post};
use service::blog::input::parse_id;
use service::blog::repository::BlogRepository;
use service::blog_service::sort_newest_first;
use service::errors::ServiceError;

use crate::errors::AppError;
use crate::page::PageContext;
use crate::state::AppState;

pub const NO_RESULTS: &str = "no results";

#[derive(Serialize)]
struct BlogView {
    page: PageContext,
    post: Option<post::Model>,
    posts: Vec<post::Model>,
    message: Option<&'static str>,
    categories: Vec<category::Model>,
    categories_message: Option<&'static str>,
}

async fn published_posts(repo: &dyn BlogRepository, category: Option<&str>) -> Result<Vec<post::Model>, ServiceError> {
    let mut posts = match category {
        Some(raw) => repo.get_published_posts_by_category(parse_id(raw)?).await?,
        None => repo.get_published_posts().await?,
    };
    sort_newest_first(&mut posts);
    Ok(posts)
}

async fn published_post(repo: &dyn BlogRepository, raw_id: &str) -> Result<post::Model, ServiceError> {
    repo.get_post_by_id(parse_id(raw_id)?)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| ServiceError::not_found("post"))
}

/// Categories for the side navigation. Failures only blank this section.
pub(crate) async fn categories_or_empty(repo: &dyn BlogRepository) -> Vec<category::Model> {
    match repo.get_categories().await {
        Ok(list) => list,
        Err(e) => {
            warn!(error = %e, event = "categories_unavailable", "listing categories failed");
            Vec::new()
        }
    }
}

async fn render(state: &AppState, page: PageContext, featured_id: Option<&str>) -> Result<Html<String>, AppError> {
    let repo = state.blog.repo();

    let posts = match published_posts(repo, page.viewing_category.as_deref()).await {
        Ok(posts) => posts,
        Err(e) => {
            warn!(error = %e, category = ?page.viewing_category, event = "posts_unavailable", "listing published posts failed");
            Vec::new()
        }
    };

    let featured = match featured_id {
        None => posts.first().cloned(),
        Some(id) => match published_post(repo, id).await {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(error = %e, post_id = id, event = "post_unavailable", "loading post failed");
                None
            }
        },
    };

    let categories = categories_or_empty(repo).await;
    let view = BlogView {
        message: featured.is_none().then_some(NO_RESULTS),
        categories_message: categories.is_empty().then_some(NO_RESULTS),
        page,
        post: featured,
        posts,
        categories,
    };
    state.views.render("blog.html", view)
}

pub async fn index(State(state): State<AppState>, page: PageContext) -> Result<Html<String>, AppError> {
    render(&state, page, None).await
}

pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    render(&state, page, Some(&id)).await
}
