//! Post administration: listing with filters, the multipart add form and delete.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::Uri,
    response::{Html, Redirect},
};
use minijinja::context;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use models::post;
use service::blog::input::{parse_id, parse_min_date, PostInput};
use service::blog::repository::BlogRepository;
use service::blog::service::ImageUpload;
use service::errors::ServiceError;

use crate::errors::AppError;
use crate::page::PageContext;
use crate::routes::blog::{categories_or_empty, NO_RESULTS};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PostsQuery {
    pub category: Option<String>,
    #[serde(rename = "minDate")]
    pub min_date: Option<String>,
}

#[derive(Serialize)]
struct PostRow {
    post: post::Model,
    category_name: Option<String>,
}

/// `category` wins over `minDate`; with neither every post is listed.
async fn filtered_posts(repo: &dyn BlogRepository, q: &PostsQuery) -> Result<Vec<post::Model>, ServiceError> {
    let category = q.category.as_deref().filter(|c| !c.trim().is_empty());
    let min_date = q.min_date.as_deref().filter(|d| !d.trim().is_empty());
    match (category, min_date) {
        (Some(c), _) => repo.get_posts_by_category(parse_id(c)?).await,
        (None, Some(d)) => repo.get_posts_by_min_date(parse_min_date(d)?).await,
        (None, None) => repo.get_all_posts().await,
    }
}

/// Undecodable query strings (e.g. a repeated `category`) land on the
/// "no results" page like any other read failure.
fn posts_query(uri: &Uri) -> Result<PostsQuery, ServiceError> {
    Query::<PostsQuery>::try_from_uri(uri)
        .map(|Query(q)| q)
        .map_err(|e| ServiceError::Validation(e.body_text()))
}

pub async fn list(State(state): State<AppState>, page: PageContext, uri: Uri) -> Result<Html<String>, AppError> {
    let repo = state.blog.repo();
    let loaded = match posts_query(&uri) {
        Ok(q) => filtered_posts(repo, &q).await,
        Err(e) => Err(e),
    };
    let posts = match loaded {
        Ok(posts) => posts,
        Err(e) => {
            warn!(error = %e, query = ?uri.query(), event = "posts_unavailable", "listing posts failed");
            Vec::new()
        }
    };

    let names: HashMap<i32, Option<String>> = if posts.is_empty() {
        HashMap::new()
    } else {
        categories_or_empty(repo).await.into_iter().map(|c| (c.id, c.category)).collect()
    };
    let rows: Vec<PostRow> = posts
        .into_iter()
        .map(|p| {
            let category_name = p.category.and_then(|id| names.get(&id).cloned().flatten());
            PostRow { post: p, category_name }
        })
        .collect();

    let message = rows.is_empty().then_some(NO_RESULTS);
    state.views.render("posts.html", context! { page => page, posts => rows, message => message })
}

pub async fn add_form(State(state): State<AppState>, page: PageContext) -> Result<Html<String>, AppError> {
    let categories = categories_or_empty(state.blog.repo()).await;
    state.views.render("add_post.html", context! { page => page, categories => categories })
}

/// Collect the post form. A file part with no name or no content counts as no file.
async fn read_post_form(mut multipart: Multipart) -> Result<(PostInput, Option<ImageUpload>), AppError> {
    let mut input = PostInput::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "featureImage" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !file_name.is_empty() && !bytes.is_empty() {
                image = Some(ImageUpload { bytes: bytes.to_vec(), file_name });
            }
            continue;
        }

        let value = field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
        match name.as_str() {
            "title" => input.title = value,
            "body" => input.body = value,
            "category" => input.category = Some(value),
            "published" => input.published = Some(value),
            "postDate" => input.post_date = Some(value),
            _ => {}
        }
    }
    Ok((input, image))
}

pub async fn add(State(state): State<AppState>, multipart: Multipart) -> Result<Redirect, AppError> {
    let (input, image) = read_post_form(multipart).await?;
    match state.blog.create_post(input, image).await {
        Ok(_) => Ok(Redirect::to("/posts")),
        Err(ServiceError::Upload(e)) => {
            error!(error = %e, event = "image_upload_failed", "uploading feature image failed");
            Err(AppError::internal("Unable to upload image"))
        }
        Err(e) => {
            error!(error = %e, event = "post_create_failed", "creating post failed");
            Err(AppError::internal(e.to_string()))
        }
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect, AppError> {
    let repo = state.blog.repo();
    let res = match parse_id(&id) {
        Ok(id) => repo.delete_post_by_id(id).await,
        Err(e) => Err(e),
    };
    res.map_err(|e| {
        error!(error = %e, post_id = %id, event = "post_delete_failed", "removing post failed");
        AppError::internal("Unable to remove post")
    })?;
    Ok(Redirect::to("/posts"))
}
