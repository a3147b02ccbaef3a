use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use configs::DatabaseConfig;
use server::routes::{build_router, RouterConfig};
use server::state::AppState;
use server::views::Views;
use service::blog::input::{CategoryInput, PostInput};
use service::blog::repository::SeaOrmBlogRepository;
use service::blog::service::BlogService;
use service::blog_service;
use service::uploader::{ImageHost, UploadError, UploadedImage};

const BOUNDARY: &str = "blog-test-boundary";

struct StubHost {
    fail: bool,
}

#[async_trait]
impl ImageHost for StubHost {
    async fn upload(&self, _bytes: Vec<u8>, file_name: &str) -> Result<UploadedImage, UploadError> {
        if self.fail {
            return Err(UploadError::Rejected { status: 401, message: "Invalid Signature".into() });
        }
        Ok(UploadedImage { url: format!("https://img.test/{file_name}"), public_id: file_name.into() })
    }

    async fn destroy(&self, _public_id: &str) -> Result<(), UploadError> {
        Ok(())
    }
}

async fn setup(host: StubHost) -> anyhow::Result<(Router, DatabaseConnection)> {
    let cfg = DatabaseConfig { dialect: "sqlite".into(), ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await?;
    blog_service::initialize(&db).await?;

    let blog = BlogService::new(Arc::new(SeaOrmBlogRepository { db: db.clone() }), Arc::new(host));
    let app = build_router(
        AppState::new(blog, Views::new()?),
        RouterConfig { static_dir: "public".into(), max_upload_bytes: 1024 * 1024 },
    );
    Ok((app, db))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"featureImage\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/posts/add")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn location(headers: &HeaderMap) -> &str {
    headers.get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or_default()
}

async fn seed_post(db: &DatabaseConnection, title: &str, category: Option<i32>, published: bool) -> anyhow::Result<()> {
    let input = PostInput {
        title: title.into(),
        body: format!("<p>{title}</p>"),
        category: category.map(|c| c.to_string()),
        published: published.then(|| "on".to_string()),
        ..Default::default()
    };
    blog_service::add_post(db, input).await?;
    Ok(())
}

#[tokio::test]
async fn unknown_path_renders_not_found() -> anyhow::Result<()> {
    let (app, _db) = setup(StubHost { fail: false }).await?;
    let (status, _, body) = send(&app, get("/nonexistent-path")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
    Ok(())
}

#[tokio::test]
async fn root_redirects_to_blog() -> anyhow::Result<()> {
    let (app, _db) = setup(StubHost { fail: false }).await?;
    let (status, headers, _) = send(&app, get("/")).await;
    assert!(status.is_redirection());
    assert_eq!(location(&headers), "/blog");
    Ok(())
}

#[tokio::test]
async fn health_and_about() -> anyhow::Result<()> {
    let (app, _db) = setup(StubHost { fail: false }).await?;
    let (status, _, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);

    let (status, _, body) = send(&app, get("/about")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<li class="active"><a href="/about">"#));
    Ok(())
}

#[tokio::test]
async fn posts_filtered_by_category() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;
    let tech = blog_service::add_category(&db, CategoryInput { category: Some("Tech".into()) }).await?;
    seed_post(&db, "Rust tips", Some(tech.id), true).await?;
    seed_post(&db, "Garden notes", None, false).await?;

    let (status, _, body) = send(&app, get(&format!("/posts?category={}", tech.id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Rust tips"));
    assert!(!body.contains("Garden notes"));

    let (status, _, body) = send(&app, get("/posts")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Rust tips") && body.contains("Garden notes"));

    let (status, _, body) = send(&app, get("/posts?category=9999")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no results"));
    Ok(())
}

#[tokio::test]
async fn undecodable_posts_query_shows_no_results() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;
    let tech = blog_service::add_category(&db, CategoryInput { category: Some("Tech".into()) }).await?;
    seed_post(&db, "Rust tips", Some(tech.id), true).await?;

    let uri = format!("/posts?category={}&category={}", tech.id, tech.id);
    let (status, _, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no results"));
    assert!(!body.contains("Rust tips"));
    Ok(())
}

#[tokio::test]
async fn posts_filtered_by_min_date() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;
    seed_post(&db, "Fresh post", None, true).await?;

    let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d");
    let (_, _, body) = send(&app, get(&format!("/posts?minDate={yesterday}"))).await;
    assert!(body.contains("Fresh post"));

    let tomorrow = (Utc::now() + Duration::days(2)).format("%Y-%m-%d");
    let (status, _, body) = send(&app, get(&format!("/posts?minDate={tomorrow}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no results"));

    let (status, _, body) = send(&app, get("/posts?minDate=someday")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no results"));
    Ok(())
}

#[tokio::test]
async fn add_category_redirects_and_stores() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;
    let req = Request::builder()
        .method("POST")
        .uri("/categories/add")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("category=Tech"))
        .unwrap();
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/categories");

    let categories = blog_service::get_categories(&db).await?;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category.as_deref(), Some("Tech"));

    let (_, _, body) = send(&app, get("/categories")).await;
    assert!(body.contains("Tech"));
    Ok(())
}

#[tokio::test]
async fn add_post_without_file_stores_empty_image() -> anyhow::Result<()> {
    // a failing host proves no upload is attempted for an empty file part
    let (app, db) = setup(StubHost { fail: true }).await?;
    let req = post_form(
        &[("title", "Plain"), ("body", "text"), ("category", ""), ("published", "on")],
        Some(("", b"")),
    );
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/posts");

    let posts = blog_service::get_all_posts(&db).await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].feature_image, "");
    assert_eq!(posts[0].category, None);
    assert!(posts[0].published);
    Ok(())
}

#[tokio::test]
async fn category_post_and_blog_scenario() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;
    let tech = blog_service::add_category(&db, CategoryInput { category: Some("Tech".into()) }).await?;
    let tech_id = tech.id.to_string();

    let before = Utc::now() - Duration::seconds(1);
    let req = post_form(
        &[
            ("title", "Hello axum"),
            ("body", "<p>Welcome</p><script>alert(1)</script>"),
            ("category", &tech_id),
            ("published", "on"),
            ("postDate", "1999-01-01"),
        ],
        Some(("cover.png", b"\x89PNG")),
    );
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let stored = blog_service::get_all_posts(&db).await?;
    assert_eq!(stored.len(), 1);
    let p = &stored[0];
    assert!(p.published);
    assert_eq!(p.category, Some(tech.id));
    assert_eq!(p.feature_image, "https://img.test/cover.png");
    assert!(p.post_date >= before && p.post_date <= Utc::now() + Duration::seconds(1));

    let (status, _, body) = send(&app, get(&format!("/blog?category={tech_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Hello axum"));
    assert!(body.contains("<p>Welcome</p>"));
    assert!(!body.contains("alert(1)"));
    assert!(body.contains("img.test") && body.contains("cover.png"));

    let (_, _, body) = send(&app, get(&format!("/blog/{}", p.id))).await;
    assert!(body.contains("Hello axum"));
    Ok(())
}

#[tokio::test]
async fn blog_hides_drafts() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;

    let (status, _, body) = send(&app, get("/blog")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no results"));

    seed_post(&db, "Secret draft", None, false).await?;
    seed_post(&db, "Public post", None, true).await?;
    let draft_id = blog_service::get_all_posts(&db)
        .await?
        .into_iter()
        .find(|p| !p.published)
        .map(|p| p.id)
        .unwrap();

    let (_, _, body) = send(&app, get("/blog")).await;
    assert!(body.contains("Public post"));
    assert!(!body.contains("Secret draft"));

    let (status, _, body) = send(&app, get(&format!("/blog/{draft_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<h1>Secret draft</h1>"));
    assert!(body.contains("no results"));

    let (status, _, body) = send(&app, get("/blog?category=tech")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("no results"));
    Ok(())
}

#[tokio::test]
async fn upload_failure_returns_500() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: true }).await?;
    let req = post_form(&[("title", "With image")], Some(("cover.png", b"\x89PNG")));
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Unable to upload image");
    assert!(blog_service::get_all_posts(&db).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_failure_returns_error_text() -> anyhow::Result<()> {
    let (app, _db) = setup(StubHost { fail: false }).await?;
    let req = post_form(&[("title", "Bad"), ("category", "tech")], None);
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("invalid id"));
    Ok(())
}

#[tokio::test]
async fn deletes_redirect_even_when_missing() -> anyhow::Result<()> {
    let (app, db) = setup(StubHost { fail: false }).await?;

    let (status, headers, _) = send(&app, get("/posts/delete/999")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/posts");

    let (status, headers, _) = send(&app, get("/categories/delete/999")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/categories");

    let (status, _, body) = send(&app, get("/posts/delete/abc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Unable to remove post");

    let (status, _, body) = send(&app, get("/categories/delete/abc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Unable to remove category");

    let tech = blog_service::add_category(&db, CategoryInput { category: Some("Tech".into()) }).await?;
    seed_post(&db, "Kept", Some(tech.id), true).await?;
    send(&app, get(&format!("/categories/delete/{}", tech.id))).await;
    let posts = blog_service::get_all_posts(&db).await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].category, None);
    Ok(())
}
