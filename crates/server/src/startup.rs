use std::net::SocketAddr;
use std::sync::Arc;

use configs::AppConfig;
use tracing::{error, info, warn};

use service::blog::repository::SeaOrmBlogRepository;
use service::blog::service::BlogService;
use service::uploader::CloudinaryUploader;

use crate::errors::StartupError;
use crate::routes::{self, RouterConfig};
use crate::state::AppState;
use crate::views::Views;

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Connect, prepare the schema, build the app and serve until the listener stops.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    // static dir present, SQLite parent dir created
    common::env::ensure_env(&cfg.views.static_dir, cfg.database.sqlite_path()).await?;

    // pool, then schema; nothing is served before the tables exist
    let db = models::db::connect_with_config(&cfg.database).await?;
    if let Err(e) = service::blog_service::initialize(&db).await {
        error!(error = %e, event = "schema_init_failed", "unable to initialize blog schema");
        return Err(e.into());
    }

    // missing credentials only fail uploads, not startup
    if !cfg.cloudinary.is_configured() {
        warn!(event = "uploader_unconfigured", "image host credentials missing; posts with images will fail");
    }
    let images = CloudinaryUploader::new(cfg.cloudinary.clone()).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let blog = BlogService::new(Arc::new(SeaOrmBlogRepository { db }), Arc::new(images));
    // templates are compiled once here
    let views = Views::new().map_err(|e| StartupError::InvalidConfig(format!("templates: {e}")))?;

    let app = routes::build_router(
        AppState::new(blog, views),
        RouterConfig {
            static_dir: cfg.views.static_dir.clone(),
            max_upload_bytes: cfg.server.max_upload_mb * 1024 * 1024,
        },
    );

    // bind and serve
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(%addr, event = "listening", "blog server listening");
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}
