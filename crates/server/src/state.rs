use std::sync::Arc;

use service::blog::service::BlogService;

use crate::views::Views;

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(blog: BlogService, views: Views) -> Self {
        Self { blog: Arc::new(blog), views: Arc::new(views) }
    }
}
