use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use models::{category, post};
use crate::blog::input::{CategoryInput, PostInput};
use crate::blog_service;
use crate::errors::ServiceError;

/// Data-access operations the HTTP layer depends on.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn get_all_posts(&self) -> Result<Vec<post::Model>, ServiceError>;
    async fn get_posts_by_category(&self, category_id: i32) -> Result<Vec<post::Model>, ServiceError>;
    async fn get_posts_by_min_date(&self, min_date: DateTime<Utc>) -> Result<Vec<post::Model>, ServiceError>;
    async fn get_post_by_id(&self, id: i32) -> Result<Option<post::Model>, ServiceError>;
    async fn get_published_posts(&self) -> Result<Vec<post::Model>, ServiceError>;
    async fn get_published_posts_by_category(&self, category_id: i32) -> Result<Vec<post::Model>, ServiceError>;
    async fn add_post(&self, input: PostInput) -> Result<post::Model, ServiceError>;
    async fn delete_post_by_id(&self, id: i32) -> Result<bool, ServiceError>;
    async fn get_categories(&self) -> Result<Vec<category::Model>, ServiceError>;
    async fn add_category(&self, input: CategoryInput) -> Result<category::Model, ServiceError>;
    async fn delete_category_by_id(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBlogRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl BlogRepository for SeaOrmBlogRepository {
    async fn get_all_posts(&self) -> Result<Vec<post::Model>, ServiceError> {
        blog_service::get_all_posts(&self.db).await
    }

    async fn get_posts_by_category(&self, category_id: i32) -> Result<Vec<post::Model>, ServiceError> {
        blog_service::get_posts_by_category(&self.db, category_id).await
    }

    async fn get_posts_by_min_date(&self, min_date: DateTime<Utc>) -> Result<Vec<post::Model>, ServiceError> {
        blog_service::get_posts_by_min_date(&self.db, min_date).await
    }

    async fn get_post_by_id(&self, id: i32) -> Result<Option<post::Model>, ServiceError> {
        blog_service::get_post_by_id(&self.db, id).await
    }

    async fn get_published_posts(&self) -> Result<Vec<post::Model>, ServiceError> {
        blog_service::get_published_posts(&self.db).await
    }

    async fn get_published_posts_by_category(&self, category_id: i32) -> Result<Vec<post::Model>, ServiceError> {
        blog_service::get_published_posts_by_category(&self.db, category_id).await
    }

    async fn add_post(&self, input: PostInput) -> Result<post::Model, ServiceError> {
        blog_service::add_post(&self.db, input).await
    }

    async fn delete_post_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        blog_service::delete_post_by_id(&self.db, id).await
    }

    async fn get_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        blog_service::get_categories(&self.db).await
    }

    async fn add_category(&self, input: CategoryInput) -> Result<category::Model, ServiceError> {
        blog_service::add_category(&self.db, input).await
    }

    async fn delete_category_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        blog_service::delete_category_by_id(&self.db, id).await
    }
}
