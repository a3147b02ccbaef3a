use chrono::{DateTime, Utc};
use migration::MigratorTrait;
use sea_orm::{prelude::DateTimeWithTimeZone, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{info, instrument};

use models::{category, post};
use crate::blog::input::{CategoryInput, PostInput};
use crate::errors::ServiceError;

/// Create the schema if it is missing. Must finish before any other call.
#[instrument(skip(db))]
pub async fn initialize(db: &DatabaseConnection) -> Result<(), ServiceError> {
    migration::Migrator::up(db, None).await?;
    info!(event = "schema_ready", "blog schema initialized");
    Ok(())
}

/// All posts in store order.
pub async fn get_all_posts(db: &DatabaseConnection) -> Result<Vec<post::Model>, ServiceError> {
    Ok(post::Entity::find().all(db).await?)
}

pub async fn get_posts_by_category(db: &DatabaseConnection, category_id: i32) -> Result<Vec<post::Model>, ServiceError> {
    let rows = post::Entity::find()
        .filter(post::Column::Category.eq(category_id))
        .all(db)
        .await?;
    Ok(rows)
}

/// Posts dated on or after `min_date`.
pub async fn get_posts_by_min_date(db: &DatabaseConnection, min_date: DateTime<Utc>) -> Result<Vec<post::Model>, ServiceError> {
    let min_date: DateTimeWithTimeZone = min_date.into();
    let rows = post::Entity::find()
        .filter(post::Column::PostDate.gte(min_date))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_post_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<post::Model>, ServiceError> {
    Ok(post::Entity::find_by_id(id).one(db).await?)
}

pub async fn get_published_posts(db: &DatabaseConnection) -> Result<Vec<post::Model>, ServiceError> {
    let rows = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_published_posts_by_category(db: &DatabaseConnection, category_id: i32) -> Result<Vec<post::Model>, ServiceError> {
    let rows = post::Entity::find()
        .filter(post::Column::Published.eq(true))
        .filter(post::Column::Category.eq(category_id))
        .all(db)
        .await?;
    Ok(rows)
}

/// Normalize the form and insert. The post date is always the server's clock.
#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn add_post(db: &DatabaseConnection, input: PostInput) -> Result<post::Model, ServiceError> {
    let new = input.normalize()?;
    let created = post::create(db, new).await?;
    info!(post_id = created.id, event = "post_created", "post created");
    Ok(created)
}

/// Returns whether a row was removed; a missing id is not an error.
#[instrument(skip(db))]
pub async fn delete_post_by_id(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    Ok(post::delete(db, id).await?)
}

pub async fn get_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    Ok(category::Entity::find().all(db).await?)
}

#[instrument(skip(db, input))]
pub async fn add_category(db: &DatabaseConnection, input: CategoryInput) -> Result<category::Model, ServiceError> {
    let created = category::create(db, input.normalize()).await?;
    info!(category_id = created.id, event = "category_created", "category created");
    Ok(created)
}

/// Posts in the category keep existing with their category cleared.
#[instrument(skip(db))]
pub async fn delete_category_by_id(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    Ok(category::delete(db, id).await?)
}

/// Newest first, the order the blog page shows them in.
pub fn sort_newest_first(posts: &mut [post::Model]) {
    posts.sort_by(|a, b| b.post_date.cmp(&a.post_date));
}
