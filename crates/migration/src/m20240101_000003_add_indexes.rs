use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Post: category filter on /posts and /blog
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_category")
                    .table(Post::Table)
                    .col(Post::Category)
                    .to_owned(),
            )
            .await?;

        // Post: published listing ordered by date
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_post_published_date")
                    .table(Post::Table)
                    .col(Post::Published)
                    .col(Post::PostDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_post_published_date").table(Post::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_post_category").table(Post::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Post { Table, Category, Published, PostDate }
