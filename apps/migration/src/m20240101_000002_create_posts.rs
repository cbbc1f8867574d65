use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Url).string().null())
                    .col(ColumnDef::new(Posts::Text).text().null())
                    .col(ColumnDef::new(Posts::Kind).string().not_null())
                    .col(ColumnDef::new(Posts::Category).string().not_null())
                    .col(ColumnDef::new(Posts::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Posts::AuthorUsername).string().not_null())
                    .col(ColumnDef::new(Posts::Score).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Posts::UpvotePercentage)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Posts::Votes).json_binary().not_null())
                    .col(ColumnDef::new(Posts::Comments).json_binary().not_null())
                    .col(ColumnDef::new(Posts::Views).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Posts::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_category")
                    .table(Posts::Table)
                    .col(Posts::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_author_username")
                    .table(Posts::Table)
                    .col(Posts::AuthorUsername)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    Url,
    Text,
    Kind,
    Category,
    AuthorId,
    AuthorUsername,
    Score,
    UpvotePercentage,
    Votes,
    Comments,
    Views,
    Created,
}
