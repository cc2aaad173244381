use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MovieImages::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieImages::Id))
                    .col(string(MovieImages::Image))
                    .col(big_integer(MovieImages::Uploaded))
                    .col(integer(MovieImages::MovieId))
                    .col(integer(MovieImages::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_images_movie")
                            .from(MovieImages::Table, MovieImages::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_images_user")
                            .from(MovieImages::Table, MovieImages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_images_movie")
                    .table(MovieImages::Table)
                    .col(MovieImages::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieImages::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MovieImages {
    Table,
    Id,
    Image,
    Uploaded,
    MovieId,
    UserId,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
