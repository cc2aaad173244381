use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(pk_auto(People::Id))
                    .col(string(People::FirstName))
                    .col(string(People::LastName))
                    .col(string(People::Born))
                    .col(string_null(People::Died))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_people_name")
                    .table(People::Table)
                    .col(People::LastName)
                    .col(People::FirstName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Title))
                    .col(text(Movies::Plot))
                    .col(integer(Movies::Year))
                    .col(integer(Movies::Rating))
                    .col(integer(Movies::Runtime))
                    .col(string_null(Movies::Website))
                    .col(integer_null(Movies::DirectorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_director")
                            .from(Movies::Table, Movies::DirectorId)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_year_title")
                    .table(Movies::Table)
                    .col(Movies::Year)
                    .col(Movies::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieWriters::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieWriters::Id))
                    .col(integer(MovieWriters::MovieId))
                    .col(integer(MovieWriters::PersonId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_writers_movie")
                            .from(MovieWriters::Table, MovieWriters::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_writers_person")
                            .from(MovieWriters::Table, MovieWriters::PersonId)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_writers_unique")
                    .table(MovieWriters::Table)
                    .col(MovieWriters::MovieId)
                    .col(MovieWriters::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(pk_auto(Roles::Id))
                    .col(integer(Roles::MovieId))
                    .col(integer(Roles::PersonId))
                    .col(string(Roles::Name))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_movie")
                            .from(Roles::Table, Roles::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roles_person")
                            .from(Roles::Table, Roles::PersonId)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roles_unique")
                    .table(Roles::Table)
                    .col(Roles::MovieId)
                    .col(Roles::PersonId)
                    .col(Roles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Roles::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieWriters::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(People::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum People {
    Table,
    Id,
    FirstName,
    LastName,
    Born,
    Died,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Plot,
    Year,
    Rating,
    Runtime,
    Website,
    DirectorId,
}

#[derive(DeriveIden)]
enum MovieWriters {
    Table,
    Id,
    MovieId,
    PersonId,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    MovieId,
    PersonId,
    Name,
}
