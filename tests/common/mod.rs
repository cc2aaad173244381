#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use reelvault::auth;
use reelvault::catalog::Catalog;
use reelvault::entities::{movie, person, user};
use reelvault::models::Rating;

/// Fresh in-memory database with the real migrations applied. The pool is
/// pinned to one connection so every query sees the same `:memory:` store.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn catalog() -> Catalog {
    Catalog::new(memory_db().await)
}

pub async fn seed_movie(catalog: &Catalog, title: &str, year: i32) -> movie::Model {
    catalog
        .create_movie(title, "A test plot.", year, Rating::NotRated, 120, None, None)
        .await
        .expect("seed movie")
}

pub async fn seed_person(
    catalog: &Catalog,
    first_name: &str,
    last_name: &str,
) -> person::Model {
    catalog
        .create_person(first_name, last_name, "1970-01-01", None)
        .await
        .expect("seed person")
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    auth::create_user(db, username, "correct-horse-battery", false).await.expect("seed user")
}

pub async fn seed_staff(db: &DatabaseConnection, username: &str) -> user::Model {
    auth::create_user(db, username, "correct-horse-battery", true).await.expect("seed staff")
}
