mod common;

use common::{catalog, memory_db, seed_movie, seed_user};
use reelvault::auth;
use sea_orm::{ActiveModelTrait, Set};

#[tokio::test]
async fn session_round_trip() {
    let db = memory_db().await;
    let user = seed_user(&db, "alice").await;

    let token = auth::start_session(&db, user.id).await.unwrap();
    let resolved = auth::session_user(&db, &token, 86_400).await.unwrap();
    assert_eq!(resolved.map(|u| u.id), Some(user.id));

    auth::end_session(&db, &token).await.unwrap();
    let resolved = auth::session_user(&db, &token, 86_400).await.unwrap();
    assert!(resolved.is_none(), "ended sessions no longer resolve");
}

#[tokio::test]
async fn expired_sessions_resolve_to_none() {
    let db = memory_db().await;
    let user = seed_user(&db, "alice").await;

    let stale = reelvault::entities::session::ActiveModel {
        token: Set("stale-token".to_string()),
        user_id: Set(user.id),
        created_at: Set(jiff::Timestamp::now().as_second() - 100_000),
    };
    stale.insert(&db).await.unwrap();

    let resolved = auth::session_user(&db, "stale-token", 86_400).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn unknown_token_resolves_to_none() {
    let db = memory_db().await;
    let resolved = auth::session_user(&db, "never-issued", 86_400).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn duplicate_usernames_are_rejected() {
    let db = memory_db().await;
    seed_user(&db, "alice").await;
    let duplicate = auth::create_user(&db, "alice", "another-password", false).await;
    assert!(duplicate.is_err(), "username unique index must hold");
}

#[tokio::test]
async fn stored_password_is_hashed_and_verifiable() {
    let db = memory_db().await;
    let user = auth::create_user(&db, "alice", "her-long-password", false).await.unwrap();

    assert_ne!(user.password_hash, "her-long-password");
    assert!(auth::verify_password("her-long-password", &user.password_hash).unwrap());
    assert!(!auth::verify_password("guess", &user.password_hash).unwrap());
}

#[tokio::test]
async fn movie_image_rows_record_uploader_and_path() {
    let catalog = catalog().await;
    let movie = seed_movie(&catalog, "Pictured", 2005).await;
    let user = seed_user(catalog.db(), "alice").await;

    let first = catalog
        .add_movie_image(movie.id, user.id, &format!("{}/aaaa-bbbb", movie.id))
        .await
        .unwrap();
    let second = catalog
        .add_movie_image(movie.id, user.id, &format!("{}/cccc-dddd", movie.id))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let images = catalog.movie_images(movie.id).await.unwrap();
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|i| i.image.starts_with(&format!("{}/", movie.id))));
    assert!(images.iter().all(|i| i.user_id == user.id));

    assert!(catalog.movie_images(movie.id + 1).await.unwrap().is_empty());
}
