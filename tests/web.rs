mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use common::{seed_movie, seed_staff, seed_user};
use reelvault::catalog::Catalog;
use reelvault::config::Config;
use reelvault::models::{UserVote, VoteValue};
use reelvault::{AppState, auth, router};

async fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
    let db = common::memory_db().await;
    let media = tempfile::tempdir().unwrap();
    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        media_root: media.path().to_path_buf(),
        session_ttl_days: 14,
        page_size: 2,
        min_password_len: 8,
    };
    let state = Arc::new(AppState { config: Arc::new(config), catalog: Catalog::new(db) });
    (state, media)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={token}", auth::SESSION_COOKIE));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn public_pages_render() {
    let (state, _media) = test_state().await;
    seed_movie(&state.catalog, "Visible", 2005).await;

    for uri in ["/", "/movies", "/movies/top", "/movies?page=7"] {
        let response = router(state.clone()).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    }
}

#[tokio::test]
async fn unknown_entities_render_not_found() {
    let (state, _media) = test_state().await;

    let response = router(state.clone()).oneshot(get("/movie/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router(state.clone()).oneshot(get("/person/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn voting_requires_sign_in() {
    let (state, _media) = test_state().await;
    let movie = seed_movie(&state.catalog, "Protected", 2005).await;

    let request = post_form(&format!("/movie/{}/vote", movie.id), "value=1", None);
    let response = router(state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/user/login?next="), "got {location}");
}

#[tokio::test]
async fn signed_in_user_can_vote_and_revote() {
    let (state, _media) = test_state().await;
    let movie = seed_movie(&state.catalog, "Likeable", 2005).await;
    let user = seed_user(state.catalog.db(), "alice").await;
    let token = auth::start_session(state.catalog.db(), user.id).await.unwrap();

    let request = post_form(&format!("/movie/{}/vote", movie.id), "value=1", Some(&token));
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION].to_str().unwrap(),
        format!("/movie/{}", movie.id)
    );

    let vote = match state.catalog.vote_or_blank(movie.id, user.id).await.unwrap() {
        UserVote::Saved(v) => v,
        UserVote::Blank { .. } => panic!("vote was not persisted"),
    };
    assert_eq!(vote.value, 1);

    // Flip it through the update endpoint.
    let request = post_form(
        &format!("/movie/{}/vote/{}", movie.id, vote.id),
        "value=-1",
        Some(&token),
    );
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let credits = state.catalog.movie_with_credits(movie.id).await.unwrap().unwrap();
    assert_eq!(credits.movie.score, Some(-1));
}

#[tokio::test]
async fn updating_someone_elses_vote_is_forbidden_over_http() {
    let (state, _media) = test_state().await;
    let movie = seed_movie(&state.catalog, "Owned", 2005).await;
    let owner = seed_user(state.catalog.db(), "owner").await;
    let intruder = seed_user(state.catalog.db(), "intruder").await;
    let vote = state.catalog.cast_vote(movie.id, owner.id, VoteValue::Up).await.unwrap();
    let token = auth::start_session(state.catalog.db(), intruder.id).await.unwrap();

    let request = post_form(
        &format!("/movie/{}/vote/{}", movie.id, vote.id),
        "value=-1",
        Some(&token),
    );
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_vote_value_is_rejected() {
    let (state, _media) = test_state().await;
    let movie = seed_movie(&state.catalog, "Strict", 2005).await;
    let user = seed_user(state.catalog.db(), "alice").await;
    let token = auth::start_session(state.catalog.db(), user.id).await.unwrap();

    let request = post_form(&format!("/movie/{}/vote", movie.id), "value=5", Some(&token));
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(matches!(
        state.catalog.vote_or_blank(movie.id, user.id).await.unwrap(),
        UserVote::Blank { .. }
    ));
}

#[tokio::test]
async fn image_upload_stores_file_and_row() {
    let (state, media) = test_state().await;
    let movie = seed_movie(&state.catalog, "Photogenic", 2005).await;
    let user = seed_user(state.catalog.db(), "alice").await;
    let token = auth::start_session(state.catalog.db(), user.id).await.unwrap();

    let boundary = "reelvault-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"poster.jpg\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         fake image bytes\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri(format!("/movie/{}/image", movie.id))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .header(header::COOKIE, format!("{}={token}", auth::SESSION_COOKIE))
        .body(Body::from(body))
        .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let images = state.catalog.movie_images(movie.id).await.unwrap();
    assert_eq!(images.len(), 1);
    assert!(images[0].image.starts_with(&format!("{}/", movie.id)));

    let stored = tokio::fs::read(media.path().join(&images[0].image)).await.unwrap();
    assert_eq!(stored, b"fake image bytes");
}

#[tokio::test]
async fn admin_area_is_staff_only() {
    let (state, _media) = test_state().await;
    let staff = seed_staff(state.catalog.db(), "root").await;
    let plain = seed_user(state.catalog.db(), "alice").await;
    let staff_token = auth::start_session(state.catalog.db(), staff.id).await.unwrap();
    let plain_token = auth::start_session(state.catalog.db(), plain.id).await.unwrap();

    let anonymous = router(state.clone()).oneshot(get("/admin")).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);

    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, format!("{}={plain_token}", auth::SESSION_COOKIE))
        .body(Body::empty())
        .unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = Request::builder()
        .uri("/admin")
        .header(header::COOKIE, format!("{}={staff_token}", auth::SESSION_COOKIE))
        .body(Body::empty())
        .unwrap();
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn first_registered_account_is_staff() {
    let (state, _media) = test_state().await;

    let request = post_form("/user/register", "username=founder&password=long-enough-pw", None);
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let request = post_form("/user/register", "username=second&password=long-enough-pw", None);
    router(state.clone()).oneshot(request).await.unwrap();

    let founder = auth::find_user(state.catalog.db(), "founder").await.unwrap().unwrap();
    let second = auth::find_user(state.catalog.db(), "second").await.unwrap().unwrap();
    assert!(founder.is_staff);
    assert!(!second.is_staff);
}

#[tokio::test]
async fn signed_in_users_are_redirected_off_auth_pages() {
    let (state, _media) = test_state().await;
    let user = seed_user(state.catalog.db(), "alice").await;
    let token = auth::start_session(state.catalog.db(), user.id).await.unwrap();

    for uri in ["/user/login", "/user/register"] {
        let request = Request::builder()
            .uri(uri)
            .header(header::COOKIE, format!("{}={token}", auth::SESSION_COOKIE))
            .body(Body::empty())
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(response.headers()[header::LOCATION].to_str().unwrap(), "/");
    }
}

#[tokio::test]
async fn short_passwords_do_not_create_accounts() {
    let (state, _media) = test_state().await;

    let request = post_form("/user/register", "username=alice&password=tiny", None);
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "form re-renders with an error");

    assert!(auth::find_user(state.catalog.db(), "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn login_sets_session_cookie_and_logout_clears_it() {
    let (state, _media) = test_state().await;
    auth::create_user(state.catalog.db(), "alice", "her-long-password", false).await.unwrap();

    let request = post_form("/user/login", "username=alice&password=her-long-password", None);
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with(auth::SESSION_COOKIE));

    let bad = post_form("/user/login", "username=alice&password=wrong", None);
    let response = router(state.clone()).oneshot(bad).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "bad login re-renders the form");
    assert!(!response.headers().contains_key(header::SET_COOKIE));

    let token = set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split('=').nth(1))
        .unwrap()
        .to_string();
    let request = post_form("/user/logout", "", Some(&token));
    let response = router(state.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"), "logout sends a removal cookie: {cleared}");

    let resolved = auth::session_user(state.catalog.db(), &token, 86_400).await.unwrap();
    assert!(resolved.is_none(), "session row is gone after logout");
}
