pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod media;
pub mod models;
pub mod routes;
pub mod templates;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::config::Config;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

pub fn router(state: Arc<AppState>) -> Router {
    let media_root = state.config.media_root.clone();

    Router::new()
        .route("/", get(routes::home))
        .route("/movies", get(routes::movie_list))
        .route("/movies/top", get(routes::top_movies))
        .route("/movie/{id}", get(routes::movie_detail))
        .route("/movie/{movie_id}/vote", post(routes::create_vote))
        .route("/movie/{movie_id}/vote/{vote_id}", post(routes::update_vote))
        .route("/movie/{movie_id}/image", post(routes::upload_image))
        .route("/person/{id}", get(routes::person_detail))
        .route("/user/register", get(routes::register_form).post(routes::register))
        .route("/user/login", get(routes::login_form).post(routes::login))
        .route("/user/logout", post(routes::logout))
        .route("/admin", get(routes::admin_home))
        .route("/admin/movie", get(routes::admin_movie_form).post(routes::admin_create_movie))
        .route("/admin/person", get(routes::admin_person_form).post(routes::admin_create_person))
        .route("/admin/role", get(routes::admin_credit_form).post(routes::admin_create_credit))
        .nest_service("/media", ServeDir::new(media_root))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
