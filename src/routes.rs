use std::sync::Arc;

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::{self, AuthSession};
use crate::catalog::TOP_MOVIES_LIMIT;
use crate::error::{AppError, AppResult};
use crate::models::{
    LoginForm, NewCreditForm, NewMovieForm, NewPersonForm, NextQuery, PageQuery, Rating,
    RegisterForm, VoteForm, VoteValue,
};
use crate::{AppState, media, templates};

pub async fn home(auth: AuthSession) -> Html<String> {
    Html(templates::home_page(auth.user()))
}

pub async fn movie_list(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Query(q): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let page_number = q.page.unwrap_or(1).max(1);
    let (movies, total_pages) =
        state.catalog.movies_with_score(page_number - 1, state.config.page_size).await?;
    Ok(Html(templates::movie_list_page(auth.user(), &movies, page_number, total_pages)))
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let credits = state.catalog.movie_with_credits(id).await?.ok_or(AppError::NotFound)?;
    let images = state.catalog.movie_images(id).await?;

    let my_vote = match auth.user() {
        Some(user) => Some(state.catalog.vote_or_blank(id, user.id).await?),
        None => None,
    };

    Ok(Html(templates::movie_detail_page(auth.user(), &credits, &images, my_vote.as_ref())))
}

pub async fn person_detail(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let credits = state.catalog.person_with_credits(id).await?.ok_or(AppError::NotFound)?;
    Ok(Html(templates::person_detail_page(auth.user(), &credits)))
}

pub async fn top_movies(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> AppResult<Html<String>> {
    let movies = state.catalog.top_movies(TOP_MOVIES_LIMIT).await?;
    Ok(Html(templates::top_movies_page(auth.user(), &movies)))
}

pub async fn create_vote(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Path(movie_id): Path<i32>,
    Form(form): Form<VoteForm>,
) -> AppResult<Redirect> {
    let user = auth.require(&format!("/movie/{movie_id}"))?;
    if !state.catalog.movie_exists(movie_id).await? {
        return Err(AppError::NotFound);
    }
    let value = VoteValue::from_code(form.value)
        .ok_or_else(|| AppError::Invalid("Vote value must be +1 or -1".to_string()))?;

    state.catalog.cast_vote(movie_id, user.id, value).await?;
    Ok(Redirect::to(&format!("/movie/{movie_id}")))
}

pub async fn update_vote(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Path((movie_id, vote_id)): Path<(i32, i32)>,
    Form(form): Form<VoteForm>,
) -> AppResult<Redirect> {
    let user = auth.require(&format!("/movie/{movie_id}"))?;
    let value = VoteValue::from_code(form.value)
        .ok_or_else(|| AppError::Invalid("Vote value must be +1 or -1".to_string()))?;

    state.catalog.update_vote(vote_id, movie_id, user.id, value).await?;
    Ok(Redirect::to(&format!("/movie/{movie_id}")))
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Path(movie_id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let user = auth.require(&format!("/movie/{movie_id}"))?;
    if !state.catalog.movie_exists(movie_id).await? {
        return Err(AppError::NotFound);
    }

    while let Some(field) =
        multipart.next_field().await.map_err(|e| anyhow::anyhow!("read upload: {e}"))?
    {
        if field.name() == Some("image") {
            let bytes = field.bytes().await.map_err(|e| anyhow::anyhow!("read upload: {e}"))?;
            if !bytes.is_empty() {
                let relative =
                    media::store_movie_image(&state.config.media_root, movie_id, &bytes).await?;
                state.catalog.add_movie_image(movie_id, user.id, &relative).await?;
                tracing::info!(movie_id, user_id = user.id, path = %relative, "image uploaded");
            }
            break;
        }
    }

    // Back to the detail page whether or not a file actually arrived.
    Ok(Redirect::to(&format!("/movie/{movie_id}")))
}

// Account handlers.

pub async fn login_form(auth: AuthSession, Query(q): Query<NextQuery>) -> Response {
    if auth.user().is_some() {
        return Redirect::to("/").into_response();
    }
    Html(templates::login_page(None, q.next.as_deref())).into_response()
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let db = state.catalog.db();

    let user = match auth::find_user(db, username).await? {
        Some(user) if auth::verify_password(&form.password, &user.password_hash)? => user,
        _ => {
            let body = templates::login_page(
                Some("Unknown username or wrong password"),
                form.next.as_deref(),
            );
            return Ok(Html(body).into_response());
        }
    };

    let token = auth::start_session(db, user.id).await?;
    let jar = jar.add(auth::session_cookie(token));
    tracing::info!(user_id = user.id, "signed in");
    Ok((jar, Redirect::to(&sanitize_next(form.next.as_deref()))).into_response())
}

pub async fn register_form(auth: AuthSession) -> Response {
    if auth.user().is_some() {
        return Redirect::to("/").into_response();
    }
    Html(templates::register_page(None)).into_response()
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let db = state.catalog.db();
    let username = form.username.trim();

    let error = if username.is_empty() {
        Some("Username is required".to_string())
    } else if form.password.len() < state.config.min_password_len {
        Some(format!(
            "Password must be at least {} characters long",
            state.config.min_password_len
        ))
    } else if auth::find_user(db, username).await?.is_some() {
        Some("That username is taken".to_string())
    } else {
        None
    };
    if let Some(message) = error {
        return Ok(Html(templates::register_page(Some(&message))).into_response());
    }

    // The first account to register runs the place.
    let is_staff = auth::user_count(db).await? == 0;
    let user = auth::create_user(db, username, &form.password, is_staff).await?;
    let token = auth::start_session(db, user.id).await?;
    let jar = jar.add(auth::session_cookie(token));
    tracing::info!(user_id = user.id, is_staff, "account created");
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(auth::SESSION_COOKIE) {
        auth::end_session(state.catalog.db(), cookie.value()).await?;
    }
    let jar = jar.add(auth::clear_session_cookie());
    Ok((jar, Redirect::to("/")).into_response())
}

// Staff-only catalog management. Create-only; the catalog has no edit or
// delete flows.

pub async fn admin_home(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> AppResult<Html<String>> {
    auth.require_staff("/admin")?;
    let (movies, people, votes) = state.catalog.counts().await?;
    Ok(Html(templates::admin_page(auth.user(), movies, people, votes)))
}

pub async fn admin_movie_form(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> AppResult<Html<String>> {
    auth.require_staff("/admin/movie")?;
    let people = state.catalog.all_people().await?;
    Ok(Html(templates::admin_movie_page(auth.user(), &people, None)))
}

pub async fn admin_create_movie(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<NewMovieForm>,
) -> AppResult<Response> {
    auth.require_staff("/admin/movie")?;

    let title = form.title.trim();
    let rating = Rating::from_code(form.rating);
    let error = if title.is_empty() {
        Some("Title is required")
    } else if rating.is_none() {
        Some("Unknown rating")
    } else if form.year < 1888 {
        Some("Year predates motion pictures")
    } else if form.runtime < 0 {
        Some("Runtime cannot be negative")
    } else {
        None
    };
    if let Some(message) = error {
        let people = state.catalog.all_people().await?;
        return Ok(Html(templates::admin_movie_page(auth.user(), &people, Some(message)))
            .into_response());
    }

    let director_id = parse_optional_id(&form.director_id)?;
    let website = form.website.trim();
    let movie = state
        .catalog
        .create_movie(
            title,
            form.plot.trim(),
            form.year,
            rating.unwrap_or(Rating::NotRated),
            form.runtime,
            (!website.is_empty()).then_some(website),
            director_id,
        )
        .await?;
    tracing::info!(movie_id = movie.id, title = %movie.title, "movie created");
    Ok(Redirect::to(&format!("/movie/{}", movie.id)).into_response())
}

pub async fn admin_person_form(auth: AuthSession) -> AppResult<Html<String>> {
    auth.require_staff("/admin/person")?;
    Ok(Html(templates::admin_person_page(auth.user(), None)))
}

pub async fn admin_create_person(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<NewPersonForm>,
) -> AppResult<Response> {
    auth.require_staff("/admin/person")?;

    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let born = form.born.trim();
    let died = form.died.trim();

    let error = if first_name.is_empty() || last_name.is_empty() {
        Some("First and last name are required")
    } else if born.parse::<jiff::civil::Date>().is_err() {
        Some("Born must be a date like 1946-07-06")
    } else if !died.is_empty() && died.parse::<jiff::civil::Date>().is_err() {
        Some("Died must be a date like 2022-09-08")
    } else {
        None
    };
    if let Some(message) = error {
        return Ok(Html(templates::admin_person_page(auth.user(), Some(message))).into_response());
    }

    let person = state
        .catalog
        .create_person(first_name, last_name, born, (!died.is_empty()).then_some(died))
        .await?;
    Ok(Redirect::to(&format!("/person/{}", person.id)).into_response())
}

pub async fn admin_credit_form(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> AppResult<Html<String>> {
    auth.require_staff("/admin/role")?;
    let movies = state.catalog.all_movies().await?;
    let people = state.catalog.all_people().await?;
    Ok(Html(templates::admin_credit_page(auth.user(), &movies, &people, None)))
}

pub async fn admin_create_credit(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Form(form): Form<NewCreditForm>,
) -> AppResult<Response> {
    auth.require_staff("/admin/role")?;

    let result = match form.credit.as_str() {
        "writer" => state.catalog.add_writer(form.movie_id, form.person_id).await,
        "actor" => {
            let name = form.name.trim();
            if name.is_empty() {
                return admin_credit_error(&state, &auth, "Role name is required for actors").await;
            }
            state.catalog.create_role(form.movie_id, form.person_id, name).await.map(|_| ())
        }
        _ => return Err(AppError::Invalid("Unknown credit type".to_string())),
    };

    match result {
        Ok(()) => Ok(Redirect::to(&format!("/movie/{}", form.movie_id)).into_response()),
        Err(AppError::Db(err)) if is_unique_violation(&err) => {
            admin_credit_error(&state, &auth, "That credit already exists").await
        }
        Err(err) => Err(err),
    }
}

async fn admin_credit_error(
    state: &Arc<AppState>,
    auth: &AuthSession,
    message: &str,
) -> AppResult<Response> {
    let movies = state.catalog.all_movies().await?;
    let people = state.catalog.all_people().await?;
    Ok(Html(templates::admin_credit_page(auth.user(), &movies, &people, Some(message)))
        .into_response())
}

/// Only same-site paths are allowed as post-login targets. `//` and `/\` are
/// both rejected; browsers treat either as a protocol-relative URL.
fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

fn parse_optional_id(raw: &str) -> AppResult<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| AppError::Invalid("Invalid person id".to_string()))
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

#[cfg(test)]
mod tests {
    use super::sanitize_next;

    #[test]
    fn next_param_only_allows_local_paths() {
        assert_eq!(sanitize_next(Some("/movie/3")), "/movie/3");
        assert_eq!(sanitize_next(Some("//evil.example")), "/");
        assert_eq!(sanitize_next(Some("/\\evil.example")), "/");
        assert_eq!(sanitize_next(Some("https://evil.example")), "/");
        assert_eq!(sanitize_next(None), "/");
    }
}
