use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::AppState;
use crate::entities::{session, user};
use crate::error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "reelvault_session";

/// Hash a plaintext password with Argon2id and a fresh random salt. The
/// returned PHC string embeds the parameters and salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash. `Ok(false)` means
/// the password simply does not match.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("parse password hash: {e}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}")),
    }
}

pub async fn find_user(
    db: &DatabaseConnection,
    username: &str,
) -> AppResult<Option<user::Model>> {
    let found = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    is_staff: bool,
) -> AppResult<user::Model> {
    let model = user::ActiveModel {
        id: Default::default(),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        is_staff: Set(is_staff),
        created_at: Set(now_sec()),
    };
    Ok(model.insert(db).await?)
}

/// Open a session for the user and return its token.
pub async fn start_session(db: &DatabaseConnection, user_id: i32) -> AppResult<String> {
    let token = Uuid::new_v4().to_string();
    let model = session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user_id),
        created_at: Set(now_sec()),
    };
    model.insert(db).await?;
    Ok(token)
}

/// Resolve a session token to its user. Expired or unknown tokens resolve to
/// `None`; expired rows are left for the next login to overwrite naturally.
pub async fn session_user(
    db: &DatabaseConnection,
    token: &str,
    ttl_seconds: i64,
) -> AppResult<Option<user::Model>> {
    let Some(found) = session::Entity::find_by_id(token.to_string()).one(db).await? else {
        return Ok(None);
    };
    if now_sec().saturating_sub(found.created_at) > ttl_seconds {
        return Ok(None);
    }
    let user = user::Entity::find_by_id(found.user_id).one(db).await?;
    Ok(user)
}

pub async fn end_session(db: &DatabaseConnection, token: &str) -> AppResult<()> {
    session::Entity::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

pub async fn user_count(db: &DatabaseConnection) -> AppResult<u64> {
    use sea_orm::PaginatorTrait;
    Ok(user::Entity::find().count(db).await?)
}

/// The requester's sign-in state, extracted from the session cookie on every
/// request that asks for it. Extraction itself never rejects; handlers that
/// need a user call [`AuthSession::require`].
#[derive(Clone, Debug)]
pub struct AuthSession {
    user: Option<user::Model>,
}

impl AuthSession {
    pub fn user(&self) -> Option<&user::Model> {
        self.user.as_ref()
    }

    /// The signed-in user, or an `Unauthenticated` redirect towards
    /// `/user/login?next={next}`.
    pub fn require(&self, next: &str) -> Result<&user::Model, AppError> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Unauthenticated { next: next.to_string() })
    }

    pub fn require_staff(&self, next: &str) -> Result<&user::Model, AppError> {
        let user = self.require(next)?;
        if !user.is_staff {
            return Err(AppError::Forbidden("Staff access required".to_string()));
        }
        Ok(user)
    }
}

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Self { user: None });
        };
        let ttl_seconds = state.config.session_ttl_days * 86_400;
        let user = session_user(state.catalog.db(), cookie.value(), ttl_seconds).await?;
        Ok(Self { user })
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct-horse-battery-staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct-horse-battery-staple", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("real-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
