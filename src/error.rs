use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    /// Sign-in required; `next` is the page to come back to after login.
    #[error("sign in required")]
    Unauthenticated { next: String },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => error_response(StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Forbidden(msg) => error_response(StatusCode::FORBIDDEN, msg),
            AppError::Unauthenticated { next } => {
                let to = format!("/user/login?next={}", urlencoding::encode(&next));
                Redirect::to(&to).into_response()
            }
            AppError::Invalid(msg) => error_response(StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong".to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong".to_string())
            }
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = crate::templates::error_page(status, &message);
    (status, Html(body)).into_response()
}

pub type AppResult<T> = Result<T, AppError>;
