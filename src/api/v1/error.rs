use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        ApiErrorCode::InvalidInput(e.to_string())
    } else if let Some(e) = err.find::<reject::InvalidQuery>() {
        ApiErrorCode::InvalidInput(e.to_string())
    } else if err.find::<reject::MissingHeader>().is_some() {
        ApiErrorCode::MissingToken
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        ApiErrorCode::internal(format!("unhandled rejection: {err:?}"))
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

/// Serialized as the bare variant name; detail travels in `ApiError::message`.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(into = "&'static str")]
pub enum ApiErrorCode {
    #[error("Authorization header with a bearer token is required")]
    MissingToken,
    #[error("Token has been revoked")]
    TokenRevoked,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("Token has the wrong type for this operation")]
    WrongTokenType,
    #[error("User not found")]
    UnknownUser,
    #[error("Account is inactive")]
    InactiveAccount,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already registered")]
    EmailTaken,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Not found")]
    NotFound,
    #[error("Not allowed to modify this resource")]
    Forbidden,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::MissingToken
            | ApiErrorCode::TokenRevoked
            | ApiErrorCode::InvalidToken
            | ApiErrorCode::WrongTokenType
            | ApiErrorCode::UnknownUser
            | ApiErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InactiveAccount | ApiErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ApiErrorCode::EmailTaken => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApiErrorCode> for &'static str {
    fn from(code: ApiErrorCode) -> Self {
        match code {
            ApiErrorCode::MissingToken => "MissingToken",
            ApiErrorCode::TokenRevoked => "TokenRevoked",
            ApiErrorCode::InvalidToken => "InvalidToken",
            ApiErrorCode::WrongTokenType => "WrongTokenType",
            ApiErrorCode::UnknownUser => "UnknownUser",
            ApiErrorCode::InactiveAccount => "InactiveAccount",
            ApiErrorCode::InvalidCredentials => "InvalidCredentials",
            ApiErrorCode::EmailTaken => "EmailTaken",
            ApiErrorCode::InvalidInput(_) => "InvalidInput",
            ApiErrorCode::NotFound => "NotFound",
            ApiErrorCode::Forbidden => "Forbidden",
            ApiErrorCode::MethodNotAllowed => "MethodNotAllowed",
            ApiErrorCode::InternalError => "InternalError",
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Revoked => ApiErrorCode::TokenRevoked,
            AuthError::Malformed => ApiErrorCode::InvalidToken,
            AuthError::WrongTokenType => ApiErrorCode::WrongTokenType,
            AuthError::UnknownSubject => ApiErrorCode::UnknownUser,
            AuthError::InactiveAccount => ApiErrorCode::InactiveAccount,
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::EmailTaken => ApiErrorCode::EmailTaken,
            AuthError::InvalidInput(e) => ApiErrorCode::InvalidInput(e),
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<BlogError> for ApiErrorCode {
    fn from(error: BlogError) -> Self {
        match error {
            BlogError::NotFound => ApiErrorCode::NotFound,
            BlogError::Forbidden => ApiErrorCode::Forbidden,
            BlogError::InvalidInput(e) => ApiErrorCode::InvalidInput(e),
            BlogError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}
