use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// The caller behind a verified access token, plus the token itself so that
/// logout can revoke exactly what was presented.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// `Authorization: <scheme> <token>`; the scheme is matched without regard
/// to case.
pub fn bearer_token(header: Option<&str>) -> Result<String, ApiErrorCode> {
    let credentials = header
        .map(str::trim)
        .and_then(|h| h.split_once(char::is_whitespace));
    match credentials {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(token.trim().to_string())
        }
        _ => Err(ApiErrorCode::MissingToken),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&ApiResponse::ok(HealthResponse {
        status: "healthy",
    })))
}

// region auth

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

pub async fn signup(
    body: CredentialsRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let signup_input = SignupInput {
        email: body.email,
        password: body.password,
    };
    let tokens = auth_service
        .signup(signup_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(tokens)),
        StatusCode::CREATED,
    ))
}

pub async fn signin(
    body: CredentialsRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let signin_input = SigninInput {
        email: body.email,
        password: body.password,
    };
    let tokens = auth_service
        .signin(signin_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(tokens)))
}

pub async fn refresh(
    authorization: Option<String>,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let refresh_token = bearer_token(authorization.as_deref()).map_err(reject::custom)?;
    let tokens = auth_service
        .rotate(&refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(tokens)))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn logout(
    session: Session,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(&session.token, session.user.id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    info!(user_id = %session.user.id, "logged out");

    Ok(warp::reply::json(&ApiResponse::ok(MessageResponse {
        message: "Successfully logged out",
    })))
}

// endregion

// region profile

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub email: String,
    #[serde(flatten)]
    pub profile: Profile,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            id: user.id,
            email: user.email,
            profile: user.profile,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

pub async fn get_profile(session: Session) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&ApiResponse::ok(ProfileResponse::from(
        session.user,
    ))))
}

pub async fn update_profile(
    session: Session,
    body: ProfileUpdate,
    profile_service: Arc<dyn ProfileService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = profile_service
        .update_profile(&session.user, body)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(ProfileResponse::from(
        user,
    ))))
}

// endregion

// region blogs

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

pub async fn create_blog(
    session: Session,
    body: NewBlog,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let blog = blog_service
        .create(session.user.id, body)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(blog)),
        StatusCode::CREATED,
    ))
}

pub async fn list_blogs(
    page: Page,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let blogs = blog_service
        .list_recent(page)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(blogs)))
}

pub async fn search_blogs(
    query: SearchQuery,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let page = Page {
        skip: query.skip,
        limit: query.limit,
    };
    let blogs = blog_service
        .search(&query.q, page)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(blogs)))
}

pub async fn list_blogs_by_category(
    category: String,
    page: Page,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let blogs = blog_service
        .list_by_category(&category, page)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(blogs)))
}

pub async fn get_blog(
    id: BlogId,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let blog = blog_service
        .get(id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(blog)))
}

pub async fn update_blog(
    id: BlogId,
    session: Session,
    body: BlogUpdate,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let blog = blog_service
        .update(session.user.id, id, body)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(blog)))
}

pub async fn delete_blog(
    id: BlogId,
    session: Session,
    blog_service: Arc<dyn BlogService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    blog_service
        .delete(session.user.id, id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT))
}

// endregion
