use super::error::*;
use super::handler::{self, Session};
use crate::application_port::AuthService;
use crate::domain_model::{BlogId, Page, TokenType};
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path!("health")
        .and(warp::get())
        .and_then(handler::health);

    let signup = warp::path!("auth" / "signup")
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::signup);

    let signin = warp::path!("auth" / "signin")
        .and(warp::post())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::signin);

    let refresh = warp::path!("auth" / "refresh")
        .and(warp::post())
        .and(warp::header::optional::<String>(
            http::header::AUTHORIZATION.as_str(),
        ))
        .and(with(server.auth_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::path!("auth" / "logout")
        .and(warp::post())
        .and(with_auth(server.auth_service.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let get_profile = warp::path!("profile")
        .and(warp::get())
        .and(with_auth(server.auth_service.clone()))
        .and_then(handler::get_profile);

    let update_profile = warp::path!("profile")
        .and(warp::put())
        .and(with_auth(server.auth_service.clone()))
        .and(warp::body::json())
        .and(with(server.profile_service.clone()))
        .and_then(handler::update_profile);

    let create_blog = warp::path!("blogs")
        .and(warp::post())
        .and(with_auth(server.auth_service.clone()))
        .and(warp::body::json())
        .and(with(server.blog_service.clone()))
        .and_then(handler::create_blog);

    let list_blogs = warp::path!("blogs")
        .and(warp::get())
        .and(warp::query::<Page>())
        .and(with(server.blog_service.clone()))
        .and_then(handler::list_blogs);

    let search_blogs = warp::path!("blogs" / "search")
        .and(warp::get())
        .and(warp::query::<handler::SearchQuery>())
        .and(with(server.blog_service.clone()))
        .and_then(handler::search_blogs);

    let blogs_by_category = warp::path!("blogs" / "category" / String)
        .and(warp::get())
        .and(warp::query::<Page>())
        .and(with(server.blog_service.clone()))
        .and_then(handler::list_blogs_by_category);

    let get_blog = warp::path!("blogs" / BlogId)
        .and(warp::get())
        .and(with(server.blog_service.clone()))
        .and_then(handler::get_blog);

    let update_blog = warp::path!("blogs" / BlogId)
        .and(warp::put())
        .and(with_auth(server.auth_service.clone()))
        .and(warp::body::json())
        .and(with(server.blog_service.clone()))
        .and_then(handler::update_blog);

    let delete_blog = warp::path!("blogs" / BlogId)
        .and(warp::delete())
        .and(with_auth(server.auth_service.clone()))
        .and(with(server.blog_service.clone()))
        .and_then(handler::delete_blog);

    let auth = signup.or(signin).or(refresh).or(logout);
    let profile = get_profile.or(update_profile);
    let blogs = create_blog
        .or(list_blogs)
        .or(search_blogs)
        .or(blogs_by_category)
        .or(get_blog)
        .or(update_blog)
        .or(delete_blog);

    health.or(auth).or(profile).or(blogs)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Resolves the bearer token as an access token. Every protected route goes
/// through here.
fn with_auth(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Session,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_str()).and_then(
        move |header: Option<String>| {
            let auth_service = auth_service.clone();
            async move {
                let token = handler::bearer_token(header.as_deref()).map_err(reject::custom)?;
                let user = auth_service
                    .resolve(&token, TokenType::Access)
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)?;
                Ok::<_, warp::Rejection>(Session { user, token })
            }
        },
    )
}
