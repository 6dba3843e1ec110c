mod auth_service;
mod blog_service;
mod profile_service;

pub use auth_service::*;
pub use blog_service::*;
pub use profile_service::*;
