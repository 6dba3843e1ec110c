// store

mod revocation_store;

pub use revocation_store::*;

// repo

mod blog_repo;
mod user_repo;

pub use blog_repo::*;
pub use user_repo::*;
