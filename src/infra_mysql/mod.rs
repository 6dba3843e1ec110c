mod blog_repo_mysql;
mod revocation_store_mysql;
mod user_repo_mysql;

pub use blog_repo_mysql::*;
pub use revocation_store_mysql::*;
pub use user_repo_mysql::*;

mod util;
