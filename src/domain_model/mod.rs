mod blog;
mod token;
mod unit;
mod user;

pub use blog::*;
pub use token::*;
pub use unit::*;
pub use user::*;
