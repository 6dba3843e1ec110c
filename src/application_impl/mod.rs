mod auth_service_impl;
mod authenticator;
mod blog_service_impl;
mod credential_hasher;
mod jwt_codec;
mod profile_service_impl;
mod session_issuer;

pub use auth_service_impl::*;
pub use authenticator::*;
pub use blog_service_impl::*;
pub use credential_hasher::*;
pub use jwt_codec::*;
pub use profile_service_impl::*;
pub use session_issuer::*;

#[cfg(test)]
pub(crate) mod testutil;
