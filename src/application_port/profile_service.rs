use crate::application_port::AuthError;
use crate::domain_model::{ProfileUpdate, User};

#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    async fn update_profile(&self, user: &User, update: ProfileUpdate)
    -> Result<User, AuthError>;
}
