use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new user. A duplicate email yields `AuthError::EmailTaken`.
    async fn create(&self, user: &User) -> Result<(), AuthError>;

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Write only the fields present in `update` and return the stored user
    /// afterwards, or `None` when the user is gone.
    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AuthError>;

    /// Returns false when the user is gone.
    async fn set_active(&self, user_id: UserId, is_active: bool) -> Result<bool, AuthError>;
}
