use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Default)]
pub struct MemoryUserRepo {
    users: DashMap<UserId, User>,
    by_email: DashMap<String, UserId>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an account deletion; storage-level cascades are out of
    /// scope here.
    pub fn remove(&self, user_id: UserId) -> Option<User> {
        let (_, user) = self.users.remove(&user_id)?;
        self.by_email.remove(&user.email);
        Some(user)
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, user: &User) -> Result<(), AuthError> {
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AuthError::EmailTaken),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let Some(user_id) = self.by_email.get(email).map(|id| *id.value()) else {
            return Ok(None);
        };
        self.find_by_id(user_id).await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_mut(&user_id).map(|mut user| {
            update.apply_to(&mut user.profile);
            user.value().clone()
        }))
    }

    async fn set_active(&self, user_id: UserId, is_active: bool) -> Result<bool, AuthError> {
        Ok(match self.users.get_mut(&user_id) {
            Some(mut user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        })
    }
}
