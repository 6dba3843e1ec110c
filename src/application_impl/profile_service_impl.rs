use crate::application_port::{AuthError, ProfileService};
use crate::domain_model::{ProfileUpdate, User};
use crate::domain_port::UserRepo;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 50;
const MAX_MOBILE_LEN: usize = 10;
const MAX_COUNTRY_LEN: usize = 10;

pub struct RealProfileService {
    user_repo: Arc<dyn UserRepo>,
}

impl RealProfileService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealProfileService {
        RealProfileService { user_repo }
    }
}

fn check_max(field: &str, value: &Option<Option<String>>, max: usize) -> Result<(), AuthError> {
    match value.as_ref().and_then(Option::as_ref) {
        Some(v) if v.chars().count() > max => Err(AuthError::InvalidInput(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

fn validate(update: &ProfileUpdate) -> Result<(), AuthError> {
    check_max("first_name", &update.first_name, MAX_NAME_LEN)?;
    check_max("last_name", &update.last_name, MAX_NAME_LEN)?;
    check_max("mobile", &update.mobile, MAX_MOBILE_LEN)?;
    check_max("country", &update.country, MAX_COUNTRY_LEN)?;
    Ok(())
}

#[async_trait::async_trait]
impl ProfileService for RealProfileService {
    async fn update_profile(
        &self,
        user: &User,
        update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        validate(&update)?;

        // written field by field, so concurrent updates of other fields survive
        self.user_repo
            .update_profile(user.id, &update)
            .await?
            .ok_or(AuthError::UnknownSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::testutil::TestStack;
    use crate::domain_model::{Profile, UserId};
    use crate::infra_memory::MemoryUserRepo;
    use chrono::Utc;

    #[tokio::test]
    async fn persists_partial_updates() {
        let stack = TestStack::new();
        let user = stack.user("test@example.com").await;
        let service = RealProfileService::new(stack.users.clone());

        let updated = service
            .update_profile(
                &user,
                ProfileUpdate {
                    first_name: Some(Some("Updated".into())),
                    country: Some(Some("USA".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.first_name.as_deref(), Some("Updated"));

        let stored = stack.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.profile, updated.profile);
        assert_eq!(stored.profile.country.as_deref(), Some("USA"));
        assert_eq!(stored.profile.last_name, None);
    }

    #[tokio::test]
    async fn rejects_oversized_fields() {
        let stack = TestStack::new();
        let user = stack.user("test@example.com").await;
        let service = RealProfileService::new(stack.users.clone());

        let err = service
            .update_profile(
                &user,
                ProfileUpdate {
                    mobile: Some(Some("12345678901".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        let stored = stack.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.profile.mobile, None);
    }

    #[tokio::test]
    async fn updates_from_the_same_snapshot_do_not_overwrite_each_other() {
        let stack = TestStack::new();
        let snapshot = stack.user("test@example.com").await;
        let service = RealProfileService::new(stack.users.clone());

        service
            .update_profile(
                &snapshot,
                ProfileUpdate {
                    first_name: Some(Some("Ann".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = service
            .update_profile(
                &snapshot,
                ProfileUpdate {
                    last_name: Some(Some("Lee".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile.first_name.as_deref(), Some("Ann"));
        assert_eq!(updated.profile.last_name.as_deref(), Some("Lee"));
        let stored = stack.users.find_by_id(snapshot.id).await.unwrap().unwrap();
        assert_eq!(stored.profile, updated.profile);
    }

    #[tokio::test]
    async fn explicit_null_clears_a_field() {
        let stack = TestStack::new();
        let user = stack.user("test@example.com").await;
        let service = RealProfileService::new(stack.users.clone());

        service
            .update_profile(
                &user,
                ProfileUpdate {
                    picture: Some(Some("https://example.com/me.png".into())),
                    country: Some(Some("USA".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = service
            .update_profile(
                &user,
                ProfileUpdate {
                    picture: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.profile.picture, None);
        assert_eq!(updated.profile.country.as_deref(), Some("USA"));
    }

    #[tokio::test]
    async fn vanished_user_is_unknown() {
        let users = Arc::new(MemoryUserRepo::new());
        let service = RealProfileService::new(users.clone());
        let user = User {
            id: UserId::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "!".to_string(),
            profile: Profile::default(),
            is_active: true,
            created_at: Utc::now(),
        };
        users.create(&user).await.unwrap();
        users.remove(user.id);

        let err = service
            .update_profile(&user, ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownSubject));
    }
}
