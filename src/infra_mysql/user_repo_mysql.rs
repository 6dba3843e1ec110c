use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

const USER_COLUMNS: &str = "user_id, email, password_hash, first_name, last_name, mobile, \
                            picture, country, is_active, created_at";

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    // affected-row counts skip rows whose values did not change
    async fn id_exists(&self, user_id: UserId) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(1) FROM user WHERE user_id = ?"#)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }

    fn row_to_user(row: MySqlRow) -> Result<User, AuthError> {
        let store = |e: sqlx::Error| AuthError::Store(e.to_string());

        let id: UserId = row.try_get("user_id").map_err(store)?;
        let email: String = row.try_get("email").map_err(store)?;
        let password_hash: String = row.try_get("password_hash").map_err(store)?;
        let profile = Profile {
            first_name: row.try_get("first_name").map_err(store)?,
            last_name: row.try_get("last_name").map_err(store)?,
            mobile: row.try_get("mobile").map_err(store)?,
            picture: row.try_get("picture").map_err(store)?,
            country: row.try_get("country").map_err(store)?,
        };
        let is_active: bool = row.try_get("is_active").map_err(store)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(store)?;

        Ok(User {
            id,
            email,
            password_hash,
            profile,
            is_active,
            created_at,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create(&self, user: &User) -> Result<(), AuthError> {
        sqlx::query(
            r#"
INSERT INTO user (user_id, email, password_hash, first_name, last_name, mobile, picture,
                  country, is_active, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile.first_name)
        .bind(&user.profile.last_name)
        .bind(&user.profile.mobile)
        .bind(&user.profile.picture)
        .bind(&user.profile.country)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::EmailTaken
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        let row_opt: Option<MySqlRow> =
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM user WHERE user_id = ?"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Store(format!("query user by id: {e}")))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row_opt: Option<MySqlRow> =
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AuthError::Store(format!("query user by email: {e}")))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, AuthError> {
        let changes = update.changes();
        if !changes.is_empty() {
            let mut builder = QueryBuilder::<MySql>::new("UPDATE user SET ");
            let mut columns = builder.separated(", ");
            for (column, value) in changes {
                columns.push(column);
                columns.push_unseparated(" = ");
                columns.push_bind_unseparated(value);
            }
            builder.push(" WHERE user_id = ");
            builder.push_bind(user_id);

            builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| AuthError::Store(format!("update profile: {e}")))?;
        }

        self.find_by_id(user_id).await
    }

    async fn set_active(&self, user_id: UserId, is_active: bool) -> Result<bool, AuthError> {
        let result = sqlx::query("UPDATE user SET is_active = ? WHERE user_id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        self.id_exists(user_id).await
    }
}
