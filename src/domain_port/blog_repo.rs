use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

// All listings are ordered newest first.
#[async_trait::async_trait]
pub trait BlogRepo: Send + Sync {
    async fn insert(&self, blog: &Blog) -> Result<(), BlogError>;

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, BlogError>;

    async fn list_recent(&self, page: Page) -> Result<Vec<Blog>, BlogError>;

    async fn list_by_category(&self, category: &str, page: Page) -> Result<Vec<Blog>, BlogError>;

    /// Case-insensitive substring match over title, content and category.
    async fn search(&self, query: &str, page: Page) -> Result<Vec<Blog>, BlogError>;

    /// Write only the fields present in `update` plus `updated_at`, and
    /// return the stored post afterwards, or `None` when it is gone.
    async fn update(
        &self,
        id: BlogId,
        update: &BlogUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Blog>, BlogError>;

    async fn delete(&self, id: BlogId) -> Result<bool, BlogError>;
}
