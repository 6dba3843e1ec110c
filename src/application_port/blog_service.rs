use crate::domain_model::{Blog, BlogId, BlogUpdate, NewBlog, Page, UserId};

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("blog post not found")]
    NotFound,
    #[error("not the author of this blog post")]
    Forbidden,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store error: {0}")]
    Store(String),
}

#[async_trait::async_trait]
pub trait BlogService: Send + Sync {
    async fn create(&self, author: UserId, input: NewBlog) -> Result<Blog, BlogError>;
    async fn get(&self, id: BlogId) -> Result<Blog, BlogError>;
    async fn list_recent(&self, page: Page) -> Result<Vec<Blog>, BlogError>;
    async fn list_by_category(&self, category: &str, page: Page)
    -> Result<Vec<Blog>, BlogError>;
    async fn search(&self, query: &str, page: Page) -> Result<Vec<Blog>, BlogError>;
    async fn update(
        &self,
        author: UserId,
        id: BlogId,
        update: BlogUpdate,
    ) -> Result<Blog, BlogError>;
    async fn delete(&self, author: UserId, id: BlogId) -> Result<(), BlogError>;
}
