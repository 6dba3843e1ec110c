use crate::application_port::{BlogError, BlogService};
use crate::domain_model::*;
use crate::domain_port::BlogRepo;
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;

const MAX_TITLE_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 50;

pub struct RealBlogService {
    blog_repo: Arc<dyn BlogRepo>,
}

impl RealBlogService {
    pub fn new(blog_repo: Arc<dyn BlogRepo>) -> RealBlogService {
        RealBlogService { blog_repo }
    }

    async fn owned(&self, author: UserId, id: BlogId) -> Result<Blog, BlogError> {
        let blog = self
            .blog_repo
            .find_by_id(id)
            .await?
            .ok_or(BlogError::NotFound)?;
        if blog.author_id != author {
            return Err(BlogError::Forbidden);
        }
        Ok(blog)
    }
}

fn check_len(field: &str, value: &str, max: Option<usize>) -> Result<(), BlogError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(BlogError::InvalidInput(format!("{field} must not be empty")));
    }
    if let Some(max) = max {
        if len > max {
            return Err(BlogError::InvalidInput(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

fn check_page(page: Page) -> Result<(), BlogError> {
    if !page.is_valid() {
        return Err(BlogError::InvalidInput(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl BlogService for RealBlogService {
    async fn create(&self, author: UserId, input: NewBlog) -> Result<Blog, BlogError> {
        check_len("title", &input.title, Some(MAX_TITLE_LEN))?;
        check_len("content", &input.content, None)?;
        check_len("category", &input.category, Some(MAX_CATEGORY_LEN))?;

        let now = Utc::now();
        let blog = Blog {
            id: BlogId::new_v4(),
            title: input.title,
            content: input.content,
            category: input.category,
            author_id: author,
            created_at: now,
            updated_at: now,
        };
        self.blog_repo.insert(&blog).await?;
        debug!(blog_id = %blog.id, author_id = %author, "blog created");

        Ok(blog)
    }

    async fn get(&self, id: BlogId) -> Result<Blog, BlogError> {
        self.blog_repo
            .find_by_id(id)
            .await?
            .ok_or(BlogError::NotFound)
    }

    async fn list_recent(&self, page: Page) -> Result<Vec<Blog>, BlogError> {
        check_page(page)?;
        self.blog_repo.list_recent(page).await
    }

    async fn list_by_category(
        &self,
        category: &str,
        page: Page,
    ) -> Result<Vec<Blog>, BlogError> {
        check_page(page)?;
        self.blog_repo.list_by_category(category, page).await
    }

    async fn search(&self, query: &str, page: Page) -> Result<Vec<Blog>, BlogError> {
        check_page(page)?;
        if query.is_empty() {
            return Err(BlogError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }
        self.blog_repo.search(query, page).await
    }

    async fn update(
        &self,
        author: UserId,
        id: BlogId,
        update: BlogUpdate,
    ) -> Result<Blog, BlogError> {
        if let Some(title) = &update.title {
            check_len("title", title, Some(MAX_TITLE_LEN))?;
        }
        if let Some(content) = &update.content {
            check_len("content", content, None)?;
        }
        if let Some(category) = &update.category {
            check_len("category", category, Some(MAX_CATEGORY_LEN))?;
        }

        let blog = self.owned(author, id).await?;
        if update.is_empty() {
            return Ok(blog);
        }

        // only the provided columns are written; a concurrent edit of the
        // others is kept
        self.blog_repo
            .update(id, &update, Utc::now())
            .await?
            .ok_or(BlogError::NotFound)
    }

    async fn delete(&self, author: UserId, id: BlogId) -> Result<(), BlogError> {
        self.owned(author, id).await?;
        if !self.blog_repo.delete(id).await? {
            return Err(BlogError::NotFound);
        }
        debug!(blog_id = %id, author_id = %author, "blog deleted");
        Ok(())
    }
}
