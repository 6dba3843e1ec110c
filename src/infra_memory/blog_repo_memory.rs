use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::cmp::Reverse;

#[derive(Default)]
pub struct MemoryBlogRepo {
    blogs: DashMap<BlogId, Blog>,
}

impl MemoryBlogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn page_where(&self, page: Page, keep: impl Fn(&Blog) -> bool) -> Vec<Blog> {
        let mut hits: Vec<Blog> = self
            .blogs
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        hits.sort_by_key(|b| (Reverse(b.created_at), b.id));
        hits.into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect()
    }
}

#[async_trait::async_trait]
impl BlogRepo for MemoryBlogRepo {
    async fn insert(&self, blog: &Blog) -> Result<(), BlogError> {
        self.blogs.insert(blog.id, blog.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, BlogError> {
        Ok(self.blogs.get(&id).map(|b| b.value().clone()))
    }

    async fn list_recent(&self, page: Page) -> Result<Vec<Blog>, BlogError> {
        Ok(self.page_where(page, |_| true))
    }

    async fn list_by_category(&self, category: &str, page: Page) -> Result<Vec<Blog>, BlogError> {
        Ok(self.page_where(page, |b| b.category == category))
    }

    async fn search(&self, query: &str, page: Page) -> Result<Vec<Blog>, BlogError> {
        let needle = query.to_lowercase();
        Ok(self.page_where(page, |b| {
            b.title.to_lowercase().contains(&needle)
                || b.content.to_lowercase().contains(&needle)
                || b.category.to_lowercase().contains(&needle)
        }))
    }

    async fn update(
        &self,
        id: BlogId,
        update: &BlogUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Blog>, BlogError> {
        Ok(self.blogs.get_mut(&id).map(|mut blog| {
            update.apply_to(&mut blog, updated_at);
            blog.value().clone()
        }))
    }

    async fn delete(&self, id: BlogId) -> Result<bool, BlogError> {
        Ok(self.blogs.remove(&id).is_some())
    }
}
