use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct BlogId(pub uuid::Uuid);

impl BlogId {
    pub fn new_v4() -> Self {
        BlogId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BlogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(BlogId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl BlogUpdate {
    pub fn apply_to(&self, blog: &mut Blog, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            blog.title = title.clone();
        }
        if let Some(content) = &self.content {
            blog.content = content.clone();
        }
        if let Some(category) = &self.category {
            blog.category = category.clone();
        }
        blog.updated_at = now;
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }
}
