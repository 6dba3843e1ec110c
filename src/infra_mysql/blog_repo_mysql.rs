use super::util::like_pattern;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

const BLOG_COLUMNS: &str = "blog_id, title, content, category, author_id, created_at, updated_at";

pub struct MySqlBlogRepo {
    pool: MySqlPool,
}

impl MySqlBlogRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlBlogRepo { pool }
    }

    fn row_to_blog(row: MySqlRow) -> Result<Blog, BlogError> {
        let store = |e: sqlx::Error| BlogError::Store(e.to_string());

        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(store)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(store)?;
        Ok(Blog {
            id: row.try_get("blog_id").map_err(store)?,
            title: row.try_get("title").map_err(store)?,
            content: row.try_get("content").map_err(store)?,
            category: row.try_get("category").map_err(store)?,
            author_id: row.try_get("author_id").map_err(store)?,
            created_at,
            updated_at,
        })
    }

    fn rows_to_blogs(rows: Vec<MySqlRow>) -> Result<Vec<Blog>, BlogError> {
        rows.into_iter().map(Self::row_to_blog).collect()
    }
}

#[async_trait::async_trait]
impl BlogRepo for MySqlBlogRepo {
    async fn insert(&self, blog: &Blog) -> Result<(), BlogError> {
        sqlx::query(
            r#"
INSERT INTO blog (blog_id, title, content, category, author_id, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(&blog.category)
        .bind(blog.author_id)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| BlogError::Store(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, BlogError> {
        let row_opt: Option<MySqlRow> =
            sqlx::query(&format!("SELECT {BLOG_COLUMNS} FROM blog WHERE blog_id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| BlogError::Store(format!("query blog: {e}")))?;

        row_opt.map(Self::row_to_blog).transpose()
    }

    async fn list_recent(&self, page: Page) -> Result<Vec<Blog>, BlogError> {
        let rows = sqlx::query(&format!(
            r#"
SELECT {BLOG_COLUMNS}
FROM blog
ORDER BY created_at DESC, blog_id
LIMIT ? OFFSET ?
"#
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlogError::Store(format!("list blogs: {e}")))?;

        Self::rows_to_blogs(rows)
    }

    async fn list_by_category(&self, category: &str, page: Page) -> Result<Vec<Blog>, BlogError> {
        let rows = sqlx::query(&format!(
            r#"
SELECT {BLOG_COLUMNS}
FROM blog
WHERE category = ?
ORDER BY created_at DESC, blog_id
LIMIT ? OFFSET ?
"#
        ))
        .bind(category)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlogError::Store(format!("list blogs by category: {e}")))?;

        Self::rows_to_blogs(rows)
    }

    async fn search(&self, query: &str, page: Page) -> Result<Vec<Blog>, BlogError> {
        let pattern = like_pattern(query);
        let rows = sqlx::query(&format!(
            r#"
SELECT {BLOG_COLUMNS}
FROM blog
WHERE LOWER(title) LIKE ? OR LOWER(content) LIKE ? OR LOWER(category) LIKE ?
ORDER BY created_at DESC, blog_id
LIMIT ? OFFSET ?
"#
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlogError::Store(format!("search blogs: {e}")))?;

        Self::rows_to_blogs(rows)
    }

    async fn update(
        &self,
        id: BlogId,
        update: &BlogUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Blog>, BlogError> {
        sqlx::query(
            r#"
UPDATE blog
SET title = COALESCE(?, title),
    content = COALESCE(?, content),
    category = COALESCE(?, category),
    updated_at = ?
WHERE blog_id = ?
"#,
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.category)
        .bind(updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| BlogError::Store(format!("update blog: {e}")))?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: BlogId) -> Result<bool, BlogError> {
        let result = sqlx::query("DELETE FROM blog WHERE blog_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| BlogError::Store(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
