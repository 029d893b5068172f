use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::application::repos::{PostSearchFilter, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use crate::domain::types::PostStatus;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct PostSearchRow {
    id: i64,
    title: String,
    excerpt: String,
    body_markdown: String,
    published_at: Option<OffsetDateTime>,
    thumbnail_url: Option<String>,
}

impl From<PostSearchRow> for PostRecord {
    fn from(row: PostSearchRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            body_markdown: row.body_markdown,
            published_at: row.published_at,
            thumbnail_url: row.thumbnail_url,
        }
    }
}

impl PostgresRepositories {
    /// Exact rendition first, then the one closest in size.
    fn push_thumbnail_expr(qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push("(SELECT th.url FROM post_thumbnails th WHERE th.post_id = p.id ORDER BY (th.width = ");
        qb.push_bind(THUMBNAIL_WIDTH);
        qb.push(" AND th.height = ");
        qb.push_bind(THUMBNAIL_HEIGHT);
        qb.push(") DESC, ABS(th.width - ");
        qb.push_bind(THUMBNAIL_WIDTH);
        qb.push(") + ABS(th.height - ");
        qb.push_bind(THUMBNAIL_HEIGHT);
        qb.push("), th.id LIMIT 1)");
    }

    fn apply_search_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q PostSearchFilter) {
        qb.push(" AND p.status = ");
        qb.push_bind(PostStatus::Published);

        for term in &filter.terms {
            let pattern = format!("%{}%", escape_like(term));
            qb.push(" AND (p.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.excerpt ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR p.body_markdown ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if let Some(category) = filter.category.as_ref() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_categories pc WHERE pc.post_id = p.id AND pc.category_id IN (\
                 WITH RECURSIVE tree AS (SELECT c.id FROM categories c WHERE c.slug = ",
            );
            qb.push_bind(category.as_str());
            qb.push(
                " UNION SELECT child.id FROM categories child INNER JOIN tree ON child.parent_id = tree.id) \
                 SELECT id FROM tree))",
            );
        }

        if !filter.tags.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt INNER JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.slug = ANY(",
            );
            qb.push_bind(filter.tags.as_slice());
            qb.push("))");
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn search_posts(
        &self,
        filter: &PostSearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let limit = i64::from(limit.clamp(1, 100));
        let offset = i64::try_from(offset)
            .map_err(|_| RepoError::from_persistence("offset exceeds supported range"))?;

        let mut qb = QueryBuilder::new(
            "SELECT p.id, p.title, p.excerpt, p.body_markdown, p.published_at, ",
        );
        Self::push_thumbnail_expr(&mut qb);
        qb.push(" AS thumbnail_url FROM posts p WHERE 1=1 ");
        Self::apply_search_filter(&mut qb, filter);
        qb.push(" ORDER BY p.published_at DESC NULLS LAST, p.id DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<PostSearchRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_posts(&self, filter: &PostSearchFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p WHERE 1=1 ");
        Self::apply_search_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}

/// Escape `LIKE` wildcards so keyword terms match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
