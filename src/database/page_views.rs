//! Bulk access to stored page views.
//!
//! The dashboard always reads the complete table; there is no paging or
//! filtering. Writes only come from the demo seeder.

use async_trait::async_trait;
use std::sync::Arc;

use super::DatabasePool;
use crate::error::StoreError;
use crate::models::{NewPageView, PageViewEvent};

#[async_trait]
pub trait PageViewRepository: Send + Sync {
    /// Every stored event, in insertion order.
    async fn all(&self) -> Result<Vec<PageViewEvent>, StoreError>;

    /// Stores one event and returns its id. Empty page URLs are rejected.
    async fn insert(&self, view: NewPageView) -> Result<i64, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

pub type SharedPageViewStore = Arc<dyn PageViewRepository>;

#[derive(Clone)]
pub struct PgPageViewStore {
    pool: DatabasePool,
}

impl PgPageViewStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageViewRepository for PgPageViewStore {
    async fn all(&self) -> Result<Vec<PageViewEvent>, StoreError> {
        let events = sqlx::query_as::<_, PageViewEvent>(
            r#"
            SELECT id, page, referrer, user_agent, anonymous_id, created_at
            FROM page_view_events
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        tracing::debug!("Loaded {} page view events", events.len());
        Ok(events)
    }

    async fn insert(&self, view: NewPageView) -> Result<i64, StoreError> {
        if view.page.trim().is_empty() {
            return Err(StoreError::EmptyPage);
        }

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO page_view_events (page, referrer, user_agent, anonymous_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&view.page)
        .bind(&view.referrer)
        .bind(&view.user_agent)
        .bind(&view.anonymous_id)
        .bind(view.created_at)
        .fetch_one(&*self.pool)
        .await?;

        Ok(id)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM page_view_events")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }
}
