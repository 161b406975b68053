//! Page-view events as stored by the site. Timestamps are naive: whatever the
//! ingestion side wrote, with second precision and no zone attached.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded visit to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PageViewEvent {
    pub id: i64,
    /// Absolute URL of the visited page. Never empty.
    pub page: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    /// Pseudonymous visitor id (40 hex chars), used for unique-visitor counts.
    pub anonymous_id: String,
    pub created_at: NaiveDateTime,
}

/// Insert shape for a page view; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPageView {
    pub page: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub anonymous_id: String,
    pub created_at: NaiveDateTime,
}
