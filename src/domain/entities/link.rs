//! Short link entity: the code store's unit of record.

use chrono::{DateTime, Utc};

/// A short code and the URL it redirects to.
///
/// Created once by the shortening flow and never mutated afterwards, which is
/// what makes caching it with a plain TTL safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(id: i64, code: String, target_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            code,
            target_url,
            created_at,
        }
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub code: String,
    pub target_url: String,
}
