//! Public tag listings.

use std::sync::Arc;

use domains::{Result, Tag, TagRepo, TagSort};

pub const LIST_LIMIT_MAX: i64 = 100;

pub struct TagService {
    tags: Arc<dyn TagRepo>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepo>) -> Self {
        Self { tags }
    }

    pub async fn list(&self, sort: TagSort, limit: i64) -> Result<Vec<Tag>> {
        self.tags
            .list(sort, limit.clamp(1, LIST_LIMIT_MAX), false)
            .await
    }

    /// Tags ordered by live question count, omitting unused ones.
    pub async fn popular(&self, limit: i64) -> Result<Vec<Tag>> {
        self.tags
            .list(TagSort::Popular, limit.clamp(1, LIST_LIMIT_MAX), true)
            .await
    }
}
