use std::sync::{Arc, RwLock};

use restock_core::ProductId;

use super::{RecommendationEntry, RecommendationLog};
use crate::error::StoreError;

/// In-memory log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRecommendationLog {
    entries: RwLock<Vec<RecommendationEntry>>,
}

impl InMemoryRecommendationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl RecommendationLog for InMemoryRecommendationLog {
    async fn append(&self, entry: &RecommendationEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::poisoned())?;
        entries.push(entry.clone());
        Ok(())
    }

    async fn list_for_product(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<RecommendationEntry>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::poisoned())?;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.product_id == product_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
