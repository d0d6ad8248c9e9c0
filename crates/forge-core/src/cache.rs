//! Time-based revalidation hints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Caching strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// Revalidate each resource kind on its own interval.
    #[default]
    Timed,
    /// Never serve stale data.
    None,
}

/// Revalidation intervals per resource kind, in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub strategy: CacheStrategy,
    #[serde(default)]
    pub revalidate: HashMap<String, u64>,
}

impl CacheConfig {
    /// Revalidation interval for a resource kind, `None` when uncached or
    /// when the strategy disables caching.
    pub fn revalidate_for(&self, kind: &str) -> Option<u64> {
        match self.strategy {
            CacheStrategy::None => None,
            CacheStrategy::Timed => self.revalidate.get(kind).copied(),
        }
    }
}
