//! Memoized analysis results keyed by filter fingerprint.
//!
//! Recomputation is cheap and idempotent, so the cache is best-effort:
//! a missing or corrupt cache file simply means recomputing.

use anyhow::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;

const CACHE_FILE: &str = ".verblens-cache.json";

/// Graph-derived tables for one filter fingerprint.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CachedAnalysis {
    /// (character, score, in_degree, out_degree), descending
    pub degree_ranking: Vec<(String, f64, usize, usize)>,
    pub betweenness_ranking: Vec<(String, f64, usize, usize)>,
    pub communities: Vec<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AnalysisCache {
    pub entries: DashMap<String, CachedAnalysis>,
}

impl AnalysisCache {
    pub fn load() -> Self {
        if let Ok(content) = fs::read_to_string(CACHE_FILE) {
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            AnalysisCache::default()
        }
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self)?;
        fs::write(CACHE_FILE, content)?;
        Ok(())
    }

    /// Returns a clone of the entry if present.
    /// Cloning avoids holding the shard lock for too long.
    pub fn get(&self, fingerprint: &str) -> Option<CachedAnalysis> {
        self.entries.get(fingerprint).map(|r| r.value().clone())
    }

    pub fn update(&self, fingerprint: String, analysis: CachedAnalysis) {
        self.entries.insert(fingerprint, analysis);
    }
}
