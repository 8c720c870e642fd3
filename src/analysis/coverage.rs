//! Greedy set-cover character selection.
//!
//! Picks the characters whose verbs cover the most distinct verb edges.
//! Ties between equally-covering characters go to the lexicographically
//! smallest character, so a given edge set always selects identically.

use crate::core::types::Edge;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct CoverageResult {
    /// Characters in selection order
    pub selected: Vec<String>,
    /// Edge ids covered by the selection
    pub covered: HashSet<String>,
    /// Total edges in the pool
    pub total_edges: usize,
}

impl CoverageResult {
    pub fn coverage_percent(&self) -> f64 {
        if self.total_edges == 0 {
            return 0.0;
        }
        100.0 * self.covered.len() as f64 / self.total_edges as f64
    }
}

/// Repeatedly selects the character covering the most uncovered edges until
/// `max_characters` picks are made or nothing remains uncovered. An empty
/// pool returns an empty selection immediately.
pub fn optimize(edges: &[Edge], max_characters: usize) -> CoverageResult {
    let mut uncovered: HashSet<String> = edges.iter().map(|e| e.id()).collect();
    let total_edges = uncovered.len();
    let mut selected = Vec::new();

    while selected.len() < max_characters && !uncovered.is_empty() {
        // BTreeMap iteration gives the smallest character on count ties
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for edge in edges {
            if !uncovered.contains(&edge.id()) {
                continue;
            }
            *counts.entry(edge.char1.as_str()).or_insert(0) += 1;
            if edge.char2 != edge.char1 {
                *counts.entry(edge.char2.as_str()).or_insert(0) += 1;
            }
        }
        // Ascending iteration plus strictly-greater keeps the smallest
        // character when counts tie
        let mut best: Option<(&str, usize)> = None;
        for (&ch, &count) in &counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((ch, count)),
            }
        }
        let Some((best, _)) = best else { break };
        let best = best.to_string();

        uncovered.retain(|id| {
            let mut parts = id.splitn(2, '|');
            parts.next() != Some(best.as_str()) && parts.next() != Some(best.as_str())
        });
        selected.push(best);
    }

    let covered: HashSet<String> = edges
        .iter()
        .map(|e| e.id())
        .filter(|id| !uncovered.contains(id))
        .collect();

    CoverageResult {
        selected,
        covered,
        total_edges,
    }
}
