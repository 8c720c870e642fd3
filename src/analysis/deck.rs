//! Curriculum deck sampling.
//!
//! Draws a weighted sample of edges (without replacement) from the filtered
//! pool, suitable for export as an Anki-style study deck. The random source
//! is seeded by the caller, so a deck is reproducible.

use crate::analysis::graph::CharGraph;
use crate::core::types::Edge;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeckWeighting {
    /// 1 + ln(1 + weight) + 0.5 * (deg(char1) + deg(char2))
    #[default]
    Degree,
    Uniform,
}

/// Samples up to `size` edges from the pool, sorted by tone pattern for a
/// grouped study order. An empty pool yields an empty deck.
pub fn build_deck(
    pool: &[Edge],
    graph: &CharGraph,
    size: usize,
    weighting: DeckWeighting,
    seed: u64,
) -> Vec<Edge> {
    if pool.is_empty() || size == 0 {
        return Vec::new();
    }

    let mut weights: Vec<f64> = pool
        .iter()
        .map(|e| match weighting {
            DeckWeighting::Uniform => 1.0,
            DeckWeighting::Degree => {
                let deg = |c: &str| graph.node(c).map(|n| graph.degree(n)).unwrap_or(0);
                1.0 + (1.0 + e.weight as f64).ln()
                    + 0.5 * (deg(&e.char1) + deg(&e.char2)) as f64
            }
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut remaining: Vec<usize> = (0..pool.len()).collect();
    let mut chosen = Vec::new();
    let k = size.min(pool.len());

    // Proportional selection without replacement
    while chosen.len() < k {
        let total: f64 = remaining.iter().map(|&i| weights[i]).sum();
        let mut draw = rng.random::<f64>() * total;
        let mut pick = remaining.len() - 1;
        for (slot, &i) in remaining.iter().enumerate() {
            draw -= weights[i];
            if draw <= 0.0 {
                pick = slot;
                break;
            }
        }
        let index = remaining.swap_remove(pick);
        weights[index] = 0.0;
        chosen.push(pool[index].clone());
    }

    chosen.sort_by(|a, b| {
        a.tone_pattern
            .cmp(&b.tone_pattern)
            .then_with(|| a.verb.cmp(&b.verb))
    });
    chosen
}
