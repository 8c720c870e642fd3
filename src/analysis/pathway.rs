//! Biased random-walk learning pathways.
//!
//! A greedy walk over the character graph that prefers arcs matching a
//! target tone transition. The jitter term comes from a generator seeded by
//! the caller, so identical inputs always produce the identical path.

use crate::analysis::graph::{ArcData, CharGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Edge row traversed by a pathway, for the report table.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub char1: String,
    pub char2: String,
    pub verb: String,
    pub pinyin: String,
    pub english: String,
    pub tone_pattern: String,
}

/// Generates a simple path of at most `length` characters starting at
/// `start`, biased toward arcs whose tone pair equals `target`.
///
/// A start character absent from the graph means no path is possible and
/// yields an empty sequence; the walk also stops early once no unvisited
/// outgoing candidate remains.
pub fn generate_path(
    graph: &CharGraph,
    start: &str,
    target: (u8, u8),
    length: usize,
    seed: u64,
) -> Vec<String> {
    let Some(start_node) = graph.node(start) else {
        return Vec::new();
    };
    if length == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut path = vec![start_node];
    let mut visited: HashSet<usize> = HashSet::from([start_node]);
    let mut current = start_node;

    for _ in 1..length {
        let mut best: Option<(f64, usize)> = None;
        for (candidate, arc) in graph.out_neighbors(current) {
            if visited.contains(&candidate) {
                continue;
            }
            let score = candidate_score(graph, candidate, arc, target)
                + 0.01 * rng.random::<f64>();
            match best {
                Some((best_score, best_node))
                    if score < best_score
                        || (score == best_score
                            && graph.name(candidate) >= graph.name(best_node)) => {}
                _ => best = Some((score, candidate)),
            }
        }
        let Some((_, next)) = best else { break };
        visited.insert(next);
        path.push(next);
        current = next;
    }

    path.into_iter().map(|v| graph.name(v).to_string()).collect()
}

fn candidate_score(graph: &CharGraph, candidate: usize, arc: &ArcData, target: (u8, u8)) -> f64 {
    let mut score = 0.0;
    if arc.src_tone == Some(target.0) && arc.dst_tone == Some(target.1) {
        score += 3.0;
    }
    score += 0.5 * (1.0 + arc.weight as f64).ln();
    score += 0.2 * graph.degree(candidate) as f64;
    score
}

/// The verbs traversed along a generated path.
pub fn verbs_on_path(graph: &CharGraph, path: &[String]) -> Vec<PathStep> {
    path.windows(2)
        .filter_map(|pair| {
            let from = graph.node(&pair[0])?;
            let to = graph.node(&pair[1])?;
            let arc = graph.arc(from, to)?;
            Some(PathStep {
                char1: pair[0].clone(),
                char2: pair[1].clone(),
                verb: arc.verb.clone(),
                pinyin: arc.pinyin.clone(),
                english: arc.english.clone(),
                tone_pattern: arc.tone_pattern.clone(),
            })
        })
        .collect()
}
