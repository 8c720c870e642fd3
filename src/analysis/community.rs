//! Greedy modularity community detection ("word families").
//!
//! CNM-style agglomeration on the undirected projection of the character
//! graph. Merges are taken in strictly-best order with a fixed tie-break on
//! the lowest community index pair, so the result is reproducible for a
//! given graph.

use crate::analysis::graph::CharGraph;
use std::collections::HashMap;

/// Detects communities and returns them as character lists, largest first,
/// filtered to `min_size` members. Communities of graphs with no edges are
/// singletons and fall out for any min_size > 1.
pub fn detect(graph: &CharGraph, min_size: usize) -> Vec<Vec<String>> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let weights = graph.undirected_weights();
    let total: f64 = weights.values().sum();

    // members[i] is None once community i has been merged away
    let mut members: Vec<Option<Vec<usize>>> = (0..n).map(|v| Some(vec![v])).collect();

    if total > 0.0 {
        // e[(i, j)]: w_ij / 2m between communities i and j (ordered key,
        // i < j); ends[i] is a_i = k_i / 2m. Self-loops only contribute to
        // the end counts.
        let mut between: HashMap<(usize, usize), f64> = HashMap::new();
        let mut ends = vec![0.0f64; n];

        for (&(u, v), &w) in &weights {
            let frac = w / (2.0 * total);
            if u == v {
                ends[u] += 2.0 * frac;
            } else {
                *between.entry((u, v)).or_insert(0.0) += frac;
                ends[u] += frac;
                ends[v] += frac;
            }
        }

        loop {
            // Best merge among currently-connected community pairs
            let mut best: Option<((usize, usize), f64)> = None;
            let mut pairs: Vec<(usize, usize)> = between
                .iter()
                .filter(|&(_, &w)| w > 0.0)
                .map(|(&k, _)| k)
                .collect();
            pairs.sort_unstable();
            for key in pairs {
                let (i, j) = key;
                let delta = 2.0 * (between[&key] - ends[i] * ends[j]);
                match best {
                    Some((_, best_delta)) if delta <= best_delta => {}
                    _ => best = Some((key, delta)),
                }
            }

            let Some(((i, j), delta)) = best else { break };
            if delta <= 0.0 {
                break;
            }

            // Merge j into i; both sides are active because `between` only
            // ever keys live communities
            let Some(absorbed) = members[j].take() else { break };
            match members[i].as_mut() {
                Some(target) => target.extend(absorbed),
                None => break,
            }

            between.remove(&(i, j));
            ends[i] += ends[j];
            ends[j] = 0.0;

            // Redirect j's remaining connections to i
            let redirect: Vec<((usize, usize), f64)> = between
                .iter()
                .filter(|&(&(a, b), _)| a == j || b == j)
                .map(|(&k, &w)| (k, w))
                .collect();
            for (key, w) in redirect {
                between.remove(&key);
                let other = if key.0 == j { key.1 } else { key.0 };
                let merged_key = (i.min(other), i.max(other));
                *between.entry(merged_key).or_insert(0.0) += w;
            }
        }
    }

    let mut communities: Vec<Vec<String>> = members
        .into_iter()
        .flatten()
        .filter(|c| c.len() >= min_size)
        .map(|mut c| {
            c.sort_unstable();
            c.into_iter().map(|v| graph.name(v).to_string()).collect()
        })
        .collect();

    // Largest first; first member breaks size ties
    communities.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a[0].cmp(&b[0])));
    communities
}
