//! Degree and betweenness centrality over the character graph.

use crate::analysis::graph::CharGraph;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Degree centrality per node, normalized by (n - 1).
/// Scores map node index -> score; all zeros for graphs with fewer than
/// 2 nodes.
pub fn degree_centrality(graph: &CharGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n < 2 {
        return vec![0.0; n];
    }
    let norm = (n - 1) as f64;
    (0..n).map(|v| graph.degree(v) as f64 / norm).collect()
}

/// Shortest-path betweenness centrality (Brandes) over the directed graph,
/// treating every arc as unit cost. Normalized by (n-1)(n-2).
///
/// Source nodes are independent, so the accumulation runs per-source in
/// parallel and partial sums are reduced at the end.
pub fn betweenness_centrality(graph: &CharGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n < 3 {
        return vec![0.0; n];
    }

    let mut scores = (0..n)
        .into_par_iter()
        .map(|source| single_source_dependency(graph, source))
        .reduce(
            || vec![0.0; n],
            |mut acc, partial| {
                for (a, p) in acc.iter_mut().zip(partial) {
                    *a += p;
                }
                acc
            },
        );

    let norm = ((n - 1) * (n - 2)) as f64;
    for score in &mut scores {
        *score /= norm;
    }
    scores
}

/// One Brandes iteration: BFS from `source`, then back-propagate pair
/// dependencies along the predecessor DAG.
fn single_source_dependency(graph: &CharGraph, source: usize) -> Vec<f64> {
    let n = graph.node_count();
    let mut stack = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist = vec![-1i64; n];

    sigma[source] = 1.0;
    dist[source] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        stack.push(v);
        for (w, _) in graph.out_neighbors(v) {
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1 {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    let mut dependency = vec![0.0f64; n];
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != source {
            dependency[w] = delta[w];
        }
    }
    dependency
}

/// Ranked centrality row for report output.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode {
    pub character: String,
    pub score: f64,
    pub in_degree: usize,
    pub out_degree: usize,
}

/// Top-k nodes by score, descending; ties broken by character ascending so
/// repeated runs rank identically.
pub fn top_k(graph: &CharGraph, scores: &[f64], k: usize) -> Vec<RankedNode> {
    let mut ranked: Vec<usize> = (0..graph.node_count()).collect();
    ranked.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| graph.name(a).cmp(graph.name(b)))
    });
    ranked
        .into_iter()
        .take(k)
        .map(|v| RankedNode {
            character: graph.name(v).to_string(),
            score: scores[v],
            in_degree: graph.in_degree(v),
            out_degree: graph.out_degree(v),
        })
        .collect()
}
