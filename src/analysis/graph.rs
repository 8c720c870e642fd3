//! Directed character graph built from aggregated verb edges.
//!
//! Nodes are kept in insertion order and addressed by index so that every
//! downstream algorithm iterates deterministically.

use crate::core::types::Edge;
use std::collections::HashMap;

/// Payload attached to a merged directed arc.
#[derive(Debug, Clone)]
pub struct ArcData {
    pub weight: u32,
    pub verb: String,
    pub pinyin: String,
    pub english: String,
    pub tone_pattern: String,
    pub src_tone: Option<u8>,
    pub dst_tone: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CharGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    arcs: Vec<(usize, usize, ArcData)>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    arc_lookup: HashMap<(usize, usize), usize>,
}

impl CharGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from aggregated edges. Parallel arcs between the same
    /// ordered pair merge by summing weight and keeping the first label.
    /// Edges with empty endpoints are skipped; self-loops are permitted.
    /// Empty input yields an empty graph, never an error.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            if edge.char1.is_empty() || edge.char2.is_empty() {
                continue;
            }
            graph.add_arc(edge);
        }
        graph
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(name.to_string());
        self.index.insert(name.to_string(), i);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        i
    }

    fn add_arc(&mut self, edge: &Edge) {
        let from = self.intern(&edge.char1);
        let to = self.intern(&edge.char2);

        if let Some(&arc) = self.arc_lookup.get(&(from, to)) {
            self.arcs[arc].2.weight += edge.weight;
            return;
        }

        let arc = self.arcs.len();
        self.arcs.push((
            from,
            to,
            ArcData {
                weight: edge.weight,
                verb: edge.verb.clone(),
                pinyin: edge.pinyin.clone(),
                english: edge.english.clone(),
                tone_pattern: edge.tone_pattern.clone(),
                src_tone: edge.src_tone,
                dst_tone: edge.dst_tone,
            },
        ));
        self.outgoing[from].push(arc);
        self.incoming[to].push(arc);
        self.arc_lookup.insert((from, to), arc);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in insertion order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn name(&self, node: usize) -> &str {
        &self.nodes[node]
    }

    pub fn node(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.outgoing[node].len()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.incoming[node].len()
    }

    /// Total incident arc count, directed.
    pub fn degree(&self, node: usize) -> usize {
        self.out_degree(node) + self.in_degree(node)
    }

    /// Outgoing neighbors with arc payloads, in insertion order.
    pub fn out_neighbors(&self, node: usize) -> impl Iterator<Item = (usize, &ArcData)> {
        self.outgoing[node].iter().map(|&a| {
            let (_, to, ref data) = self.arcs[a];
            (to, data)
        })
    }

    pub fn in_neighbors(&self, node: usize) -> impl Iterator<Item = (usize, &ArcData)> {
        self.incoming[node].iter().map(|&a| {
            let (from, _, ref data) = self.arcs[a];
            (from, data)
        })
    }

    pub fn arc(&self, from: usize, to: usize) -> Option<&ArcData> {
        self.arc_lookup.get(&(from, to)).map(|&a| &self.arcs[a].2)
    }

    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize, &ArcData)> {
        self.arcs.iter().map(|(f, t, d)| (*f, *t, d))
    }

    /// Most frequent tone role value for a node: mode over incoming dst
    /// tones and outgoing src tones, ties broken by the smaller tone.
    pub fn dominant_tone(&self, node: usize) -> Option<u8> {
        let mut counts = [0usize; 6];
        for (_, data) in self.in_neighbors(node) {
            if let Some(t) = data.dst_tone {
                counts[t as usize] += 1;
            }
        }
        for (_, data) in self.out_neighbors(node) {
            if let Some(t) = data.src_tone {
                counts[t as usize] += 1;
            }
        }
        (1..=5u8)
            .filter(|&t| counts[t as usize] > 0)
            .max_by_key(|&t| (counts[t as usize], std::cmp::Reverse(t)))
    }

    /// Undirected projection: arc weights between the same unordered pair
    /// are combined. Keys are ordered (min, max) node indices.
    pub fn undirected_weights(&self) -> HashMap<(usize, usize), f64> {
        let mut weights: HashMap<(usize, usize), f64> = HashMap::new();
        for (from, to, data) in self.arcs() {
            let key = (from.min(to), from.max(to));
            *weights.entry(key).or_insert(0.0) += data.weight as f64;
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(c1: &str, c2: &str, tp: &str, weight: u32) -> Edge {
        let (src, dst) = crate::core::loader::split_tone_pair(tp);
        Edge {
            char1: c1.into(),
            char2: c2.into(),
            weight,
            verb: format!("{}{}", c1, c2),
            pinyin: String::new(),
            english: String::new(),
            class_zh: String::new(),
            class_en: String::new(),
            tone_pattern: tp.into(),
            src_tone: src,
            dst_tone: dst,
        }
    }

    #[test]
    fn test_nodes_equal_characters_in_edges() {
        let edges = vec![
            edge("打", "开", "3-1", 1),
            edge("开", "门", "1-2", 1),
            edge("打", "门", "3-2", 1),
        ];
        let graph = CharGraph::from_edges(&edges);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.nodes(), &["打", "开", "门"]);
    }

    #[test]
    fn test_parallel_arcs_merge_weight() {
        let edges = vec![edge("打", "开", "3-1", 2), edge("打", "开", "3-4", 1)];
        let graph = CharGraph::from_edges(&edges);
        assert_eq!(graph.edge_count(), 1);
        let from = graph.node("打").unwrap();
        let to = graph.node("开").unwrap();
        let arc = graph.arc(from, to).unwrap();
        assert_eq!(arc.weight, 3);
        // First label wins
        assert_eq!(arc.tone_pattern, "3-1");
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = CharGraph::from_edges(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_blank_endpoints_skipped_and_self_loops_kept() {
        let edges = vec![edge("", "开", "1-1", 1), edge("想", "想", "3-3", 1)];
        let graph = CharGraph::from_edges(&edges);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        let n = graph.node("想").unwrap();
        assert_eq!(graph.out_degree(n), 1);
        assert_eq!(graph.in_degree(n), 1);
    }

    #[test]
    fn test_dominant_tone_mode_with_small_tie_break() {
        // 门 appears as dst with tone 2 twice, 開 as src tone 1 once
        let edges = vec![
            edge("开", "门", "1-2", 1),
            edge("关", "门", "1-2", 1),
            edge("门", "口", "2-3", 1),
        ];
        let graph = CharGraph::from_edges(&edges);
        let men = graph.node("门").unwrap();
        assert_eq!(graph.dominant_tone(men), Some(2));

        // Tie between tones 1 and 2: smaller wins
        let edges = vec![edge("看", "书", "1-4", 1), edge("说", "看", "3-2", 1)];
        let graph = CharGraph::from_edges(&edges);
        let kan = graph.node("看").unwrap();
        assert_eq!(graph.dominant_tone(kan), Some(1));
    }

    #[test]
    fn test_undirected_projection_combines_directions() {
        let edges = vec![edge("打", "开", "3-1", 2), edge("开", "打", "1-3", 1)];
        let graph = CharGraph::from_edges(&edges);
        let weights = graph.undirected_weights();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights.values().next().copied(), Some(3.0));
    }
}
