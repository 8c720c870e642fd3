//! Graph-analytics core: graph construction, centrality, communities,
//! pathways, coverage, contrasts, decks and tone statistics.

pub mod centrality;
pub mod community;
pub mod contrast;
pub mod coverage;
pub mod deck;
pub mod graph;
pub mod pathway;
pub mod stats;

// Re-export commonly used items
pub use centrality::{RankedNode, betweenness_centrality, degree_centrality, top_k};
pub use contrast::{ContrastPair, find_contrasts};
pub use coverage::{CoverageResult, optimize};
pub use deck::{DeckWeighting, build_deck};
pub use graph::CharGraph;
pub use pathway::{PathStep, generate_path, verbs_on_path};
