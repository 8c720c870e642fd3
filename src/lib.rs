//! verblens: graph analytics over a dataset of two-character Chinese verbs.
//!
//! Characters are nodes, verbs are directed edges. The crate loads the verb
//! table, builds the character graph and produces centrality rankings, word
//! families, tone-targeted practice paths, coverage sets, minimal tone
//! contrasts and study decks, written out through pluggable formatters.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod core;
pub mod format;
pub mod runner;
pub mod session;

pub use config::{Lang, OutputFormat, ReportKind, VerblensConfig};
pub use crate::core::{Edge, ToneFocus, VerbRecord};
pub use runner::{run, run_analysis};
