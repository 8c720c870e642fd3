//! Dataset model, ingestion boundary and filter selection.

pub mod filter;
pub mod loader;
pub mod types;

pub use filter::FilterSelection;
pub use loader::{CsvSource, DataSource, LoadError, LoadedData, aggregate_edges};
pub use types::{AnalysisEvent, Edge, ToneFocus, VerbRecord};
