use crate::analysis::deck::DeckWeighting;
use crate::core::filter::FilterSelection;
use crate::core::types::ToneFocus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Plain,
    Csv,
    Json,
    Markdown,
}

/// Which report the run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportKind {
    /// Category distribution and phonetic component breakdown
    #[default]
    Overview,
    /// Degree and betweenness rankings
    Centrality,
    /// Word families via modularity communities
    Communities,
    /// Biased tone-transition walk from a start character
    Pathway,
    /// Greedy set-cover character selection
    Coverage,
    /// Minimal tone-contrast pairs
    Contrasts,
    /// Weighted study deck sample
    Deck,
    /// Single-character tone profile
    Profile,
    /// 5x5 src-to-dst tone matrix
    Matrix,
    /// Polyphonic characters and 3-3 sandhi verbs
    Pitfalls,
}

/// Display language for classification values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    En,
    Zh,
}

/// Main configuration for verblens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerblensConfig {
    /// Path to the verbs CSV dataset
    pub data: PathBuf,
    /// Path to the output file
    pub output: PathBuf,
    /// Report format (Plain, CSV, JSON, Markdown)
    pub output_format: OutputFormat,
    /// Which report to produce
    pub report: ReportKind,
    /// Classification language used by filters and tables
    pub lang: Lang,
    /// Rows in ranked tables
    pub top_k: usize,
    /// Minimum community size to report
    pub min_community_size: usize,
    /// Pathway: start character
    pub start_char: Option<String>,
    /// Pathway: target tone pair, e.g. "3-1"
    pub target_tone_pair: Option<String>,
    /// Pathway: requested length in characters
    pub path_length: usize,
    /// Seed for pathway jitter and deck sampling
    pub seed: u64,
    /// Coverage: maximum characters to select
    pub max_characters: usize,
    /// Contrasts: which tone position must differ
    pub tone_focus: ToneFocus,
    /// Contrasts: rows shown in the report table
    pub contrast_display_cap: usize,
    /// Deck: number of cards
    pub deck_size: usize,
    /// Deck: sampling weights
    pub deck_weighting: DeckWeighting,
    /// Profile: the character to profile
    pub profile_char: Option<String>,
    /// Skip the on-disk memo cache
    pub no_cache: bool,
    /// Enable verbose logging to stdout
    pub verbose: bool,
    /// Current filter selection; empty means the full dataset.
    /// Kept last so the TOML table serializes after plain values.
    pub filter: FilterSelection,
}

impl VerblensConfig {
    /// Validates the configuration, ensuring the dataset path exists.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.data.exists() {
            anyhow::bail!("Dataset does not exist: {:?}", self.data);
        }
        match self.report {
            ReportKind::Pathway if self.start_char.is_none() => {
                anyhow::bail!("Pathway report requires a start character (--start)")
            }
            ReportKind::Profile if self.profile_char.is_none() => {
                anyhow::bail!("Profile report requires a character (--profile)")
            }
            _ => Ok(()),
        }
    }

    /// Attempts to load configuration from `verblens.toml` in the current
    /// directory.
    pub fn load_from_file() -> Option<Self> {
        std::fs::read_to_string("verblens.toml")
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
    }
}

impl Default for VerblensConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/two_char_verbs.csv"),
            output: PathBuf::from("verblens-report.txt"),
            output_format: OutputFormat::Plain,
            report: ReportKind::Overview,
            lang: Lang::En,
            top_k: 10,
            min_community_size: 3,
            start_char: None,
            target_tone_pair: None,
            path_length: 6,
            seed: 42,
            max_characters: 15,
            tone_focus: ToneFocus::Any,
            contrast_display_cap: 300,
            deck_size: 40,
            deck_weighting: DeckWeighting::Degree,
            profile_char: None,
            no_cache: false,
            verbose: false,
            filter: FilterSelection::default(),
        }
    }
}
