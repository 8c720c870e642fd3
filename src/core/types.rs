//! Core types shared across verblens modules

use serde::{Deserialize, Serialize};

/// Events emitted during an analysis run
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    /// Loading the dataset has started
    LoadStarted,
    /// Number of records loaded
    RecordsLoaded(usize),
    /// Number of malformed rows dropped at the ingestion boundary
    RecordsDropped(usize),
    /// Records remaining after the filter selection
    FilterApplied(usize),
    /// Graph constructed (nodes, edges)
    GraphBuilt(usize, usize),
    /// A report table is ready
    ReportReady(String),
    /// Run complete with message
    Complete(String),
    /// Error occurred
    Error(String),
}

/// One row of the verb dataset, with derived tone/pinyin fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbRecord {
    /// First (source) character
    pub char1: String,
    /// Second (destination) character
    pub char2: String,
    /// Surface form, conventionally char1+char2
    pub verb: String,
    pub pinyin: String,
    pub english: String,
    /// Chinese half of the bilingual classification field
    pub class_zh: String,
    /// English half of the bilingual classification field
    pub class_en: String,
    /// Raw tone pattern string, e.g. "3-1"
    pub tone_pattern: String,
    /// Tone of char1, 1..=5; None when the pattern is malformed
    pub src_tone: Option<u8>,
    /// Tone of char2, 1..=5; None when the pattern is malformed
    pub dst_tone: Option<u8>,
    /// Pinyin with tone digits stripped, groups homophone-adjacent verbs
    pub pinyin_base: String,
    pub initial_1: String,
    pub final_1: String,
    pub initial_2: String,
    pub final_2: String,
}

impl VerbRecord {
    /// True when both tone values parsed into 1..=5.
    pub fn has_tones(&self) -> bool {
        self.src_tone.is_some() && self.dst_tone.is_some()
    }

    pub fn classification(&self, zh: bool) -> &str {
        if zh { &self.class_zh } else { &self.class_en }
    }
}

/// Directed character pair aggregated over all verb rows sharing it.
///
/// One representative verb/pinyin/gloss is kept per pair; the tone fields come
/// from the first row seen for the pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub char1: String,
    pub char2: String,
    /// Number of raw rows collapsed into this pair
    pub weight: u32,
    pub verb: String,
    pub pinyin: String,
    pub english: String,
    pub class_zh: String,
    pub class_en: String,
    pub tone_pattern: String,
    pub src_tone: Option<u8>,
    pub dst_tone: Option<u8>,
}

impl Edge {
    /// Stable identifier used by the coverage optimizer.
    pub fn id(&self) -> String {
        format!("{}|{}", self.char1, self.char2)
    }
}

/// Which tone position must differ for a minimal-contrast pair to qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToneFocus {
    /// Tone patterns differ anywhere
    #[default]
    Any,
    /// First-character tones differ
    SourceDiffers,
    /// Second-character tones differ
    DestDiffers,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tp: &str) -> VerbRecord {
        VerbRecord {
            char1: "打".into(),
            char2: "开".into(),
            verb: "打开".into(),
            pinyin: "da3kai1".into(),
            english: "to open".into(),
            class_zh: "动作".into(),
            class_en: "Action".into(),
            tone_pattern: tp.into(),
            src_tone: None,
            dst_tone: None,
            pinyin_base: "dakai".into(),
            initial_1: "d".into(),
            final_1: "a".into(),
            initial_2: "k".into(),
            final_2: "ai".into(),
        }
    }

    #[test]
    fn test_edge_id() {
        let edge = Edge {
            char1: "打".into(),
            char2: "开".into(),
            weight: 2,
            verb: "打开".into(),
            pinyin: "da3kai1".into(),
            english: "to open".into(),
            class_zh: "动作".into(),
            class_en: "Action".into(),
            tone_pattern: "3-1".into(),
            src_tone: Some(3),
            dst_tone: Some(1),
        };
        assert_eq!(edge.id(), "打|开");
    }

    #[test]
    fn test_has_tones() {
        let mut r = record("3-1");
        assert!(!r.has_tones());
        r.src_tone = Some(3);
        r.dst_tone = Some(1);
        assert!(r.has_tones());
    }
}
