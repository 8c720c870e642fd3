//! Dataset ingestion boundary.
//!
//! Everything past this module assumes clean, validated records: malformed
//! rows are counted and dropped here, never propagated as errors into the
//! analytics core.

use crate::core::types::{Edge, VerbRecord};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

lazy_static! {
    static ref TONE_DIGITS: Regex = Regex::new(r"[1-5]").unwrap();
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found or unreadable: {0}")]
    DataUnavailable(String),
    #[error("csv decode failed: {0}")]
    Decode(#[from] csv::Error),
}

/// Opaque data provider: returns a table of verb records, or an empty table
/// on failure. Lets an external relational source back the dataset with the
/// local CSV as fallback.
pub trait DataSource {
    fn fetch(&self) -> Result<LoadedData, LoadError>;
}

/// Result of loading the dataset: validated records plus the number of rows
/// dropped at the boundary.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub records: Vec<VerbRecord>,
    pub dropped: usize,
}

impl LoadedData {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Raw CSV row as shipped in the dataset. Extra columns (umap coordinates,
/// transition probabilities) are ignored by serde.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    char1: Option<String>,
    #[serde(default)]
    char2: Option<String>,
    #[serde(default, rename = "Chinese_Verbs")]
    verb: Option<String>,
    #[serde(default)]
    pinyin: Option<String>,
    #[serde(default, rename = "English_Verb")]
    english: Option<String>,
    #[serde(default, rename = "分类（Classification）")]
    classification: Option<String>,
    #[serde(default)]
    tone_pattern: Option<String>,
    #[serde(default)]
    initial_1: Option<String>,
    #[serde(default)]
    final_1: Option<String>,
    #[serde(default)]
    initial_2: Option<String>,
    #[serde(default)]
    final_2: Option<String>,
}

/// Splits a bilingual `"中文(English)"` field into (zh, en).
/// Values without parentheses pass through unchanged as both halves.
pub fn parse_bilingual(text: &str) -> (String, String) {
    if let Some(open) = text.find('(') {
        if text.contains(')') {
            let zh = text[..open].trim().to_string();
            let en = text[open + 1..].replace(')', "").trim().to_string();
            return (zh, en);
        }
    }
    (text.to_string(), text.to_string())
}

/// Parses a `"S-D"` tone pattern into its two tone values.
/// Anything outside 1..=5 on either side yields (None, None).
pub fn split_tone_pair(pattern: &str) -> (Option<u8>, Option<u8>) {
    let mut parts = pattern.splitn(2, '-');
    let src = parts.next().and_then(|s| s.trim().parse::<u8>().ok());
    let dst = parts.next().and_then(|s| s.trim().parse::<u8>().ok());
    match (src, dst) {
        (Some(a), Some(b)) if (1..=5).contains(&a) && (1..=5).contains(&b) => (Some(a), Some(b)),
        _ => (None, None),
    }
}

/// Strips tone digits 1-5 from a pinyin string.
pub fn pinyin_base(pinyin: &str) -> String {
    TONE_DIGITS.replace_all(pinyin, "").to_string()
}

fn row_to_record(row: RawRow) -> Option<VerbRecord> {
    let char1 = row.char1.filter(|s| !s.trim().is_empty())?;
    let char2 = row.char2.filter(|s| !s.trim().is_empty())?;

    let verb = row
        .verb
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{}{}", char1, char2));
    let pinyin = row.pinyin.unwrap_or_default();
    let tone_pattern = row.tone_pattern.unwrap_or_default();
    let (src_tone, dst_tone) = split_tone_pair(&tone_pattern);
    let (class_zh, class_en) = parse_bilingual(row.classification.as_deref().unwrap_or(""));

    Some(VerbRecord {
        pinyin_base: pinyin_base(&pinyin),
        char1,
        char2,
        verb,
        english: row.english.unwrap_or_default(),
        class_zh,
        class_en,
        tone_pattern,
        src_tone,
        dst_tone,
        pinyin,
        initial_1: row.initial_1.unwrap_or_default(),
        final_1: row.final_1.unwrap_or_default(),
        initial_2: row.initial_2.unwrap_or_default(),
        final_2: row.final_2.unwrap_or_default(),
    })
}

/// Local CSV file source.
pub struct CsvSource {
    path: std::path::PathBuf,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for CsvSource {
    fn fetch(&self) -> Result<LoadedData, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| LoadError::DataUnavailable(format!("{:?}: {}", self.path, e)))?;

        let mut records = Vec::new();
        let mut dropped = 0;
        for result in reader.deserialize::<RawRow>() {
            match result {
                Ok(row) => match row_to_record(row) {
                    Some(record) => records.push(record),
                    None => dropped += 1,
                },
                Err(_) => dropped += 1,
            }
        }
        Ok(LoadedData { records, dropped })
    }
}

/// Tries the primary source first, falling back to the local CSV.
/// A failing fallback surfaces as DataUnavailable to the caller.
pub fn load_with_fallback(
    primary: Option<&dyn DataSource>,
    local_csv: &Path,
) -> Result<LoadedData, LoadError> {
    if let Some(source) = primary {
        if let Ok(data) = source.fetch() {
            return Ok(data);
        }
    }
    CsvSource::new(local_csv).fetch()
}

/// Collapses verb records into aggregated directed edges.
///
/// Duplicate (char1, char2) rows merge by summing weight; the first row seen
/// supplies the representative verb, pinyin, gloss and tone fields.
pub fn aggregate_edges(records: &[VerbRecord]) -> Vec<Edge> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut merged: HashMap<(String, String), Edge> = HashMap::new();

    for r in records {
        let key = (r.char1.clone(), r.char2.clone());
        if let Some(edge) = merged.get_mut(&key) {
            edge.weight += 1;
        } else {
            order.push(key.clone());
            merged.insert(
                key,
                Edge {
                    char1: r.char1.clone(),
                    char2: r.char2.clone(),
                    weight: 1,
                    verb: r.verb.clone(),
                    pinyin: r.pinyin.clone(),
                    english: r.english.clone(),
                    class_zh: r.class_zh.clone(),
                    class_en: r.class_en.clone(),
                    tone_pattern: r.tone_pattern.clone(),
                    src_tone: r.src_tone,
                    dst_tone: r.dst_tone,
                },
            );
        }
    }

    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bilingual() {
        assert_eq!(
            parse_bilingual("动作(Action)"),
            ("动作".to_string(), "Action".to_string())
        );
        // No parentheses: pass through as both halves
        assert_eq!(
            parse_bilingual("Other"),
            ("Other".to_string(), "Other".to_string())
        );
    }

    #[test]
    fn test_split_tone_pair() {
        assert_eq!(split_tone_pair("3-1"), (Some(3), Some(1)));
        assert_eq!(split_tone_pair("5-5"), (Some(5), Some(5)));
        assert_eq!(split_tone_pair("0-1"), (None, None));
        assert_eq!(split_tone_pair("6-1"), (None, None));
        assert_eq!(split_tone_pair("x-y"), (None, None));
        assert_eq!(split_tone_pair(""), (None, None));
    }

    #[test]
    fn test_pinyin_base() {
        assert_eq!(pinyin_base("da3kai1"), "dakai");
        assert_eq!(pinyin_base("kan4"), "kan");
        assert_eq!(pinyin_base("plain"), "plain");
    }

    #[test]
    fn test_csv_load_drops_malformed_rows() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("verbs.csv");
        fs::write(
            &path,
            "char1,char2,Chinese_Verbs,pinyin,English_Verb,分类（Classification）,tone_pattern\n\
             打,开,打开,da3kai1,to open,动作(Action),3-1\n\
             ,门,门,men2,door,动作(Action),2-2\n\
             开,门,开门,kai1men2,open the door,动作(Action),1-2\n",
        )?;

        let data = CsvSource::new(&path).fetch()?;
        assert_eq!(data.record_count(), 2);
        assert_eq!(data.dropped, 1);
        assert_eq!(data.records[0].verb, "打开");
        assert_eq!(data.records[0].src_tone, Some(3));
        assert_eq!(data.records[0].class_en, "Action");
        assert_eq!(data.records[0].pinyin_base, "dakai");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = CsvSource::new("no_such_dataset.csv").fetch().unwrap_err();
        assert!(matches!(err, LoadError::DataUnavailable(_)));
    }

    #[test]
    fn test_aggregate_edges_merges_duplicates() {
        let mut a = sample("打", "开", "打开", "3-1");
        a.pinyin = "da3kai1".into();
        let b = sample("打", "开", "打开", "3-1");
        let c = sample("开", "门", "开门", "1-2");

        let edges = aggregate_edges(&[a, b, c]);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].char1, "打");
        assert_eq!(edges[0].weight, 2);
        assert_eq!(edges[0].pinyin, "da3kai1");
        assert_eq!(edges[1].weight, 1);
    }

    fn sample(c1: &str, c2: &str, verb: &str, tp: &str) -> VerbRecord {
        let (src, dst) = split_tone_pair(tp);
        VerbRecord {
            char1: c1.into(),
            char2: c2.into(),
            verb: verb.into(),
            pinyin: String::new(),
            english: String::new(),
            class_zh: String::new(),
            class_en: String::new(),
            tone_pattern: tp.into(),
            src_tone: src,
            dst_tone: dst,
            pinyin_base: String::new(),
            initial_1: String::new(),
            final_1: String::new(),
            initial_2: String::new(),
            final_2: String::new(),
        }
    }
}
