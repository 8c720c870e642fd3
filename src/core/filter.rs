//! Filter selection applied to the dataset before every recomputation.
//!
//! A filter change invalidates all derived artifacts; the fingerprint keys
//! the memo cache so identical selections reuse prior results.

use crate::core::types::{Edge, VerbRecord};
use serde::{Deserialize, Serialize};

/// Current sidebar-style selection. Empty vectors mean "allow all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Semantic classes, matched against zh or en depending on `match_zh`
    pub classes: Vec<String>,
    pub tone_patterns: Vec<String>,
    pub src_tones: Vec<u8>,
    pub dst_tones: Vec<u8>,
    /// Match `classes` against the Chinese classification column
    pub match_zh: bool,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.tone_patterns.is_empty()
            && self.src_tones.is_empty()
            && self.dst_tones.is_empty()
    }

    fn class_matches(&self, zh: &str, en: &str) -> bool {
        if self.classes.is_empty() {
            return true;
        }
        let value = if self.match_zh { zh } else { en };
        self.classes.iter().any(|c| c == value)
    }

    fn tones_match(&self, pattern: &str, src: Option<u8>, dst: Option<u8>) -> bool {
        if !self.tone_patterns.is_empty() && !self.tone_patterns.iter().any(|p| p == pattern) {
            return false;
        }
        // Tone filters exclude records with unparsed tones
        if !self.src_tones.is_empty() {
            match src {
                Some(t) if self.src_tones.contains(&t) => {}
                _ => return false,
            }
        }
        if !self.dst_tones.is_empty() {
            match dst {
                Some(t) if self.dst_tones.contains(&t) => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply_records<'a>(&self, records: &'a [VerbRecord]) -> Vec<&'a VerbRecord> {
        records
            .iter()
            .filter(|r| {
                self.class_matches(&r.class_zh, &r.class_en)
                    && self.tones_match(&r.tone_pattern, r.src_tone, r.dst_tone)
            })
            .collect()
    }

    pub fn apply_edges(&self, edges: &[Edge]) -> Vec<Edge> {
        edges
            .iter()
            .filter(|e| {
                self.class_matches(&e.class_zh, &e.class_en)
                    && self.tones_match(&e.tone_pattern, e.src_tone, e.dst_tone)
            })
            .cloned()
            .collect()
    }

    /// Fingerprint of this exact selection over this exact dataset shape,
    /// used as the memo-cache key.
    pub fn fingerprint(&self, record_count: usize, dropped: usize) -> String {
        let mut context = md5::Context::new();
        context.consume(format!("{:?}", self).as_bytes());
        context.consume(record_count.to_le_bytes());
        context.consume(dropped.to_le_bytes());
        format!("{:x}", context.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::split_tone_pair;

    fn record(c1: &str, c2: &str, class_en: &str, tp: &str) -> VerbRecord {
        let (src, dst) = split_tone_pair(tp);
        VerbRecord {
            char1: c1.into(),
            char2: c2.into(),
            verb: format!("{}{}", c1, c2),
            pinyin: String::new(),
            english: String::new(),
            class_zh: String::new(),
            class_en: class_en.into(),
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

    #[test]
    fn test_empty_selection_allows_all() {
        let records = vec![record("打", "开", "Action", "3-1")];
        let filter = FilterSelection::default();
        assert_eq!(filter.apply_records(&records).len(), 1);
    }

    #[test]
    fn test_class_and_tone_filters() {
        let records = vec![
            record("打", "开", "Action", "3-1"),
            record("学", "习", "Cognition", "2-2"),
        ];
        let filter = FilterSelection {
            classes: vec!["Action".into()],
            ..Default::default()
        };
        let kept = filter.apply_records(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].verb, "打开");

        let filter = FilterSelection {
            src_tones: vec![2],
            ..Default::default()
        };
        let kept = filter.apply_records(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].verb, "学习");
    }

    #[test]
    fn test_tone_filter_excludes_unparsed_tones() {
        let records = vec![record("打", "开", "Action", "bad")];
        let filter = FilterSelection {
            src_tones: vec![1, 2, 3, 4, 5],
            ..Default::default()
        };
        assert!(filter.apply_records(&records).is_empty());
    }

    #[test]
    fn test_fingerprint_changes_with_selection() {
        let a = FilterSelection::default().fingerprint(10, 0);
        let b = FilterSelection {
            classes: vec!["Action".into()],
            ..Default::default()
        }
        .fingerprint(10, 0);
        let c = FilterSelection::default().fingerprint(11, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, FilterSelection::default().fingerprint(10, 0));
    }
}
