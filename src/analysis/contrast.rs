//! Minimal tone-contrast pairs for discrimination drills.
//!
//! Verbs sharing a pinyin base (tone digits stripped) but differing in tone
//! pattern form contrast pairs. Enumeration is complete; presentation caps
//! the displayed rows.

use crate::core::types::{ToneFocus, VerbRecord};
use std::collections::BTreeMap;

/// One qualifying pair of tone-contrasting verbs.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastPair {
    pub pinyin_base: String,
    pub a_verb: String,
    pub a_pinyin: String,
    pub a_tone: String,
    pub a_english: String,
    pub b_verb: String,
    pub b_pinyin: String,
    pub b_tone: String,
    pub b_english: String,
}

/// Enumerates all unordered contrast pairs grouped by pinyin base.
///
/// Within each group, records are deduplicated to one per distinct tone
/// pattern (first occurrence wins) before pairing. Records without parsed
/// tones never qualify. Quadratic in group size, which is fine at dataset
/// scale (hundreds of verbs).
pub fn find_contrasts(records: &[VerbRecord], focus: ToneFocus) -> Vec<ContrastPair> {
    let mut groups: BTreeMap<&str, Vec<&VerbRecord>> = BTreeMap::new();
    for r in records {
        if !r.has_tones() || r.pinyin_base.is_empty() {
            continue;
        }
        let group = groups.entry(r.pinyin_base.as_str()).or_default();
        if !group.iter().any(|g| g.tone_pattern == r.tone_pattern) {
            group.push(r);
        }
    }

    let mut pairs = Vec::new();
    for (base, group) in groups {
        if group.len() < 2 {
            continue;
        }
        for i in 0..group.len() {
            for j in i + 1..group.len() {
                let (a, b) = (group[i], group[j]);
                let qualifies = match focus {
                    ToneFocus::Any => a.tone_pattern != b.tone_pattern,
                    ToneFocus::SourceDiffers => a.src_tone != b.src_tone,
                    ToneFocus::DestDiffers => a.dst_tone != b.dst_tone,
                };
                if qualifies {
                    pairs.push(ContrastPair {
                        pinyin_base: base.to_string(),
                        a_verb: a.verb.clone(),
                        a_pinyin: a.pinyin.clone(),
                        a_tone: a.tone_pattern.clone(),
                        a_english: a.english.clone(),
                        b_verb: b.verb.clone(),
                        b_pinyin: b.pinyin.clone(),
                        b_tone: b.tone_pattern.clone(),
                        b_english: b.english.clone(),
                    });
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::{pinyin_base, split_tone_pair};

    fn record(verb: &str, pinyin: &str, tp: &str) -> VerbRecord {
        let (src, dst) = split_tone_pair(tp);
        VerbRecord {
            char1: verb.chars().next().map(String::from).unwrap_or_default(),
            char2: verb.chars().nth(1).map(String::from).unwrap_or_default(),
            verb: verb.into(),
            pinyin: pinyin.into(),
            english: String::new(),
            class_zh: String::new(),
            class_en: String::new(),
            tone_pattern: tp.into(),
            src_tone: src,
            dst_tone: dst,
            pinyin_base: pinyin_base(pinyin),
            initial_1: String::new(),
            final_1: String::new(),
            initial_2: String::new(),
            final_2: String::new(),
        }
    }

    #[test]
    fn test_dest_differs_single_pair() {
        // Shared base "dakai", src tones equal, dst tones 1 vs 4
        let records = vec![
            record("打开", "da3kai1", "3-1"),
            record("打揩", "da3kai4", "3-4"),
        ];
        let pairs = find_contrasts(&records, ToneFocus::DestDiffers);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].pinyin_base, "dakai");
        assert_eq!(pairs[0].a_tone, "3-1");
        assert_eq!(pairs[0].b_tone, "3-4");

        // Same src tone on both: no source contrast
        assert!(find_contrasts(&records, ToneFocus::SourceDiffers).is_empty());
        assert_eq!(find_contrasts(&records, ToneFocus::Any).len(), 1);
    }

    #[test]
    fn test_dedup_by_tone_pattern() {
        let records = vec![
            record("打开", "da3kai1", "3-1"),
            record("打开", "da3kai1", "3-1"),
            record("打揩", "da3kai4", "3-4"),
        ];
        // Duplicate 3-1 collapses; exactly one pair remains
        assert_eq!(find_contrasts(&records, ToneFocus::Any).len(), 1);
    }

    #[test]
    fn test_groups_do_not_mix() {
        let records = vec![
            record("打开", "da3kai1", "3-1"),
            record("开门", "kai1men2", "1-2"),
        ];
        assert!(find_contrasts(&records, ToneFocus::Any).is_empty());
    }

    #[test]
    fn test_unparsed_tones_excluded() {
        let records = vec![
            record("打开", "da3kai1", "3-1"),
            record("打揩", "da3kai4", "bad"),
        ];
        assert!(find_contrasts(&records, ToneFocus::Any).is_empty());
    }

    #[test]
    fn test_complete_enumeration_within_group() {
        let records = vec![
            record("打开", "da1kai1", "1-1"),
            record("打开", "da2kai2", "2-2"),
            record("打开", "da3kai3", "3-3"),
        ];
        // Three distinct patterns: 3 choose 2 pairs
        assert_eq!(find_contrasts(&records, ToneFocus::Any).len(), 3);
    }
}
