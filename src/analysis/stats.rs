//! Tone and phonetic statistics over the filtered dataset.

use crate::core::types::{Edge, VerbRecord};
use std::collections::BTreeMap;

/// 5x5 count matrix of src tone (row) to dst tone (column), 1-indexed tones
/// stored at index tone - 1. Edges without parsed tones are excluded.
pub fn tone_matrix(edges: &[Edge]) -> [[u32; 5]; 5] {
    let mut matrix = [[0u32; 5]; 5];
    for e in edges {
        if let (Some(s), Some(d)) = (e.src_tone, e.dst_tone) {
            matrix[(s - 1) as usize][(d - 1) as usize] += e.weight;
        }
    }
    matrix
}

/// A character with several distinct tone roles across the dataset,
/// a common tripwire for learners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyphonicChar {
    pub character: String,
    /// Distinct src tones it takes as a first character
    pub src_variants: usize,
    /// Distinct dst tones it takes as a second character
    pub dst_variants: usize,
}

impl PolyphonicChar {
    pub fn variant_count(&self) -> usize {
        self.src_variants + self.dst_variants
    }
}

/// Characters whose combined tone-role variant count is at least
/// `min_variants`, sorted by variant count descending then character.
pub fn polyphonic_characters(records: &[VerbRecord], min_variants: usize) -> Vec<PolyphonicChar> {
    let mut src: BTreeMap<&str, std::collections::BTreeSet<u8>> = BTreeMap::new();
    let mut dst: BTreeMap<&str, std::collections::BTreeSet<u8>> = BTreeMap::new();
    for r in records {
        if let Some(t) = r.src_tone {
            src.entry(r.char1.as_str()).or_default().insert(t);
        }
        if let Some(t) = r.dst_tone {
            dst.entry(r.char2.as_str()).or_default().insert(t);
        }
    }

    let mut chars: std::collections::BTreeSet<&str> = src.keys().copied().collect();
    chars.extend(dst.keys().copied());

    let mut result: Vec<PolyphonicChar> = chars
        .into_iter()
        .map(|c| PolyphonicChar {
            character: c.to_string(),
            src_variants: src.get(c).map(|s| s.len()).unwrap_or(0),
            dst_variants: dst.get(c).map(|s| s.len()).unwrap_or(0),
        })
        .filter(|p| p.variant_count() >= min_variants)
        .collect();

    result.sort_by(|a, b| {
        b.variant_count()
            .cmp(&a.variant_count())
            .then_with(|| a.character.cmp(&b.character))
    });
    result
}

/// Distinct verbs with the 3-3 tone pattern, which surfaces tone sandhi in
/// pronunciation.
pub fn sandhi_candidates(records: &[VerbRecord]) -> Vec<(String, String, String)> {
    let mut seen = std::collections::BTreeSet::new();
    records
        .iter()
        .filter(|r| r.tone_pattern == "3-3")
        .filter(|r| seen.insert(r.verb.clone()))
        .map(|r| (r.verb.clone(), r.pinyin.clone(), r.english.clone()))
        .collect()
}

/// Verb counts per semantic class, descending.
pub fn category_counts(records: &[VerbRecord], zh: bool) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        let class = r.classification(zh);
        if !class.is_empty() {
            *counts.entry(class).or_insert(0) += 1;
        }
    }
    let mut result: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    result
}

/// Which phonetic component column to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Initial1,
    Final1,
    Initial2,
    Final2,
}

/// Top-n frequency table for a phonetic component column.
pub fn component_frequencies(
    records: &[VerbRecord],
    component: Component,
    n: usize,
) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        let value = match component {
            Component::Initial1 => &r.initial_1,
            Component::Final1 => &r.final_1,
            Component::Initial2 => &r.initial_2,
            Component::Final2 => &r.final_2,
        };
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    let mut result: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    result.truncate(n);
    result
}

/// Tone-role histogram and verb lists for a single character.
#[derive(Debug, Clone, Default)]
pub struct CharacterProfile {
    /// Count per tone 1..=5 (index tone - 1), over src roles as char1 and
    /// dst roles as char2
    pub tone_counts: [u32; 5],
    /// Verbs where the character comes first
    pub starts: Vec<VerbRecord>,
    /// Verbs where the character comes second
    pub ends: Vec<VerbRecord>,
}

pub fn character_profile(records: &[VerbRecord], character: &str) -> CharacterProfile {
    let mut profile = CharacterProfile::default();
    for r in records {
        if r.char1 == character {
            if let Some(t) = r.src_tone {
                profile.tone_counts[(t - 1) as usize] += 1;
            }
            profile.starts.push(r.clone());
        }
        if r.char2 == character {
            if let Some(t) = r.dst_tone {
                profile.tone_counts[(t - 1) as usize] += 1;
            }
            profile.ends.push(r.clone());
        }
    }
    profile
}
