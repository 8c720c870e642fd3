//! Interactive practice session: connect a pivot character with an option to
//! form a valid verb.
//!
//! The session is a value object transitioned by pure functions
//! `(State, Event) -> State`; the adjacency context is immutable and shared.
//! Per-round randomness derives from the session seed plus the round counter,
//! so a replayed event sequence reproduces the same game.

use crate::core::types::Edge;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Immutable lookup tables built once from the aggregated edges.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// char1 -> outgoing edges
    pub forward: HashMap<String, Vec<Edge>>,
    /// char2 -> incoming edges
    pub reverse: HashMap<String, Vec<Edge>>,
    /// All characters, highest total degree first
    pub by_degree: Vec<String>,
}

impl SessionData {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut forward: HashMap<String, Vec<Edge>> = HashMap::new();
        let mut reverse: HashMap<String, Vec<Edge>> = HashMap::new();
        for e in edges {
            forward.entry(e.char1.clone()).or_default().push(e.clone());
            reverse.entry(e.char2.clone()).or_default().push(e.clone());
        }

        let mut degree: HashMap<&str, usize> = HashMap::new();
        for (c, list) in &forward {
            *degree.entry(c.as_str()).or_insert(0) += list.len();
        }
        for (c, list) in &reverse {
            *degree.entry(c.as_str()).or_insert(0) += list.len();
        }
        let mut by_degree: Vec<(String, usize)> = degree
            .into_iter()
            .map(|(c, d)| (c.to_string(), d))
            .collect();
        by_degree.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            forward,
            reverse,
            by_degree: by_degree.into_iter().map(|(c, _)| c).collect(),
        }
    }

    pub fn all_chars(&self) -> Vec<&str> {
        self.by_degree.iter().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Pivot is the first character; pick the second
    #[default]
    Start,
    /// Pivot is the second character; pick the first
    End,
    /// Direction chosen per round
    Mixed,
}

/// One quiz round.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub pivot: String,
    /// Direction actually used this round (Start or End)
    pub mode_used: GameMode,
    pub options: Vec<String>,
    pub valid: BTreeSet<String>,
}

/// A verb successfully formed during play.
#[derive(Debug, Clone, PartialEq)]
pub struct FormedVerb {
    pub char1: String,
    pub char2: String,
    pub verb: String,
    pub pinyin: String,
    pub english: String,
    pub classification: String,
}

/// Feedback for the last choice.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Correct(FormedVerb),
    /// Wrong; true when the reversed pair exists ("BA exists, not AB")
    Wrong { near_miss: bool },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub pivots: BTreeSet<String>,
    pub mode: GameMode,
    pub options_per_round: usize,
    pub lives: i32,
    pub score: i32,
    pub streak: u32,
    pub attempts: u32,
    pub formed: Vec<FormedVerb>,
    pub current: Option<Round>,
    pub feedback: Option<Feedback>,
    pub seed: u64,
    /// Rounds built so far; salts the per-round rng
    pub rounds_played: u64,
}

impl SessionState {
    pub fn new(seed: u64) -> Self {
        Self {
            options_per_round: 8,
            lives: 3,
            seed,
            ..Default::default()
        }
    }

    pub fn game_over(&self) -> bool {
        self.lives <= 0
    }

    pub fn accuracy_percent(&self) -> Option<f64> {
        if self.attempts == 0 {
            return None;
        }
        Some(100.0 * self.formed.len() as f64 / self.attempts as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    AddPivot(String),
    RemovePivot(String),
    Configure {
        mode: GameMode,
        options_per_round: usize,
        lives: i32,
    },
    StartGame,
    NextRound,
    Choose(String),
}

/// Applies one event, returning the next state. The input state is consumed;
/// no in-place mutation escapes this function.
pub fn transition(data: &SessionData, state: SessionState, event: SessionEvent) -> SessionState {
    let mut next = state;
    match event {
        SessionEvent::AddPivot(c) => {
            next.pivots.insert(c);
        }
        SessionEvent::RemovePivot(c) => {
            next.pivots.remove(&c);
        }
        SessionEvent::Configure {
            mode,
            options_per_round,
            lives,
        } => {
            next.mode = mode;
            next.options_per_round = options_per_round.clamp(4, 12);
            next.lives = lives.clamp(1, 10);
        }
        SessionEvent::StartGame => {
            next.score = 0;
            next.streak = 0;
            next.attempts = 0;
            next.formed.clear();
            next.feedback = None;
            next.current = build_round(data, &mut next);
        }
        SessionEvent::NextRound => {
            next.feedback = None;
            next.current = build_round(data, &mut next);
        }
        SessionEvent::Choose(choice) => {
            apply_choice(data, &mut next, &choice);
        }
    }
    next
}

fn round_rng(state: &SessionState) -> StdRng {
    StdRng::seed_from_u64(state.seed.wrapping_add(state.rounds_played))
}

fn build_round(data: &SessionData, state: &mut SessionState) -> Option<Round> {
    let mut rng = round_rng(state);
    state.rounds_played += 1;

    let pool: Vec<&str> = if state.pivots.is_empty() {
        data.by_degree.iter().take(50).map(String::as_str).collect()
    } else {
        state.pivots.iter().map(String::as_str).collect()
    };
    if pool.is_empty() {
        return None;
    }

    let mode_used = match state.mode {
        GameMode::Mixed => {
            if rng.random::<bool>() {
                GameMode::Start
            } else {
                GameMode::End
            }
        }
        m => m,
    };

    // Retry pivots until one has at least one valid answer
    let mut pivot = None;
    let mut valid: BTreeSet<String> = BTreeSet::new();
    for _ in 0..50 {
        let candidate = *pool.choose(&mut rng)?;
        valid = answers(data, candidate, mode_used);
        if !valid.is_empty() {
            pivot = Some(candidate.to_string());
            break;
        }
    }
    let pivot = pivot?;

    let target = state.options_per_round.max(4);
    let n_valid = (target / 3).max(2).min(valid.len());
    let valid_list: Vec<&String> = valid.iter().collect();
    let mut options: Vec<String> = valid_list
        .choose_multiple(&mut rng, n_valid)
        .map(|s| s.to_string())
        .collect();

    // Decoys: first the reversed-only direction, then random non-edges
    let reversed: BTreeSet<String> = answers(data, &pivot, flip(mode_used))
        .difference(&valid)
        .cloned()
        .collect();
    let rev_list: Vec<&String> = reversed.iter().collect();
    let rev_take = rev_list.len().min((target / 4).max(1));
    let mut decoys: HashSet<String> = rev_list
        .choose_multiple(&mut rng, rev_take)
        .map(|s| s.to_string())
        .collect();

    let all = data.all_chars();
    let mut guard = 0;
    while options.len() + decoys.len() < target && guard < 500 {
        guard += 1;
        let Some(&c) = all.choose(&mut rng) else { break };
        if c != pivot && !valid.contains(c) && !decoys.contains(c) {
            decoys.insert(c.to_string());
        }
    }

    let mut sorted_decoys: Vec<String> = decoys.into_iter().collect();
    sorted_decoys.sort();
    options.extend(sorted_decoys);
    options.shuffle(&mut rng);

    Some(Round {
        pivot,
        mode_used,
        options,
        valid,
    })
}

fn flip(mode: GameMode) -> GameMode {
    match mode {
        GameMode::Start => GameMode::End,
        _ => GameMode::Start,
    }
}

fn answers(data: &SessionData, pivot: &str, mode: GameMode) -> BTreeSet<String> {
    match mode {
        GameMode::End => data
            .reverse
            .get(pivot)
            .map(|list| list.iter().map(|e| e.char1.clone()).collect())
            .unwrap_or_default(),
        _ => data
            .forward
            .get(pivot)
            .map(|list| list.iter().map(|e| e.char2.clone()).collect())
            .unwrap_or_default(),
    }
}

fn apply_choice(data: &SessionData, state: &mut SessionState, choice: &str) {
    let Some(round) = state.current.clone() else {
        return;
    };
    if state.game_over() {
        return;
    }
    state.attempts += 1;

    if round.valid.contains(choice) {
        state.score += 1;
        state.streak += 1;

        let (char1, char2, edges) = match round.mode_used {
            GameMode::End => (
                choice.to_string(),
                round.pivot.clone(),
                data.reverse.get(&round.pivot),
            ),
            _ => (
                round.pivot.clone(),
                choice.to_string(),
                data.forward.get(&round.pivot),
            ),
        };
        let example = edges.and_then(|list| {
            list.iter()
                .find(|e| e.char1 == char1 && e.char2 == char2)
        });
        let formed = FormedVerb {
            verb: example
                .map(|e| e.verb.clone())
                .unwrap_or_else(|| format!("{}{}", char1, char2)),
            pinyin: example.map(|e| e.pinyin.clone()).unwrap_or_default(),
            english: example.map(|e| e.english.clone()).unwrap_or_default(),
            classification: example.map(|e| e.class_en.clone()).unwrap_or_default(),
            char1,
            char2,
        };
        state.formed.push(formed.clone());
        state.feedback = Some(Feedback::Correct(formed));
    } else {
        state.score -= 1;
        state.streak = 0;
        state.lives -= 1;
        let near_miss = answers(data, &round.pivot, flip(round.mode_used)).contains(choice);
        state.feedback = Some(Feedback::Wrong { near_miss });
    }
}

/// Interactive quiz loop on stdin/stdout, driven entirely through
/// [`transition`].
pub fn start_quiz(config: crate::config::VerblensConfig) -> anyhow::Result<()> {
    use crate::config::Lang;
    use crate::core::loader::load_with_fallback;
    use std::io::{BufRead, Write};

    let data = load_with_fallback(None, &config.data)?;
    let mut filter = config.filter.clone();
    filter.match_zh = config.lang == Lang::Zh;
    let records: Vec<_> = filter
        .apply_records(&data.records)
        .into_iter()
        .cloned()
        .collect();
    let session = SessionData::from_edges(&crate::core::aggregate_edges(&records));

    let mut state = SessionState::new(config.seed);
    state = transition(&session, state, SessionEvent::StartGame);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if state.game_over() {
            break;
        }
        let Some(round) = state.current.clone() else {
            println!("No playable round for the current selection.");
            break;
        };

        match round.mode_used {
            GameMode::End => println!("\nComplete the verb: ＿ + {}", round.pivot),
            _ => println!("\nComplete the verb: {} + ＿", round.pivot),
        }
        for (i, opt) in round.options.iter().enumerate() {
            print!("  [{}] {}", i + 1, opt);
        }
        println!();
        print!("choice (number or character, q to quit)> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("q") {
            break;
        }
        let choice = match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= round.options.len() => round.options[n - 1].clone(),
            _ => input.to_string(),
        };

        state = transition(&session, state, SessionEvent::Choose(choice));
        match &state.feedback {
            Some(Feedback::Correct(v)) => {
                println!("✓ {} ({}) {}", v.verb, v.pinyin, v.english);
            }
            Some(Feedback::Wrong { near_miss: true }) => {
                println!("✗ Not in this direction, but the reversed pair exists.");
            }
            Some(Feedback::Wrong { near_miss: false }) => {
                println!("✗ Not a verb in this dataset.");
            }
            None => {}
        }
        println!("score {}  streak {}  lives {}", state.score, state.streak, state.lives);

        state = transition(&session, state, SessionEvent::NextRound);
    }

    println!(
        "\nFinal: score {} over {} attempts, {} verbs formed",
        state.score,
        state.attempts,
        state.formed.len()
    );
    if let Some(acc) = state.accuracy_percent() {
        println!("Accuracy: {:.0}%", acc);
    }

    if !state.formed.is_empty() {
        let mut table = crate::format::Table::new(
            "Formed Verbs",
            &["Verb", "Pinyin", "English", "Classification", "Chars"],
        );
        for v in &state.formed {
            table.push_row(vec![
                v.verb.clone(),
                v.pinyin.clone(),
                v.english.clone(),
                v.classification.clone(),
                format!("{}{}", v.char1, v.char2),
            ]);
        }
        let mut file = std::fs::File::create(&config.output)?;
        let mut formatter = crate::format::create_formatter(crate::config::OutputFormat::Csv);
        formatter.write_report(&mut file, &[table])?;
        println!("Formed verbs written to {:?}", config.output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(c1: &str, c2: &str) -> Edge {
        Edge {
            char1: c1.into(),
            char2: c2.into(),
            weight: 1,
            verb: format!("{}{}", c1, c2),
            pinyin: "py".into(),
            english: "en".into(),
            class_zh: "动作".into(),
            class_en: "Action".into(),
            tone_pattern: "1-1".into(),
            src_tone: Some(1),
            dst_tone: Some(1),
        }
    }

    fn data() -> SessionData {
        SessionData::from_edges(&[
            edge("打", "开"),
            edge("打", "门"),
            edge("开", "门"),
            edge("门", "打"),
            edge("学", "习"),
        ])
    }

    #[test]
    fn test_pivot_list_transitions() {
        let data = data();
        let state = SessionState::new(42);
        let state = transition(&data, state, SessionEvent::AddPivot("打".into()));
        assert!(state.pivots.contains("打"));
        let state = transition(&data, state, SessionEvent::RemovePivot("打".into()));
        assert!(state.pivots.is_empty());
    }

    #[test]
    fn test_start_game_builds_round() {
        let data = data();
        let state = SessionState::new(42);
        let state = transition(&data, state, SessionEvent::StartGame);
        let round = state.current.as_ref().expect("round built");
        assert!(!round.valid.is_empty());
        assert!(round.options.len() >= 2);
        // Every valid answer offered is a real continuation of the pivot
        for v in &round.valid {
            assert!(data.forward.contains_key(&round.pivot) || data.reverse.contains_key(&round.pivot));
            assert!(!v.is_empty());
        }
    }

    #[test]
    fn test_transitions_are_pure_and_reproducible() {
        let data = data();
        let a = transition(&data, SessionState::new(7), SessionEvent::StartGame);
        let b = transition(&data, SessionState::new(7), SessionEvent::StartGame);
        assert_eq!(a, b);
        // Different round counters diverge by design
        let c = transition(&data, a.clone(), SessionEvent::NextRound);
        assert_eq!(c.rounds_played, 2);
    }

    #[test]
    fn test_correct_choice_scores_and_records() {
        let data = data();
        let mut state = SessionState::new(42);
        state.pivots.insert("学".into());
        let state = transition(&data, state, SessionEvent::StartGame);
        let round = state.current.clone().unwrap();
        assert_eq!(round.pivot, "学");
        let valid = round.valid.iter().next().unwrap().clone();

        let state = transition(&data, state, SessionEvent::Choose(valid));
        assert_eq!(state.score, 1);
        assert_eq!(state.streak, 1);
        assert_eq!(state.attempts, 1);
        assert_eq!(state.formed.len(), 1);
        assert_eq!(state.formed[0].verb, "学习");
        assert!(matches!(state.feedback, Some(Feedback::Correct(_))));
    }

    #[test]
    fn test_wrong_choice_costs_life_and_flags_near_miss() {
        let data = data();
        let mut state = SessionState::new(42);
        // 打 as pivot in End mode: valid first chars = {门}; choosing 开
        // is a near miss because 打→开 exists in the other direction
        state.pivots.insert("打".into());
        state.mode = GameMode::End;
        let state = transition(&data, state, SessionEvent::StartGame);
        assert_eq!(state.current.as_ref().unwrap().pivot, "打");

        let state = transition(&data, state, SessionEvent::Choose("开".into()));
        assert_eq!(state.score, -1);
        assert_eq!(state.streak, 0);
        assert_eq!(state.lives, 2);
        assert_eq!(
            state.feedback,
            Some(Feedback::Wrong { near_miss: true })
        );
    }

    #[test]
    fn test_game_over_blocks_choices() {
        let data = data();
        let mut state = SessionState::new(42);
        state.pivots.insert("学".into());
        let mut state = transition(&data, state, SessionEvent::StartGame);
        state.lives = 0;
        let after = transition(&data, state.clone(), SessionEvent::Choose("习".into()));
        assert_eq!(after.attempts, state.attempts);
        assert_eq!(after.score, state.score);
    }

    #[test]
    fn test_accuracy() {
        let mut state = SessionState::new(0);
        assert!(state.accuracy_percent().is_none());
        state.attempts = 4;
        state.formed = vec![
            FormedVerb {
                char1: "a".into(),
                char2: "b".into(),
                verb: "ab".into(),
                pinyin: String::new(),
                english: String::new(),
                classification: String::new(),
            };
            2
        ];
        assert_eq!(state.accuracy_percent(), Some(50.0));
    }
}
