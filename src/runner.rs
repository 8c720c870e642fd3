use crate::analysis::deck::build_deck;
use crate::analysis::{
    CharGraph, betweenness_centrality, community, degree_centrality, find_contrasts, optimize,
    stats, top_k,
};
use crate::analysis::{generate_path, verbs_on_path};
use crate::cache::{AnalysisCache, CachedAnalysis};
use crate::config::{Lang, ReportKind, VerblensConfig};
use crate::core::loader::{load_with_fallback, split_tone_pair};
use crate::core::types::{AnalysisEvent, Edge, VerbRecord};
use crate::core::{LoadedData, aggregate_edges};
use crate::format::{Table, create_formatter};
use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::fs::File;

/// Main entry point for a verblens run in CLI mode.
///
/// Starts the analysis in a background thread and consumes events on the
/// main thread, printing progress when `verbose` is enabled.
pub fn run(config: VerblensConfig) -> Result<()> {
    let (tx, rx) = crossbeam_channel::unbounded();

    let config_clone = config.clone();
    std::thread::spawn(move || {
        if let Err(e) = run_analysis(config_clone, Some(tx.clone())) {
            let _ = tx.send(AnalysisEvent::Error(e.to_string()));
        }
    });

    for event in rx {
        match event {
            AnalysisEvent::LoadStarted => {
                if config.verbose {
                    println!("Loading dataset...")
                }
            }
            AnalysisEvent::RecordsLoaded(n) => {
                if config.verbose {
                    println!("Loaded {} records.", n)
                }
            }
            AnalysisEvent::RecordsDropped(n) => {
                if config.verbose && n > 0 {
                    println!("Dropped {} malformed rows.", n)
                }
            }
            AnalysisEvent::FilterApplied(n) => {
                if config.verbose {
                    println!("Filter kept {} records.", n)
                }
            }
            AnalysisEvent::GraphBuilt(nodes, edges) => {
                if config.verbose {
                    println!("Graph: {} characters, {} pairs.", nodes, edges)
                }
            }
            AnalysisEvent::ReportReady(name) => {
                if config.verbose {
                    println!("Report ready: {}", name)
                }
            }
            AnalysisEvent::Complete(msg) => println!("{}", msg),
            AnalysisEvent::Error(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

/// Runs the full pipeline: load, filter, aggregate, build graph, compute the
/// requested report and write it out.
pub fn run_analysis(config: VerblensConfig, tx: Option<Sender<AnalysisEvent>>) -> Result<()> {
    let notify = |e: AnalysisEvent| {
        if let Some(ref tx) = tx {
            let _ = tx.send(e);
        }
    };

    notify(AnalysisEvent::LoadStarted);

    // Unreadable source degrades to an empty dataset: downstream components
    // all understand "no data" and report empty tables.
    let data = match load_with_fallback(None, &config.data) {
        Ok(data) => data,
        Err(e) => {
            notify(AnalysisEvent::Error(format!("{} (treating as empty)", e)));
            LoadedData::default()
        }
    };
    notify(AnalysisEvent::RecordsLoaded(data.record_count()));
    notify(AnalysisEvent::RecordsDropped(data.dropped));

    let mut filter = config.filter.clone();
    filter.match_zh = config.lang == Lang::Zh;
    let records: Vec<VerbRecord> = filter
        .apply_records(&data.records)
        .into_iter()
        .cloned()
        .collect();
    notify(AnalysisEvent::FilterApplied(records.len()));

    let edges = aggregate_edges(&records);
    let graph = CharGraph::from_edges(&edges);
    notify(AnalysisEvent::GraphBuilt(graph.node_count(), graph.edge_count()));

    let fingerprint = filter.fingerprint(data.record_count(), data.dropped);
    let tables = build_report(&config, &records, &edges, &graph, &fingerprint)?;

    let row_total: usize = tables.iter().map(|t| t.rows.len()).sum();
    notify(AnalysisEvent::ReportReady(format!("{:?}", config.report)));

    let mut output = File::create(&config.output)
        .with_context(|| format!("Failed to create output: {:?}", config.output))?;
    let mut formatter = create_formatter(config.output_format);
    formatter.write_report(&mut output, &tables)?;

    if row_total == 0 {
        notify(AnalysisEvent::Complete(format!(
            "No match for the current selection. Written to {:?}",
            config.output
        )));
    } else {
        notify(AnalysisEvent::Complete(format!(
            "Written to {:?}",
            config.output
        )));
    }
    Ok(())
}

fn build_report(
    config: &VerblensConfig,
    records: &[VerbRecord],
    edges: &[Edge],
    graph: &CharGraph,
    fingerprint: &str,
) -> Result<Vec<Table>> {
    let zh = config.lang == Lang::Zh;
    let tables = match config.report {
        ReportKind::Overview => overview_tables(records, zh),
        ReportKind::Centrality => {
            let analysis = graph_analysis(config, graph, fingerprint);
            vec![
                ranking_table(
                    "Degree Centrality",
                    &analysis.degree_ranking,
                    graph,
                    config.top_k,
                ),
                ranking_table(
                    "Betweenness Centrality",
                    &analysis.betweenness_ranking,
                    graph,
                    config.top_k,
                ),
            ]
        }
        ReportKind::Communities => {
            let analysis = graph_analysis(config, graph, fingerprint);
            vec![community_table(
                &analysis.communities,
                config.min_community_size,
            )]
        }
        ReportKind::Pathway => pathway_tables(config, graph)?,
        ReportKind::Coverage => coverage_tables(config, edges, zh),
        ReportKind::Contrasts => vec![contrast_table(config, records)],
        ReportKind::Deck => vec![deck_table(config, edges, graph)],
        ReportKind::Profile => profile_tables(config, records),
        ReportKind::Matrix => vec![matrix_table(edges)],
        ReportKind::Pitfalls => pitfall_tables(records),
    };
    Ok(tables)
}

/// Centrality rankings and communities share one computation per filter
/// fingerprint, memoized on disk between runs.
fn graph_analysis(config: &VerblensConfig, graph: &CharGraph, fingerprint: &str) -> CachedAnalysis {
    let cache = if config.no_cache {
        AnalysisCache::default()
    } else {
        AnalysisCache::load()
    };
    if let Some(hit) = cache.get(fingerprint) {
        return hit;
    }

    let to_rank = |scores: &[f64]| {
        top_k(graph, scores, graph.node_count())
            .into_iter()
            .map(|r| (r.character, r.score, r.in_degree, r.out_degree))
            .collect()
    };
    let analysis = CachedAnalysis {
        degree_ranking: to_rank(&degree_centrality(graph)),
        betweenness_ranking: to_rank(&betweenness_centrality(graph)),
        // Unfiltered; size thresholds apply per view
        communities: community::detect(graph, 1),
    };

    if !config.no_cache {
        cache.update(fingerprint.to_string(), analysis.clone());
        let _ = cache.save();
    }
    analysis
}

fn ranking_table(
    title: &str,
    ranking: &[(String, f64, usize, usize)],
    graph: &CharGraph,
    k: usize,
) -> Table {
    let mut table = Table::new(title, &["Character", "Score", "Ends", "Starts", "Tone"]);
    for (character, score, in_degree, out_degree) in ranking.iter().take(k) {
        let tone = graph
            .node(character)
            .and_then(|v| graph.dominant_tone(v))
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.push_row(vec![
            character.clone(),
            format!("{:.3}", score),
            in_degree.to_string(),
            out_degree.to_string(),
            tone,
        ]);
    }
    table
}

fn community_table(communities: &[Vec<String>], min_size: usize) -> Table {
    let mut table = Table::new("Word Families", &["Family", "Size", "Members"]);
    let mut index = 0;
    for community in communities.iter().filter(|c| c.len() >= min_size) {
        index += 1;
        table.push_row(vec![
            index.to_string(),
            community.len().to_string(),
            community.join("、"),
        ]);
    }
    table
}

fn pathway_tables(config: &VerblensConfig, graph: &CharGraph) -> Result<Vec<Table>> {
    let start = config.start_char.as_deref().unwrap_or_default();
    let pattern = config.target_tone_pair.as_deref().unwrap_or("1-2");
    let (Some(src), Some(dst)) = split_tone_pair(pattern) else {
        anyhow::bail!("Invalid target tone pair: {}", pattern);
    };

    let path = generate_path(graph, start, (src, dst), config.path_length, config.seed);

    let mut chain = Table::new("Path", &["Characters"]);
    if path.len() >= 2 {
        chain.push_row(vec![path.join(" → ")]);
    }
    let mut verbs = Table::new(
        "Verbs on Path",
        &["Char1", "Char2", "Verb", "Pinyin", "English", "Tone Pattern"],
    );
    for step in verbs_on_path(graph, &path) {
        verbs.push_row(vec![
            step.char1,
            step.char2,
            step.verb,
            step.pinyin,
            step.english,
            step.tone_pattern,
        ]);
    }
    Ok(vec![chain, verbs])
}

fn coverage_tables(config: &VerblensConfig, edges: &[Edge], zh: bool) -> Vec<Table> {
    let result = optimize(edges, config.max_characters);

    let mut summary = Table::new(
        "Coverage Summary",
        &["Selected", "Covered", "Total", "Coverage %"],
    );
    if result.total_edges > 0 {
        summary.push_row(vec![
            result.selected.len().to_string(),
            result.covered.len().to_string(),
            result.total_edges.to_string(),
            format!("{:.1}", result.coverage_percent()),
        ]);
    }

    let mut selection = Table::new("Selected Characters", &["Order", "Character"]);
    for (i, c) in result.selected.iter().enumerate() {
        selection.push_row(vec![(i + 1).to_string(), c.clone()]);
    }

    let mut covered = Table::new(
        "Covered Verbs",
        &["Verb", "Pinyin", "English", "Classification", "Chars"],
    );
    for edge in edges.iter().filter(|e| result.covered.contains(&e.id())) {
        covered.push_row(vec![
            edge.verb.clone(),
            edge.pinyin.clone(),
            edge.english.clone(),
            if zh { edge.class_zh.clone() } else { edge.class_en.clone() },
            format!("{}{}", edge.char1, edge.char2),
        ]);
    }

    vec![summary, selection, covered]
}

fn contrast_table(config: &VerblensConfig, records: &[VerbRecord]) -> Table {
    let pairs = find_contrasts(records, config.tone_focus);
    let mut table = Table::new(
        "Minimal Tone Contrasts",
        &[
            "Pinyin Base",
            "A Verb",
            "A Pinyin",
            "A Tone",
            "A English",
            "B Verb",
            "B Pinyin",
            "B Tone",
            "B English",
        ],
    );
    // Enumeration is complete; only the displayed rows are capped
    for pair in pairs.into_iter().take(config.contrast_display_cap) {
        table.push_row(vec![
            pair.pinyin_base,
            pair.a_verb,
            pair.a_pinyin,
            pair.a_tone,
            pair.a_english,
            pair.b_verb,
            pair.b_pinyin,
            pair.b_tone,
            pair.b_english,
        ]);
    }
    table
}

fn deck_table(config: &VerblensConfig, edges: &[Edge], graph: &CharGraph) -> Table {
    let deck = build_deck(
        edges,
        graph,
        config.deck_size,
        config.deck_weighting,
        config.seed,
    );
    // Anki-import-friendly column order
    let mut table = Table::new(
        "Study Deck",
        &["Verb", "Pinyin", "English", "Tone Pattern", "Chars"],
    );
    for edge in deck {
        table.push_row(vec![
            edge.verb.clone(),
            edge.pinyin.clone(),
            edge.english.clone(),
            edge.tone_pattern.clone(),
            format!("{}{}", edge.char1, edge.char2),
        ]);
    }
    table
}

fn profile_tables(config: &VerblensConfig, records: &[VerbRecord]) -> Vec<Table> {
    let character = config.profile_char.as_deref().unwrap_or_default();
    let profile = stats::character_profile(records, character);

    let mut tones = Table::new(format!("Tone Profile: {}", character), &["Tone", "Count"]);
    for (i, count) in profile.tone_counts.iter().enumerate() {
        if *count > 0 {
            tones.push_row(vec![(i + 1).to_string(), count.to_string()]);
        }
    }

    let verb_table = |title: &str, list: &[VerbRecord]| {
        let mut table = Table::new(title, &["Verb", "Pinyin", "English", "Tone Pattern"]);
        for r in list {
            table.push_row(vec![
                r.verb.clone(),
                r.pinyin.clone(),
                r.english.clone(),
                r.tone_pattern.clone(),
            ]);
        }
        table
    };

    vec![
        tones,
        verb_table(&format!("Starts ({}→•)", character), &profile.starts),
        verb_table(&format!("Ends (•→{})", character), &profile.ends),
    ]
}

fn matrix_table(edges: &[Edge]) -> Table {
    let matrix = stats::tone_matrix(edges);
    let mut table = Table::new(
        "Tone Transition Matrix",
        &["Src\\Dst", "1", "2", "3", "4", "5"],
    );
    for (i, row) in matrix.iter().enumerate() {
        let mut cells = vec![(i + 1).to_string()];
        cells.extend(row.iter().map(|c| c.to_string()));
        table.push_row(cells);
    }
    table
}

fn pitfall_tables(records: &[VerbRecord]) -> Vec<Table> {
    let mut poly = Table::new(
        "Polyphonic Characters",
        &["Character", "Src Variants", "Dst Variants", "Total"],
    );
    for p in stats::polyphonic_characters(records, 3).into_iter().take(40) {
        poly.push_row(vec![
            p.character.clone(),
            p.src_variants.to_string(),
            p.dst_variants.to_string(),
            p.variant_count().to_string(),
        ]);
    }

    let mut sandhi = Table::new("3-3 Sandhi Verbs", &["Verb", "Pinyin", "English"]);
    for (verb, pinyin, english) in stats::sandhi_candidates(records).into_iter().take(80) {
        sandhi.push_row(vec![verb, pinyin, english]);
    }

    vec![poly, sandhi]
}

fn overview_tables(records: &[VerbRecord], zh: bool) -> Vec<Table> {
    let mut classes = Table::new("Semantic Classes", &["Class", "Verbs"]);
    for (class, count) in stats::category_counts(records, zh) {
        classes.push_row(vec![class, count.to_string()]);
    }

    let component = |title: &str, which: stats::Component| {
        let mut table = Table::new(title, &["Component", "Count"]);
        for (value, count) in stats::component_frequencies(records, which, 15) {
            table.push_row(vec![value, count.to_string()]);
        }
        table
    };

    vec![
        classes,
        component("First-Character Initials", stats::Component::Initial1),
        component("First-Character Finals", stats::Component::Final1),
        component("Second-Character Initials", stats::Component::Initial2),
        component("Second-Character Finals", stats::Component::Final2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    const CSV: &str = "\
char1,char2,Chinese_Verbs,pinyin,English_Verb,分类（Classification）,tone_pattern,initial_1,final_1,initial_2,final_2
打,开,打开,da3kai1,to open,动作(Action),3-1,d,a,k,ai
开,门,开门,kai1men2,open the door,动作(Action),1-2,k,ai,m,en
打,门,打门,da3men2,knock,动作(Action),3-2,d,a,m,en
";

    fn config_for(dir: &TempDir, report: ReportKind) -> VerblensConfig {
        let data = dir.path().join("verbs.csv");
        fs::write(&data, CSV).unwrap();
        VerblensConfig {
            data,
            output: dir.path().join("out.txt"),
            report,
            no_cache: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_centrality_report_end_to_end() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_for(&dir, ReportKind::Centrality);
        let output = config.output.clone();
        run_analysis(config, None)?;
        let text = fs::read_to_string(output)?;
        assert!(text.contains("Degree Centrality"));
        // Every character touches 2 of the other 2, so all scores tie at 1.0
        // and rows fall back to character order: 开 < 打 < 门.
        let degree_section = text.split("Betweenness").next().unwrap();
        let tied: Vec<&str> = degree_section
            .lines()
            .filter(|l| l.contains("1.000"))
            .collect();
        assert_eq!(tied.len(), 3);
        assert!(tied[0].contains("开"));
        Ok(())
    }

    #[test]
    fn test_centrality_rows_carry_dominant_tone() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config_for(&dir, ReportKind::Centrality);
        let output = config.output.clone();
        run_analysis(config, None)?;
        let text = fs::read_to_string(output)?;
        let degree_section = text.split("Betweenness").next().unwrap();
        assert!(degree_section.contains("Tone"));
        // 门 only closes verbs (men2 twice), 打 only opens them (da3 twice)
        let row_for = |c: &str| {
            degree_section
                .lines()
                .find(|l| l.contains(c))
                .unwrap()
                .trim_end()
                .to_string()
        };
        assert!(row_for("门").ends_with('2'));
        assert!(row_for("打").ends_with('3'));
        Ok(())
    }

    #[test]
    fn test_pathway_report_deterministic() -> Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_for(&dir, ReportKind::Pathway);
        config.start_char = Some("打".into());
        config.target_tone_pair = Some("1-2".into());
        run_analysis(config.clone(), None)?;
        let first = fs::read_to_string(&config.output)?;
        run_analysis(config.clone(), None)?;
        let second = fs::read_to_string(&config.output)?;
        assert_eq!(first, second);
        assert!(first.contains("→"));
        Ok(())
    }

    #[test]
    fn test_missing_dataset_degrades_to_empty_report() -> Result<()> {
        let dir = TempDir::new()?;
        let config = VerblensConfig {
            data: dir.path().join("missing.csv"),
            output: dir.path().join("out.txt"),
            report: ReportKind::Coverage,
            no_cache: true,
            ..Default::default()
        };
        let output = config.output.clone();
        run_analysis(config, None)?;
        let text = fs::read_to_string(output)?;
        assert!(text.contains("Coverage Summary"));
        assert!(text.contains("(no rows)"));
        Ok(())
    }

    #[test]
    fn test_deck_csv_is_anki_shaped() -> Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_for(&dir, ReportKind::Deck);
        config.output_format = OutputFormat::Csv;
        config.output = dir.path().join("deck.csv");
        let output = config.output.clone();
        run_analysis(config, None)?;
        let text = fs::read_to_string(output)?;
        assert!(text.starts_with("Verb,Pinyin,English,Tone Pattern,Chars"));
        assert!(text.contains("打开"));
        Ok(())
    }

    #[test]
    fn test_filtered_run_excludes_classes() -> Result<()> {
        let dir = TempDir::new()?;
        let mut config = config_for(&dir, ReportKind::Coverage);
        config.filter.classes = vec!["Nonexistent".into()];
        let output = config.output.clone();
        run_analysis(config, None)?;
        let text = fs::read_to_string(output)?;
        assert!(text.contains("(no rows)"));
        Ok(())
    }
}
