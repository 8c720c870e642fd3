use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use verblens::analysis::deck::DeckWeighting;
use verblens::config::{Lang, OutputFormat, ReportKind};
use verblens::{ToneFocus, VerblensConfig, run};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Plain,
    Csv,
    Json,
    Md,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Plain => OutputFormat::Plain,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Md => OutputFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReport {
    Overview,
    Centrality,
    Communities,
    Pathway,
    Coverage,
    Contrasts,
    Deck,
    Profile,
    Matrix,
    Pitfalls,
}

impl From<CliReport> for ReportKind {
    fn from(r: CliReport) -> Self {
        match r {
            CliReport::Overview => ReportKind::Overview,
            CliReport::Centrality => ReportKind::Centrality,
            CliReport::Communities => ReportKind::Communities,
            CliReport::Pathway => ReportKind::Pathway,
            CliReport::Coverage => ReportKind::Coverage,
            CliReport::Contrasts => ReportKind::Contrasts,
            CliReport::Deck => ReportKind::Deck,
            CliReport::Profile => ReportKind::Profile,
            CliReport::Matrix => ReportKind::Matrix,
            CliReport::Pitfalls => ReportKind::Pitfalls,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLang {
    En,
    Zh,
}

impl From<CliLang> for Lang {
    fn from(l: CliLang) -> Self {
        match l {
            CliLang::En => Lang::En,
            CliLang::Zh => Lang::Zh,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliToneFocus {
    Any,
    Src,
    Dst,
}

impl From<CliToneFocus> for ToneFocus {
    fn from(f: CliToneFocus) -> Self {
        match f {
            CliToneFocus::Any => ToneFocus::Any,
            CliToneFocus::Src => ToneFocus::SourceDiffers,
            CliToneFocus::Dst => ToneFocus::DestDiffers,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version="0.4.0", about="Character-graph analytics for two-character Chinese verbs", long_about = None)]
struct Args {
    /// Path to the verb dataset (CSV)
    data: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Report to produce
    #[arg(short, long, value_enum)]
    report: Option<CliReport>,

    /// Classification language for filters and tables
    #[arg(long, value_enum)]
    lang: Option<CliLang>,

    /// Keep only these semantic classes (repeatable)
    #[arg(long)]
    class: Vec<String>,

    /// Keep only these tone patterns, e.g. "3-1" (repeatable)
    #[arg(long)]
    tone_pattern: Vec<String>,

    /// Keep only these first-character tones (repeatable)
    #[arg(long)]
    src_tone: Vec<u8>,

    /// Keep only these second-character tones (repeatable)
    #[arg(long)]
    dst_tone: Vec<u8>,

    /// How many ranked characters to show
    #[arg(long)]
    top_k: Option<usize>,

    /// Hide word families smaller than this
    #[arg(long)]
    min_community_size: Option<usize>,

    /// Starting character for the pathway report
    #[arg(long)]
    start: Option<String>,

    /// Target tone pair for the pathway report, e.g. "3-1"
    #[arg(long)]
    target: Option<String>,

    /// Maximum pathway length in characters
    #[arg(long)]
    length: Option<usize>,

    /// Seed for pathway jitter, deck sampling and the quiz
    #[arg(long)]
    seed: Option<u64>,

    /// Character budget for the coverage report
    #[arg(long)]
    max_characters: Option<usize>,

    /// Which tone position must differ in the contrasts report
    #[arg(long, value_enum)]
    tone_focus: Option<CliToneFocus>,

    /// Number of cards in the study deck
    #[arg(long)]
    deck_size: Option<usize>,

    /// Sample the deck uniformly instead of by connectivity
    #[arg(long)]
    uniform_deck: bool,

    /// Character to profile (profile report)
    #[arg(long)]
    profile: Option<String>,

    /// Skip the on-disk analysis cache
    #[arg(long)]
    no_cache: bool,

    /// Play the verb-forming quiz on the terminal
    #[arg(long)]
    quiz: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load from file or default
    let mut config = VerblensConfig::load_from_file().unwrap_or_default();

    // 2. Override with CLI args
    if let Some(d) = args.data {
        config.data = d;
    }
    if let Some(o) = args.output {
        config.output = o;
    }
    if let Some(f) = args.format {
        config.output_format = f.into();
    }
    if let Some(r) = args.report {
        config.report = r.into();
    }
    if let Some(l) = args.lang {
        config.lang = l.into();
    }
    if !args.class.is_empty() {
        config.filter.classes = args.class;
    }
    if !args.tone_pattern.is_empty() {
        config.filter.tone_patterns = args.tone_pattern;
    }
    if !args.src_tone.is_empty() {
        config.filter.src_tones = args.src_tone;
    }
    if !args.dst_tone.is_empty() {
        config.filter.dst_tones = args.dst_tone;
    }
    if let Some(k) = args.top_k {
        config.top_k = k;
    }
    if let Some(m) = args.min_community_size {
        config.min_community_size = m;
    }
    if args.start.is_some() {
        config.start_char = args.start;
    }
    if args.target.is_some() {
        config.target_tone_pair = args.target;
    }
    if let Some(l) = args.length {
        config.path_length = l;
    }
    if let Some(s) = args.seed {
        config.seed = s;
    }
    if let Some(m) = args.max_characters {
        config.max_characters = m;
    }
    if let Some(f) = args.tone_focus {
        config.tone_focus = f.into();
    }
    if let Some(n) = args.deck_size {
        config.deck_size = n;
    }
    if args.uniform_deck {
        config.deck_weighting = DeckWeighting::Uniform;
    }
    if args.profile.is_some() {
        config.profile_char = args.profile;
    }
    if args.no_cache {
        config.no_cache = true;
    }
    if args.verbose {
        config.verbose = true;
    }

    config.validate()?;

    if args.quiz {
        verblens::session::start_quiz(config)?;
    } else {
        run(config)?;
    }

    Ok(())
}
