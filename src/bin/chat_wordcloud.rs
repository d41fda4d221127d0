use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use chatcloud::{
    ChatCloudConfig,
    ChatStatistics,
    ConfigOverrides,
    Error,
    LayoutRenderer,
    Result,
    config::subsystems::MalformedPolicy,
    utils::init_logging,
};

const DEFAULT_CONFIG: &str = "default.ini";

/// Render Arabic and English word clouds from an exported chat.
#[derive(Debug, Parser)]
#[command(name = "chat_wordcloud", version)]
struct Args {
    /// Chat export (JSON with a `messages` array)
    chat_path: PathBuf,

    /// Where to write the images (defaults to the chat file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// INI configuration file (default.ini is used when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding stop word lists and fonts
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// What to do with malformed messages: skip or fail
    #[arg(long, value_parser = parse_policy)]
    on_malformed: Option<MalformedPolicy>,

    /// error, warn, info, debug, trace or none
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LevelFilter>,
}

fn parse_policy(value: &str) -> std::result::Result<MalformedPolicy, String> {
    MalformedPolicy::from_str(value).ok_or_else(|| format!("expected skip or fail, got {:?}", value))
}

fn parse_level(value: &str) -> std::result::Result<LevelFilter, String> {
    match value.trim().to_lowercase().as_str() {
        "none" => Ok(LevelFilter::Off),
        other => other.parse().map_err(|_| format!("unknown log level {:?}", value)),
    }
}

fn load_config(args: &Args) -> Result<ChatCloudConfig> {
    let mut config = match &args.config {
        Some(path) => ChatCloudConfig::from_ini(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => ChatCloudConfig::from_ini(DEFAULT_CONFIG)?,
        None => ChatCloudConfig::default(),
    };

    config.apply_overrides(&ConfigOverrides {
        data_dir: args.data_dir.clone(),
        output_dir: args.output_dir.clone(),
        on_malformed: args.on_malformed,
    })?;
    Ok(config)
}

fn spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(&args)?;
    if let Some(log_path) = init_logging(&config.logging, args.log_level)? {
        eprintln!("Logging to {:?}", log_path);
    }
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    info!("Starting word cloud generation for {:?}", args.chat_path);
    info!("Extraction: {}", config.extraction.describe());

    let progress = spinner();
    progress.set_message("Loading chat, stop words and fonts...");
    let stats = ChatStatistics::new(&args.chat_path, None, &config)?;
    let renderer = LayoutRenderer::from_config(&config)?;

    progress.set_message("Rendering word clouds...");
    let outputs = stats.generate_word_cloud(&renderer)?;
    progress.finish_with_message(format!(
        "Wrote {} and {} in {:.2}s",
        outputs.arabic.display(),
        outputs.english.display(),
        start_time.elapsed().as_secs_f64()
    ));

    info!("Done!");
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        if let Error::MalformedMessage { index, .. } = &e {
            eprintln!("Message {} does not have a usable text field (use --on-malformed skip to ignore it)", index);
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
