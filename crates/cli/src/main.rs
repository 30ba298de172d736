use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strategist_analysis::{Analysis, AnalysisConfig, AnalysisError, Analyzer, ErrorKind};
use strategist_scoring::ScoringWeights;
use strategist_snapshot::DecodeOptions;
use strategist_templates::{FsSource, TemplateStore};

mod rank;

use rank::{rank_councilors, rank_orgs};

#[derive(Parser)]
#[command(name = "strategist")]
#[command(about = "Analyze strategy-game save snapshots and rank choices", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Template data directory (overrides STRATEGIST_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Analysis tunables as JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the cleaned save text here when it fails to parse
    #[arg(long, global = true)]
    dump_on_failure: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full analysis of a save as JSON
    Analyze(AnalyzeArgs),

    /// Rank councilors or orgs the player could act on
    Rank(RankArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Save file (gzip-compressed JSON)
    save: PathBuf,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RankTarget {
    Councilors,
    Orgs,
}

#[derive(Args)]
struct RankArgs {
    /// Save file (gzip-compressed JSON)
    save: PathBuf,

    #[arg(long, value_enum)]
    target: RankTarget,

    /// Scoring weights as JSON (defaults weigh the core attributes)
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Do not divide scores by tier
    #[arg(long)]
    ignore_tier: bool,

    /// Print at most this many entries
    #[arg(long)]
    limit: Option<usize>,
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Decode => 2,
        ErrorKind::Integrity => 3,
        ErrorKind::Configuration => 4,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<AnalysisError>() {
            Some(analysis) => {
                eprintln!("Error ({:?}): {err:#}", analysis.kind());
                std::process::exit(exit_code(analysis.kind()));
            }
            None => Err(err),
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let analyzer = build_analyzer(&cli).await?;
    let options = match &cli.dump_on_failure {
        Some(path) => DecodeOptions::with_dump(path),
        None => DecodeOptions::default(),
    };

    match cli.command {
        Commands::Analyze(args) => run_analyze(&analyzer, &options, args).await,
        Commands::Rank(args) => run_rank(&analyzer, &options, args).await,
    }
}

async fn build_analyzer(cli: &Cli) -> Result<Analyzer> {
    let config = match &cli.config {
        Some(path) => load_config(path).await?,
        None => AnalysisConfig::default(),
    };

    let Some(dir) = &cli.data_dir else {
        return Ok(Analyzer::from_env(config)?);
    };
    let source = FsSource::new(dir, FsSource::language_from_env());
    let store = TemplateStore::new(Arc::new(source));
    Ok(Analyzer::new(Arc::new(store), config)?)
}

/// A `--config` file that cannot be read or parsed is a configuration failure.
async fn load_config(path: &Path) -> Result<AnalysisConfig, AnalysisError> {
    let invalid = |message: String| AnalysisError::InvalidConfig {
        message: format!("{}: {message}", path.display()),
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| invalid(err.to_string()))?;
    AnalysisConfig::from_json(&text).map_err(invalid)
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn analyze(analyzer: &Analyzer, options: &DecodeOptions, save: &Path) -> Result<Analysis> {
    Ok(analyzer.analyze_file(save, options).await?)
}

async fn run_analyze(
    analyzer: &Analyzer,
    options: &DecodeOptions,
    args: AnalyzeArgs,
) -> Result<()> {
    let analysis = analyze(analyzer, options, &args.save).await?;
    let text = if args.pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    print_stdout(&text)
}

async fn run_rank(analyzer: &Analyzer, options: &DecodeOptions, args: RankArgs) -> Result<()> {
    let weights = match &args.weights {
        Some(path) => ScoringWeights::from_json(&read_text(path).await?)
            .with_context(|| format!("Invalid weights in {}", path.display()))?,
        None => ScoringWeights::default(),
    };
    let analysis = analyze(analyzer, options, &args.save).await?;

    let limit = args.limit.unwrap_or(usize::MAX);
    let text = match args.target {
        RankTarget::Councilors => {
            let ranked = rank_councilors(&analysis, &weights, args.ignore_tier);
            log::info!("Ranked {} councilors", ranked.len());
            serde_json::to_string_pretty(&ranked.into_iter().take(limit).collect::<Vec<_>>())?
        }
        RankTarget::Orgs => {
            let ranked = rank_orgs(&analysis, &weights, args.ignore_tier);
            log::info!("Ranked {} orgs", ranked.len());
            serde_json::to_string_pretty(&ranked.into_iter().take(limit).collect::<Vec<_>>())?
        }
    };
    print_stdout(&text)
}
