use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use headerprobe::analysis::Analyzer;
use headerprobe::config::ProbeConfig;
use headerprobe::export::{self, ExportData, ExportFormat};
use headerprobe::extract::{CtagsExtractor, TagExtractor, TagsFileExtractor};
use headerprobe::universe::{DiscoveryOptions, FileSelection, FileUniverse};

#[derive(Parser)]
#[command(name = "headerprobe")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(about = "Measures how much of each included C header a source file actually uses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report include utility for the given files
    Analyze(AnalyzeArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Files to report on (sources and headers)
    #[arg(short = 'a', long = "analyze", required = true, num_args = 1..)]
    analyze: Vec<String>,

    /// Additional files that make up the include universe
    #[arg(short = 'f', long = "files", num_args = 1..)]
    files: Vec<String>,

    /// Walk the root directory for sources and headers
    #[arg(short, long)]
    recursive: bool,

    /// Directory file paths are relative to; a recursive walk starts here
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Glob patterns of files to leave out
    #[arg(short, long, value_name = "GLOB", num_args = 1..)]
    exclude: Vec<String>,

    /// Debug logging, including the ctags command lines
    #[arg(short, long)]
    verbose: bool,

    /// ctags binary to run on each header
    #[arg(long, value_name = "BIN", default_value = "ctags")]
    ctags: String,

    /// Read tags from a pre-generated tags file instead of running ctags
    #[arg(long, value_name = "FILE")]
    tags: Option<PathBuf>,

    /// Report format: text, json, csv, markdown
    #[arg(long, default_value = "text")]
    format: ExportFormat,

    /// Report width in columns (defaults to the terminal width)
    #[arg(long, value_name = "COLS")]
    width: Option<usize>,

    /// List include cycles after the reports
    #[arg(long)]
    cycles: bool,
}

impl AnalyzeArgs {
    fn config(&self) -> ProbeConfig {
        ProbeConfig {
            verbose: self.verbose,
            ctags: self.ctags.clone(),
            tags_file: self.tags.clone(),
            format: self.format,
            width: self.width,
            cycles: self.cycles,
            discovery: DiscoveryOptions {
                recursive: self.recursive,
                root: self.root.clone(),
                exclude: self.exclude.clone(),
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Analyze(args)) => {
            let config = args.config();
            init_logging(&config);

            let stdout = io::stdout();
            match run(args, &config, &mut stdout.lock()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("ERROR    {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Some(Commands::Version) => {
            println!("headerprobe v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        None => {
            println!("headerprobe - C include utility analyzer");
            println!("Run 'headerprobe analyze -a <file>... -f <file>...' to analyze includes");
            println!("Run 'headerprobe --help' for more information");
            ExitCode::SUCCESS
        }
    }
}

/// Install the log subscriber. `RUST_LOG` overrides the verbosity flag.
fn init_logging(config: &ProbeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_extractor(config: &ProbeConfig) -> Box<dyn TagExtractor> {
    match &config.tags_file {
        Some(path) => match TagsFileExtractor::open(path) {
            Ok(extractor) => {
                tracing::debug!(
                    "Loaded tags for {} files from {}",
                    extractor.file_count(),
                    path.display()
                );
                Box::new(extractor)
            }
            Err(e) => {
                tracing::error!("{}", e);
                Box::new(TagsFileExtractor::default())
            }
        },
        None => Box::new(
            CtagsExtractor::new(config.ctags.as_str()).with_stderr_logging(config.verbose),
        ),
    }
}

/// Analyze the selected files and write the report to `out`.
///
/// Nothing is written unless the universe loads.
fn run<W: Write>(args: &AnalyzeArgs, config: &ProbeConfig, out: &mut W) -> Result<()> {
    let selection = FileSelection::discover(&args.files, &args.analyze, &config.discovery)?;
    tracing::debug!(
        "{} headers, {} sources, {} to analyze",
        selection.headers.len(),
        selection.sources.len(),
        selection.analysis.len()
    );

    let extractor = build_extractor(config);
    let universe = FileUniverse::load(&selection, &*extractor)?;
    let analyzer = Analyzer::new(&universe);

    let reports = selection
        .analysis
        .iter()
        .filter_map(|path| match analyzer.analyze(path) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        })
        .collect();

    let mut data = ExportData::new(reports);
    if config.cycles {
        data = data.with_cycles(analyzer.graph().detect_cycles());
    }

    export::export(config.format, &data, config.report_width(), out)
        .context("Failed to write report")?;
    out.flush().context("Failed to write report")?;

    Ok(())
}
