mod config;

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use config::{CliOverrides, ConfigMerger};
use tracing::error;
use tracing_subscriber::EnvFilter;

use mdfix_engine::run_pipeline;
use mdfix_rules::{BulletMarker, EmphasisStyle};

#[derive(Debug, Parser)]
#[command(
    name = "mdfix",
    version,
    about = "Normalize Markdown corpora with an idempotent rule pipeline."
)]
struct Cli {
    /// Files or directories to process.
    paths: Vec<Utf8PathBuf>,

    /// Process the whole tree under the current directory.
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Report what would change without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Show a unified diff for each changed file.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Bound on normalization passes per file.
    #[arg(long)]
    max_passes: Option<usize>,

    /// File extensions to treat as Markdown (replaces the configured set).
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Directory names to prune during traversal (replaces the configured set).
    #[arg(long)]
    exclude: Vec<String>,

    /// Canonical unordered-list marker.
    #[arg(long, value_enum)]
    bullet: Option<BulletArg>,

    /// Canonical emphasis delimiter.
    #[arg(long, value_enum)]
    emphasis: Option<EmphasisArg>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Suppress the per-file report; the exit code still reflects the run.
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,

    /// Also list files that were already canonical.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Config file to use instead of ./mdfix.toml.
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum BulletArg {
    Dash,
    Asterisk,
    Plus,
}

impl From<BulletArg> for BulletMarker {
    fn from(arg: BulletArg) -> Self {
        match arg {
            BulletArg::Dash => BulletMarker::Dash,
            BulletArg::Asterisk => BulletMarker::Asterisk,
            BulletArg::Plus => BulletMarker::Plus,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum EmphasisArg {
    Asterisk,
    Underscore,
}

impl From<EmphasisArg> for EmphasisStyle {
    fn from(arg: EmphasisArg) -> Self {
        match arg {
            EmphasisArg::Asterisk => EmphasisStyle::Asterisk,
            EmphasisArg::Underscore => EmphasisStyle::Underscore,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:?}", e);
            eprintln!("mdfix: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<u8> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.paths.is_empty() && !cli.all {
        eprintln!("mdfix: nothing to do (pass files, directories, or --all)");
        return Ok(EXIT_USAGE);
    }

    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(camino::Utf8Path::new("."))?,
    };
    let options = ConfigMerger::new(file_config).merge(CliOverrides {
        bullet: cli.bullet.map(Into::into),
        emphasis: cli.emphasis.map(Into::into),
        max_passes: cli.max_passes,
        extensions: cli.extensions,
        exclude: cli.exclude,
        dry_run: cli.dry_run,
        emit_diff: cli.diff,
    });

    let roots = if cli.all {
        vec![Utf8PathBuf::from(".")]
    } else {
        cli.paths
    };

    let report = run_pipeline(&roots, &options);
    match cli.format {
        OutputFormat::Json => println!("{}", report.render_json()?),
        OutputFormat::Text if cli.quiet => {}
        OutputFormat::Text => print!("{}", report.render_text(cli.verbose)),
    }
    Ok(report.exit_code())
}
