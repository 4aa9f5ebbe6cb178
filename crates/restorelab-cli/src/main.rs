use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restorelab_core::config::{self, PipelineConfig};
use restorelab_core::{ApplyOutcome, Category, Operation, PreviewSync, TransformRequest};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that write the preview cache.
#[derive(clap::Args, Clone, Debug)]
struct CacheArgs {
    /// Do not write the preview cache file
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser, Debug)]
#[command(name = "restorelab")]
#[command(about = "Apply enhancement filters and noise models to a single image")]
#[command(long_about = "\
Apply enhancement filters and noise models to a single image

Each run loads one image, applies one operation to the original and saves
the result. Extended-range results (noise, Laplacian, Sobel) are brought to
8 bits with the configured normalization before saving.

Run 'restorelab ops' for the list of operations and
'restorelab gen-config' for a documented config file.")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available operations
    Ops,
    /// Load an image, apply one operation and save the result
    Apply(ApplyArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

#[derive(clap::Args, Debug)]
struct ApplyArgs {
    /// Image to load
    input: PathBuf,

    /// Operation id (see `restorelab ops`)
    #[arg(long)]
    op: Operation,

    /// Median kernel size, a positive odd integer up to 255
    #[arg(long, allow_hyphen_values = true)]
    kernel: Option<i64>,

    /// Where to save the result. The extension picks the format.
    #[arg(short, long, default_value = "image.png")]
    output: PathBuf,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed seed for the noise generators
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    cache: CacheArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Ops => {
            for line in format_ops() {
                println!("{}", line);
            }
        }
        Command::Apply(args) => run_apply(&args)?,
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Operation listing grouped by menu category.
fn format_ops() -> Vec<String> {
    let mut lines = Vec::new();
    for (category, title) in [
        (Category::Enhancement, "Enhancement"),
        (Category::Restoration, "Restoration"),
    ] {
        lines.push(title.to_string());
        for op in Operation::ALL.into_iter().filter(|op| op.category() == category) {
            let hint = if op.takes_kernel() { "  [--kernel K]" } else { "" };
            lines.push(format!("  {:<16} {}{}", op.id(), op.label(), hint));
        }
    }
    lines
}

fn build_request(operation: Operation, kernel: Option<i64>) -> TransformRequest {
    match kernel {
        Some(k) if operation.takes_kernel() => TransformRequest::with_kernel(operation, k),
        Some(_) => {
            debug!("{} takes no kernel, ignoring --kernel", operation);
            TransformRequest::new(operation)
        }
        None => TransformRequest::new(operation),
    }
}

fn resolve_config(args: &ApplyArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.cache.no_cache {
        config.preview.cache_path = None;
    }
    Ok(config)
}

fn run_apply(args: &ApplyArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let mut sync = PreviewSync::new(config);

    let loaded = sync
        .load_path(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let (width, height) = loaded.source_dimensions;
    info!("Loaded {} ({}x{})", args.input.display(), width, height);

    match sync.apply(&build_request(args.op, args.kernel))? {
        ApplyOutcome::Applied(applied) => match applied.kernel {
            Some(kernel) => println!("Applied {} (kernel {})", applied.operation.label(), kernel),
            None => println!("Applied {}", applied.operation.label()),
        },
        ApplyOutcome::Cancelled => {
            println!("Cancelled {}", args.op.label());
            return Ok(());
        }
    }

    let saved = sync
        .save_modified(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Saved {}", saved.display());
    Ok(())
}
