//! pixflow - grayscale, rotate and blur images from the command line or
//! over HTTP.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixflow")]
#[command(author, version, about = "Image transform pipeline: grayscale, rotate 180, Gaussian blur")]
#[command(long_about = "
Applies grayscale, 180-degree rotation and Gaussian blur to PNG/JPEG images,
either one file at a time or as an HTTP service.

Examples:
  pixflow process in.png -o out.jpg --grayscale --rotate
  pixflow process in.png -o out.png --blur --size 9 --spread 2
  pixflow process in.png -o out.jpg --blur --grayscale --order grayscale,blur
  pixflow process in.png -o out.jpg --blur --wrap      # legacy 8-bit wraparound
  pixflow kernel --size 5 --spread 1
  pixflow serve --listen 0.0.0.0:8080 --config pixflow.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the transform pipeline on one image
    #[command(visible_alias = "p")]
    Process(ProcessArgs),

    /// Print a Gaussian kernel and its weight sum
    #[command(visible_alias = "k")]
    Kernel(KernelArgs),

    /// Serve POST /processImage over HTTP
    Serve(ServeArgs),
}

/// Arguments for the `process` command.
#[derive(Args)]
struct ProcessArgs {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output image (.png, .jpg or .jpeg)
    #[arg(short, long)]
    output: PathBuf,

    /// Convert to grayscale
    #[arg(short, long)]
    grayscale: bool,

    /// Rotate 180 degrees
    #[arg(short, long)]
    rotate: bool,

    /// Gaussian blur
    #[arg(short, long)]
    blur: bool,

    /// Blur kernel size (odd)
    #[arg(long)]
    size: Option<usize>,

    /// Blur spread (standard deviation)
    #[arg(long)]
    spread: Option<f64>,

    /// Stage order, e.g. blur,grayscale,rotate
    #[arg(long)]
    order: Option<String>,

    /// Dispatch stages concurrently under a buffer lock
    #[arg(long)]
    concurrent: bool,

    /// Use legacy 8-bit wraparound accumulation for blur
    #[arg(long)]
    wrap: bool,

    /// YAML config (pipeline, blur, jpeg_quality sections)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Arguments for the `kernel` command.
#[derive(Args)]
struct KernelArgs {
    /// Kernel size (odd)
    #[arg(short, long, default_value = "23")]
    size: usize,

    /// Spread (standard deviation)
    #[arg(long, default_value = "3.0")]
    spread: f64,

    /// Decimal places to print
    #[arg(short, long, default_value = "5")]
    precision: usize,
}

/// Arguments for the `serve` command.
#[derive(Args)]
struct ServeArgs {
    /// Address to listen on [default: 127.0.0.1:8080]
    #[arg(short, long)]
    listen: Option<String>,

    /// Request body limit in MiB [default: 32]
    #[arg(long)]
    max_body_mb: Option<usize>,

    /// YAML server config
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Installs the global subscriber. The returned guard flushes the file
/// writer on drop and must outlive all logging.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Process(args) => commands::process::run(args, cli.verbose),
        Commands::Kernel(args) => commands::kernel::run(args),
        Commands::Serve(args) => commands::serve::run(args),
    }
}
