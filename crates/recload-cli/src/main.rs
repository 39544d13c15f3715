/// recload command-line tool: decode, produce, and measure compressed
/// JSON record payloads.
///
/// # Command overview
///
/// ```text
/// recload <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Run the background decode task on a file, print its response
///   encode     Compress a JSON or CSV file into a payload
///   stats      Print size, ratio, and timing for a payload
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Enable debug logging on stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                        |
/// |------|------------------------------------------------|
/// | 0    | Success                                        |
/// | 1    | Error (I/O failure, failed decode, bad flags)  |
///
/// Logging and error details go to stderr so stdout can be piped cleanly.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_decode;
mod cmd_encode;
mod cmd_stats;
mod csv_records;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode and produce gzip-compressed JSON record payloads.
#[derive(Parser)]
#[command(name = "recload", version, about = "Compressed JSON record loader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload and print the response message as JSON.
    Decode(DecodeArgs),
    /// Compress a JSON or CSV file into a gzip (or zlib) payload.
    Encode(EncodeArgs),
    /// Print size, compression ratio, record count, and load time.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `recload decode`.
///
/// The file is read into memory, handed to the decode task on the
/// blocking pool, and the single response message is printed:
///
/// ```json
/// { "success": true, "data": [...], "loadTime": 0.031, "recordCount": 1204 }
/// ```
///
/// A failed decode prints the failure message and exits with code 1.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Path to the compressed payload (`.json.gz` or zlib).
    pub file: PathBuf,

    /// Pretty-print the response JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Print only the decoded `data` value instead of the full response.
    #[arg(long)]
    pub data_only: bool,

    /// Maximum inflated size in bytes.
    #[arg(long)]
    pub max_size: Option<usize>,
}

/// Arguments for `recload encode`.
///
/// ```text
/// ┌──────────────┬────────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                             │
/// ├──────────────┼────────────────────────────────────────────────────┤
/// │ -o, --output │ Output path (default: <input stem>.json.gz)        │
/// │ --level N    │ DEFLATE level 0-9 (default 9)                      │
/// │ --zlib       │ Write a zlib stream instead of gzip                │
/// │ --csv        │ Read CSV rows (implied by a `.csv` extension)      │
/// │ --require C  │ CSV columns that must be numeric, comma-separated  │
/// │ --decimals N │ Rounding for fractional required cells (default 6) │
/// └──────────────┴────────────────────────────────────────────────────┘
/// ```
///
/// ```text
/// recload encode accidents.csv --require latitude,longitude,year
/// ```
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// JSON or CSV file to compress.
    pub input: PathBuf,

    /// Output payload path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// DEFLATE compression level (0-9).
    #[arg(long, default_value_t = recload_codec::config::DEFAULT_COMPRESSION_LEVEL)]
    pub level: u32,

    /// Write a zlib stream instead of gzip.
    #[arg(long)]
    pub zlib: bool,

    /// Read the input as CSV with a header row.
    #[arg(long)]
    pub csv: bool,

    /// CSV columns that must hold numbers; other rows are skipped.
    #[arg(long, value_delimiter = ',')]
    pub require: Vec<String>,

    /// Decimal places kept for fractional values in required columns.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(0..=15))]
    pub decimals: u8,
}

/// Arguments for `recload stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the compressed payload.
    pub file: PathBuf,

    /// Maximum inflated size in bytes.
    #[arg(long)]
    pub max_size: Option<usize>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args).await,
        Commands::Encode(args) => cmd_encode::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
