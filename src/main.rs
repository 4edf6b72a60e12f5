//! HD Scanner CLI
//!
//! Reports which media assets under a directory meet the canonical HD format.

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use hd_scanner::{scan, MediaInfoProbe, ScanConfig, ScanError, ScanReport};

const ABOUT: &str = r#"
HD Scanner - check media assets against 1920x1080 (60 / 59.94 fps)

Examples:
  hd_scanner -s /path/to/media              Scan one directory
  hd_scanner -s /media -t 8                 Use 8 probe workers
  hd_scanner -s /media --timeout 30         Give up on a video after 30s
  hd_scanner -s /media --json               Print the full report as JSON

Requires mediainfo on PATH.
"#;

/// Batch HD-compliance checker
#[derive(Parser)]
#[command(name = "hd_scanner")]
#[command(author, version, about = ABOUT, long_about = None)]
struct Cli {
    /// Absolute path to search for assets (prompted for when omitted)
    #[arg(short = 's', long)]
    search: Option<PathBuf>,

    /// Probe worker threads (0 = auto-detect)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Seconds before a video probe is abandoned (at least 1)
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Video metadata tool name or path
    #[arg(long, default_value = "mediainfo")]
    mediainfo: String,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let pause = cli.pause;

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    };

    if pause {
        info!("Press enter to continue");
        let _ = io::stdin().lock().read_line(&mut String::new());
    }
    process::exit(code);
}

fn run(cli: Cli) -> Result<(), ScanError> {
    info!("STARTING...");

    let raw_root = match cli.search {
        Some(path) => path,
        None => prompt_for_root()?,
    };
    let root = ScanConfig::resolve_root(&raw_root)?;
    info!("searchPath : {}", root.display());

    let config = ScanConfig::builder()
        .root(root)
        .num_threads(cli.threads)
        .probe_timeout(Duration::from_secs(cli.timeout))
        .mediainfo_program(cli.mediainfo)
        .build();

    let probe = MediaInfoProbe::from_config(&config)?;
    let report = scan(&config, &probe)?;

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize report: {}", e),
        }
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn prompt_for_root() -> Result<PathBuf, ScanError> {
    print!("Directory to scan: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

fn print_summary(report: &ScanReport) {
    let summary = report.summary();
    println!("Scan completed:");
    println!("  Assets checked: {}", summary.dispatched);
    println!("  Compliant: {}", summary.compliant);
    println!("  Not compliant: {}", summary.non_compliant);
    println!("  Failed to probe: {}", summary.failed);
    println!("  Total files: {}", summary.total_files);
    println!("  Total dirs: {}", summary.total_dirs);
    println!("  Duration: {}ms", summary.duration_ms);
}
