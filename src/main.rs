use clap::builder::RangedU64ValueParser;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use parzst::io_utils::parzst_cli_error;
use parzst::{compress_file, Config, DEFAULT_LEVEL, DEFAULT_WORKERS};

/// Compress FILE into FILE.zst using a pool of worker threads.
#[derive(Parser)]
#[command(name = "parzst", version)]
struct Args {
    /// File to compress
    input: PathBuf,
    /// Compression level
    #[arg(value_parser = clap::value_parser!(i32).range(1..), default_value_t = DEFAULT_LEVEL)]
    level: i32,
    /// Number of worker threads
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..), default_value_t = DEFAULT_WORKERS)]
    threads: usize,
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    if let Err(e) = run(args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new(args.level, args.threads);
    let (_, stats) = compress_file(&args.input, &config, progress_bar())
        .map_err(|e| parzst_cli_error(&format!("compressing '{}'", args.input.display()), e))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        stats.report();
    }
    Ok(())
}
