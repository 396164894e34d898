//! VerusHash CLI
//!
//! A command-line tool for computing VerusHash digests.
//!
//! # Commands
//!
//! - `hash` - Digest hex input or a file
//! - `header` - Parse and hash a serialized block header
//! - `benchmark` - Measure hash rate per version
//! - `info` - Show the selected compression backend

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use verushash::algorithm::{self, ByteOrder, Engine, Variant, Version};
use verushash::header::BlockHeader;

#[derive(Parser)]
#[command(name = "verushash")]
#[command(version)]
#[command(about = "VerusHash proof-of-work digests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Digest hex-encoded input or the contents of a file
    Hash {
        /// Hex-encoded input
        #[arg(required_unless_present = "file")]
        input: Option<String>,

        /// Read raw input bytes from a file instead
        #[arg(short, long, conflicts_with = "input")]
        file: Option<PathBuf>,

        /// Version, optionally with a `_reverse` suffix
        #[arg(long, default_value = "v2b1")]
        variant: Variant,

        /// Reverse the digest (display order)
        #[arg(short, long)]
        reverse: bool,
    },

    /// Parse a hex-encoded serialized block header and hash it
    Header {
        /// Hex-encoded header
        header: String,

        /// Version to hash with (the header yields both byte orders)
        #[arg(long = "hash-version", default_value = "v2b1")]
        version: Version,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes per version
        #[arg(short, long, default_value = "1000")]
        count: u32,

        /// Number of threads to use (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Benchmark a single version instead of all of them
        #[arg(long = "hash-version")]
        version: Option<Version>,
    },

    /// Show the compression backend selected for this CPU
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Hash {
            input,
            file,
            variant,
            reverse,
        } => cmd_hash(input, file, variant, reverse, cli.json),
        Commands::Header { header, version } => cmd_header(&header, version, cli.json),
        Commands::Benchmark {
            count,
            threads,
            version,
        } => cmd_benchmark(count, threads, version, cli.json),
        Commands::Info => cmd_info(cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct HashReport {
    variant: String,
    backend: String,
    input_len: usize,
    digest: String,
}

fn cmd_hash(
    input: Option<String>,
    file: Option<PathBuf>,
    mut variant: Variant,
    reverse: bool,
    json: bool,
) -> anyhow::Result<()> {
    let data = match (input, file) {
        (_, Some(path)) => std::fs::read(&path)
            .map_err(|e| anyhow::anyhow!("could not read {}: {}", path.display(), e))?,
        (Some(hex_input), None) => hex::decode(hex_input.trim_start_matches("0x"))?,
        (None, None) => anyhow::bail!("no input given"),
    };
    if reverse {
        variant.order = ByteOrder::Reversed;
    }
    debug!(%variant, len = data.len(), "hashing input");

    let engine = algorithm::default_engine();
    let digest = engine.hash(variant, &data)?;

    if json {
        return print_json(&HashReport {
            variant: variant.to_string(),
            backend: backend_name(engine),
            input_len: data.len(),
            digest: hex::encode(digest),
        });
    }

    println!("{}", hex::encode(digest));
    Ok(())
}

#[derive(Serialize)]
struct HeaderReport {
    version: i32,
    time: u32,
    bits: String,
    nonce: String,
    solution_len: usize,
    prev_hash: String,
    hash: String,
    encodable_hash: String,
    trailing_bytes: usize,
}

fn cmd_header(header_hex: &str, version: Version, json: bool) -> anyhow::Result<()> {
    let bytes = hex::decode(header_hex.trim())?;
    let (header, rest) = BlockHeader::parse(&bytes)?;

    let engine = algorithm::default_engine();
    let report = HeaderReport {
        version: header.version,
        time: header.time,
        bits: hex::encode(header.bits),
        nonce: hex::encode(header.nonce),
        solution_len: header.solution.len(),
        prev_hash: hex::encode(header.display_prev_hash()),
        hash: hex::encode(header.display_hash(engine, version)?),
        encodable_hash: hex::encode(header.encodable_hash(engine, version)?),
        trailing_bytes: rest.len(),
    };

    if json {
        return print_json(&report);
    }

    println!("Header ({}):", version);
    println!("  Version:       {}", report.version);
    println!("  Time:          {}", report.time);
    println!("  Bits:          {}", report.bits);
    println!("  Nonce:         {}", report.nonce);
    println!("  Solution:      {} bytes", report.solution_len);
    println!("  Previous hash: {}", report.prev_hash);
    println!("  Hash:          {}", report.hash);
    if report.trailing_bytes > 0 {
        println!("  Trailing:      {} bytes not part of the header", report.trailing_bytes);
    }
    Ok(())
}

#[derive(Serialize)]
struct BenchmarkReport {
    version: String,
    hashes: u64,
    threads: usize,
    seconds: f64,
    hashrate: f64,
}

fn cmd_benchmark(
    count: u32,
    threads: Option<usize>,
    version: Option<Version>,
    json: bool,
) -> anyhow::Result<()> {
    let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);
    let versions = match version {
        Some(version) => vec![version],
        None => Version::ALL.to_vec(),
    };

    let engine = algorithm::default_engine();
    engine.initialize()?;

    if !json {
        println!(
            "Running benchmark with {} hashes per version on {} threads...",
            count, num_threads
        );
    }

    let mut reports = Vec::with_capacity(versions.len());
    for version in versions {
        let start = Instant::now();
        let per_thread = count.div_ceil(num_threads as u32);

        let hashes = std::thread::scope(|scope| -> anyhow::Result<u64> {
            let workers: Vec<_> = (0..num_threads)
                .map(|t| {
                    scope.spawn(move || -> algorithm::Result<u64> {
                        // full-size header with the thread id in the version field
                        let mut header = vec![0u8; 1487];
                        header[..4].copy_from_slice(&(t as u32).to_le_bytes());
                        for nonce in 0..per_thread {
                            header[108..112].copy_from_slice(&nonce.to_le_bytes());
                            engine.hash(Variant::forward(version), &header)?;
                        }
                        Ok(per_thread as u64)
                    })
                })
                .collect();

            let mut total = 0;
            for worker in workers {
                total += worker
                    .join()
                    .map_err(|_| anyhow::anyhow!("benchmark thread panicked"))??;
            }
            Ok(total)
        })?;

        let seconds = start.elapsed().as_secs_f64();
        reports.push(BenchmarkReport {
            version: version.to_string(),
            hashes,
            threads: num_threads,
            seconds,
            hashrate: hashes as f64 / seconds,
        });
    }

    if json {
        return print_json(&reports);
    }

    println!("\nResults ({} backend):", backend_name(engine));
    for report in &reports {
        println!(
            "  {:<5} {:>8} hashes in {:>6.2}s  {:>10.2} H/s",
            report.version, report.hashes, report.seconds, report.hashrate
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct InfoReport {
    backend: String,
    accelerated: bool,
    versions: Vec<String>,
}

fn cmd_info(json: bool) -> anyhow::Result<()> {
    let engine = algorithm::default_engine();
    let setup = engine.initialize()?;

    let report = InfoReport {
        backend: setup.backend().to_string(),
        accelerated: setup.backend().is_accelerated(),
        versions: Version::ALL.iter().map(|v| v.to_string()).collect(),
    };

    if json {
        return print_json(&report);
    }

    println!("Backend:     {}", report.backend);
    println!("Accelerated: {}", report.accelerated);
    println!("Versions:    {}", report.versions.join(", "));
    Ok(())
}

fn backend_name(engine: &Engine) -> String {
    engine
        .backend()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "uninitialized".to_string())
}
