//! Multi-Level Cache Simulator CLI.
//!
//! The main executable for the simulator. It parses command-line
//! arguments, builds the L1/L2/L3 hierarchy from the optional TOML
//! configuration, replays the trace through it, and writes the
//! per-level statistics next to the trace file.
//!
//! # Usage
//!
//! ```text
//! memsim <trace> [--config <file.toml>] [-p] [-f] [-v]
//! ```
//!
//! The trace holds one `op addr` record per line with `op` in `{r, w}`
//! and `addr` in hexadecimal. Results are printed to stdout and written
//! to `<trace>_multi_level.csv`.

use clap::Parser;
use std::path::Path;
use std::{fs, process};

use memsim::common::{SimError, SimResult};
use memsim::config::{HierarchyConfig, ReplacementPolicy};
use memsim::sim::report;
use memsim::sim::{Hierarchy, TraceReader};

/// Command-line arguments for the multi-level driver.
#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-level cache hierarchy simulator")]
struct Args {
    /// Trace file to replay.
    trace: String,

    /// Optional TOML file overriding the default hierarchy geometry.
    #[arg(short, long)]
    config: Option<String>,

    /// Enable the stride prefetcher.
    #[arg(short, long)]
    prefetch: bool,

    /// Use FIFO replacement at every level instead of LRU.
    #[arg(short, long)]
    fifo: bool,

    /// Attach a victim cache to L1.
    #[arg(short, long)]
    victim_cache: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("[!] {}", e);
        process::exit(1);
    }
}

/// Builds the hierarchy, replays the trace, and reports the results.
fn run(args: &Args) -> SimResult<()> {
    let mut config = match &args.config {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)
            .map_err(|e| SimError::Config(e.to_string()))?,
        None => HierarchyConfig::default(),
    };

    if args.prefetch {
        config.prefetch = true;
    }
    if args.fifo {
        for level in [&mut config.l1, &mut config.l2, &mut config.l3] {
            level.policy = ReplacementPolicy::Fifo;
        }
    }
    if args.victim_cache {
        config.l1.victim = true;
    }

    print_banner(&config);

    let mut hierarchy = Hierarchy::new(&config)?;
    for record in TraceReader::open(Path::new(&args.trace))? {
        let record = record?;
        hierarchy.process(record.op, record.addr)?;
    }

    hierarchy.print_statistics();
    let csv_path = report::write_multi_level_csv(&hierarchy, Path::new(&args.trace))?;
    println!("\nResults have been written to {}", csv_path.display());
    Ok(())
}

fn print_banner(config: &HierarchyConfig) {
    println!("Global Configuration");
    println!("--------------------");
    for (name, level) in [("L1", &config.l1), ("L2", &config.l2), ("L3", &config.l3)] {
        println!(
            "  {}: {} KB, {} B lines, {} ways, {:?}, hit {}, miss {}{}",
            name,
            level.size_bytes / 1024,
            level.line_bytes,
            level.ways,
            level.policy,
            level.hit_latency,
            level.miss_latency,
            if level.victim { ", victim cache" } else { "" }
        );
    }
    println!(
        "  Prefetch:           {}",
        if config.prefetch { "Enabled" } else { "Disabled" }
    );
    println!("--------------------");
}
