//! Single-Level Parameter Sweep CLI.
//!
//! Replays one trace against a grid of single-level cache geometries:
//! capacity 4 KiB to 1 MiB (×4), line size 32 B to 256 B (×2), and
//! associativity 2 to 32 (×2), skipping shapes whose block count is not
//! divisible by the associativity. Appends one CSV row per shape to
//! `<trace>.csv`. The trace may carry an access-class column; it is
//! ignored here.

use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use memsim::cache::{Cache, CacheKind, CachePolicy};
use memsim::common::{Operation, SimResult};
use memsim::config::ReplacementPolicy;
use memsim::mem::PagedMemory;
use memsim::sim::report;
use memsim::sim::TraceReader;

/// Command-line arguments for the sweep driver.
#[derive(Parser, Debug)]
#[command(author, version, about = "Single-level cache parameter sweep")]
struct Args {
    /// Trace file to replay against every geometry.
    trace: String,

    /// Wait for Enter after each access.
    #[arg(short, long)]
    single_step: bool,

    /// Echo each access and dump cache contents after it.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("[!] {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> SimResult<()> {
    let csv_path = format!("{}.csv", args.trace);
    let mut csv = File::create(&csv_path)?;
    report::write_sweep_header(&mut csv)?;

    let mut cache_size = 4 * 1024;
    while cache_size <= 1024 * 1024 {
        let mut block_size = 32;
        while block_size <= 256 {
            let mut associativity = 2;
            while associativity <= 32 {
                let block_num = cache_size / block_size;
                if block_num % associativity == 0 {
                    simulate(args, &mut csv, cache_size, block_size, associativity)?;
                }
                associativity *= 2;
            }
            block_size *= 2;
        }
        cache_size *= 4;
    }

    println!("Result has been written to {}", csv_path);
    Ok(())
}

/// Replays the trace against one geometry and appends its CSV row.
fn simulate(
    args: &Args,
    csv: &mut File,
    cache_size: usize,
    block_size: usize,
    associativity: usize,
) -> SimResult<()> {
    let policy = CachePolicy::with_geometry(cache_size, block_size, associativity, 1, 100);
    let mut memory = PagedMemory::new();
    let mut cache = Cache::new(policy, ReplacementPolicy::Lru, CacheKind::Data, None)?;
    cache.print_info(false);

    for record in TraceReader::open(Path::new(&args.trace))? {
        let record = record?;
        if args.verbose {
            println!("{:?} {:x}", record.op, record.addr);
        }

        if !memory.page_exists(record.addr) {
            memory.add_page(record.addr);
        }
        match record.op {
            Operation::Read => {
                cache.read(&mut memory, record.addr)?;
            }
            Operation::Write => cache.write(&mut memory, record.addr, 0)?,
        }

        if args.verbose {
            cache.print_info(true);
        }
        if args.single_step {
            print!("Press Enter to Continue...");
            io::stdout().flush()?;
            io::stdin().read_line(&mut String::new())?;
        }
    }

    cache.print_statistics();
    report::write_sweep_row(csv, &cache)
}
