//! Split Instruction/Data Cache CLI.
//!
//! Replays an `op addr class` trace against an instruction cache and a
//! data cache sitting side by side over one paged memory, then writes
//! per-cache statistics to `<trace>_split.csv`. Records without an
//! access class terminate the run cleanly, like any malformed tail.

use clap::Parser;
use std::path::Path;
use std::process;

use memsim::common::SimResult;
use memsim::config::HierarchyConfig;
use memsim::sim::report;
use memsim::sim::{SplitHierarchy, TraceReader};

/// Command-line arguments for the split-cache driver.
#[derive(Parser, Debug)]
#[command(author, version, about = "Split instruction/data cache simulator")]
struct Args {
    /// Trace file to replay (`op addr class` records).
    trace: String,

    /// Echo each access.
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
    let config = HierarchyConfig::default();
    let mut split = SplitHierarchy::new(&config.l1)?;

    for record in TraceReader::open(Path::new(&args.trace))? {
        let record = record?;
        let Some(class) = record.class else {
            break;
        };
        if args.verbose {
            println!("{:?} {:x} {:?}", record.op, record.addr, class);
        }
        split.process(record.op, record.addr, class)?;
    }

    split.print_statistics();
    let csv_path = report::write_split_csv(&split, Path::new(&args.trace))?;
    println!("\nResults have been written to {}", csv_path.display());
    Ok(())
}
