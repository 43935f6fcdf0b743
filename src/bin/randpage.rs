//! CLI tool that opens a random page of a random PDF
//!
//! Each argument is a file or directory to search for `.pdf` files, or `-`
//! to read candidate paths from stdin, one per line.

use rand::rngs::StdRng;
use rand::SeedableRng;
use randpage::{collect_candidates, Driver, LopdfPageCounter, Outcome, SystemLauncher, NO_USABLE_PDF};
use std::env;
use std::io;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: randpage <path | ->...");
        eprintln!();
        eprintln!("Opens a random page of a random PDF found under the given paths.");
        eprintln!("Use - to read candidate paths from stdin.");
        process::exit(1);
    }

    let candidates = collect_candidates(&args, &mut io::stdin().lock());
    log::info!("found candidate pdfs count={}", candidates.len());

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let mut driver = Driver::new(StdRng::seed_from_u64(seed), LopdfPageCounter, SystemLauncher);
    match driver.run(candidates) {
        Outcome::Success { .. } => process::exit(0),
        Outcome::Exhausted => {
            println!("{}", NO_USABLE_PDF);
            process::exit(1);
        }
    }
}
