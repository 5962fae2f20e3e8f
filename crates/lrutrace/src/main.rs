//! lrutrace - replay put/get traces against an LRU cache

mod command;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::replay::Replayer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of items)
    #[arg(short, long, default_value_t = 1024)]
    capacity: usize,

    /// Trace file, one `put <key> <value>` or `get <key>` per line (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print hit/miss statistics after the replay
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr, replay output to stdout
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Cache capacity: {}", args.capacity);
    let replayer = Replayer::new(args.capacity)?;

    let input = open_input(args.input.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let executed = match replayer.run(input, &mut out) {
        Ok(executed) => executed,
        Err(e) => {
            warn!("Replay stopped: {:#}", e);
            return Err(e);
        }
    };
    info!("Replayed {} commands", executed);

    if args.stats {
        replayer.write_stats(&mut out)?;
    }
    out.flush()?;

    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open trace {}", path.display()))?;
            info!("Reading trace from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}
