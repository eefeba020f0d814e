//! hexweave CLI
//!
//! Reads a cell file and prints topology reports as JSON.
//!
//! Usage:
//!   hexweave summary <cells.json>   Component, perimeter and hole counts
//!   hexweave loops <cells.json>     Ordered perimeter and hole loops
//!   hexweave tile <cells.json>      Lattice tilings of the cell set
//!
//! A cell file is a JSON list of `{"point": {"q": .., "r": ..}, "value": ..}`
//! entries; `-` reads it from stdin.

mod config;
mod error;
mod report;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::process::ExitCode;

use hexweave_topology::LatticeMap;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Summary,
    Loops,
    Tile,
}

impl Command {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "summary" => Ok(Self::Summary),
            "loops" => Ok(Self::Loops),
            "tile" => Ok(Self::Tile),
            other => Err(Error::Usage(format!("unknown command '{other}'"))),
        }
    }
}

fn print_usage() {
    eprintln!("hexweave - Topology of cell sets on a hexagonal lattice");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  hexweave summary <cells.json>   Component, perimeter and hole counts");
    eprintln!("  hexweave loops <cells.json>     Ordered perimeter and hole loops");
    eprintln!("  hexweave tile <cells.json>      Lattice tilings of the cell set");
    eprintln!();
    eprintln!("Use '-' to read cells from stdin.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  HEXWEAVE_MAX_RADIUS   Largest ring searched for tile offsets (default: 8)");
    eprintln!("  HEXWEAVE_MAX_TILINGS  Maximum tilings reported (default: 16)");
    eprintln!("  RUST_LOG              Log filter (default: hexweave=info)");
}

fn load(path: &str) -> Result<LatticeMap<Value>> {
    let reader: Box<dyn Read> = if path == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(File::open(path)?)
    };
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

fn emit<T: Serialize>(report: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)?;
    writeln!(stdout)?;
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let (command, path) = match args {
        [command, path] => (Command::parse(command)?, path),
        _ => return Err(Error::Usage("expected a command and a cell file".into())),
    };
    let config = CliConfig::from_env()?;

    let map = load(path)?;
    tracing::info!(
        cells = map.len(),
        components = map.component_count(),
        "loaded {path}"
    );

    match command {
        Command::Summary => emit(&report::summary(&map)),
        Command::Loops => emit(&report::loops(&map)),
        Command::Tile => {
            let search = config.search();
            tracing::debug!(?search, "searching for tilings");
            emit(&report::tiles(&map, &search)?)
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexweave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage(message)) => {
            eprintln!("Error: {message}");
            eprintln!();
            print_usage();
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
