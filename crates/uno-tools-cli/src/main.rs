//! unotool - helpers for office automation chores

mod recode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recode::LineSeparator;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "unotool")]
#[command(author, version, about = "Helpers for office automation chores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode a text file, e.g. for import into the office suite
    Recode {
        /// Input file (default: stdin)
        infile: Option<PathBuf>,

        /// Output file (default: stdout)
        outfile: Option<PathBuf>,

        /// Encoding of the input
        #[arg(short, long, alias = "source_encoding", default_value = "utf-8")]
        source_encoding: String,

        /// Encoding of the output
        #[arg(short, long, alias = "destination_encoding", default_value = "utf-8")]
        destination_encoding: String,

        /// Line separator of the output (default: the platform's)
        #[arg(short = 'r', long, alias = "line_separator", value_enum)]
        line_separator: Option<LineSeparator>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recode {
            infile,
            outfile,
            source_encoding,
            destination_encoding,
            line_separator,
        } => run_recode(
            infile.as_deref(),
            outfile.as_deref(),
            &source_encoding,
            &destination_encoding,
            line_separator.unwrap_or_else(LineSeparator::native),
        ),
    }
}

fn run_recode(
    infile: Option<&Path>,
    outfile: Option<&Path>,
    source_encoding: &str,
    destination_encoding: &str,
    separator: LineSeparator,
) -> Result<()> {
    let source = recode::codec(source_encoding)?;
    let destination = recode::codec(destination_encoding)?;

    let input = match infile {
        Some(path) => fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let output = recode::recode(&input, source, destination, separator)?;

    match outfile {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write {}", path.display()))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
