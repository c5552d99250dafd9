//! docxtext CLI - plain text extraction from .docx documents
//!
//! Prints the concatenated run text of a WordprocessingML document.

use clap::{CommandFactory, Parser};
use colored::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Plain text extraction from .docx documents
#[derive(Parser)]
#[command(
    name = "docxtext",
    author = "iyulab",
    version,
    about = "Extract plain text from a .docx document",
    long_about = "docxtext - prints the text runs of a WordprocessingML document.\n\n\
                  Runs are concatenated in document order without separators."
)]
struct Cli {
    /// Input file path
    input: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    // A missing input is a usage error, reported before any file access
    let Some(input) = cli.input else {
        println!("{}", Cli::command().render_usage());
        std::process::exit(1);
    };

    if let Err(e) = run(&input, cli.output.as_deref()) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(input = %input.display(), "extracting");

    let text = docxtext::extract_text(input)?;
    write_output(output, &text)?;

    if let Some(path) = output {
        println!(
            "{} Extracted text: {}",
            "✓".green().bold(),
            path.display()
        );
    }

    Ok(())
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
