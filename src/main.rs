//! sectree: build section trees from rendered documents.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use sectree::{config, input, toc};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sectree")]
#[command(about = "Align a table of contents with rendered markdown", long_about = None)]
struct Args {
    /// Rendered markdown files or directories to parse
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Directory receiving one artifact folder per document
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Use this `level;title` listing instead of extracting a TOC
    #[arg(long, value_name = "FILE")]
    toc: Option<PathBuf>,

    /// Similarity a heading must exceed to match its TOC entry
    #[arg(long, value_name = "RATIO")]
    threshold: Option<f64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> sectree::error::Result<()> {
    let mut cfg = config::Config::load()?;

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(threshold) = args.threshold {
        cfg.similarity_threshold = threshold;
    }
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&cfg.output_dir));

    let listing = match args.toc {
        Some(path) => Some(toc::Toc::parse_listing(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;
    if documents.is_empty() {
        log::warn!("No matching files found");
        return Ok(());
    }

    for document in &documents {
        match sectree::process_document(
            document,
            &input::SidecarOutline,
            listing.clone(),
            cfg.similarity_threshold,
            &output_dir,
        ) {
            Ok(dir) => log::info!("{} -> {}", document.display(), dir.display()),
            Err(e) => log::error!("Failed to process {}: {e}", document.display()),
        }
    }
    Ok(())
}
