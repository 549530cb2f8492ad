//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We look for a sectree.toml in the working directory, and if present load settings from
//! there. This provides the heading match threshold, the output directory and the file
//! extensions that count as rendered documents.

use crate::error::{Error, Result};
use facet::Facet;
use std::fs;
use std::io;
use std::path::Path;

/// File name searched for in the working directory.
pub const CONFIG_FILE: &str = "sectree.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from sectree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 0.6)]
    /// Similarity a rendered heading must exceed to match its TOC entry.
    pub similarity_threshold: f64,
    #[facet(default = "outputs".to_string())]
    /// Directory receiving one artifact folder per document.
    pub output_dir: String,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
}

impl Config {
    /// Load configuration from sectree.toml if present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from an explicit path, defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::parse(""),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration from TOML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn parse(contents: &str) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
