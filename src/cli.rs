//! Command-line interface definitions
//!
//! This module organizes CLI arguments by **functional usage** - each group
//! contains the options needed by a specific component or subsystem.

use crate::copy::{CopyOptions, KeyLayout};
use crate::path::{ProtectedDirectories, StorageUri};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Region used when `--region` is not given
pub const DEFAULT_REGION: &str = "cn-north-1";

/// Copy every object under a storage prefix into a local directory
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source prefix and destination directory
    #[command(flatten)]
    pub paths: PathConfig,

    /// Storage service connection
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Destination layout and protected directories
    #[command(flatten)]
    pub safety: SafetyConfig,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

// ============================================================================
// FUNCTIONAL GROUPS: Organized by what component consumes them
// ============================================================================

/// Paths configuration
///
/// Used by: `main()`, `Copier::run()`
#[derive(clap::Args, Debug, Clone)]
pub struct PathConfig {
    /// Source prefix, e.g. s3://bucket/logs/
    #[arg(short = 'i', long = "input", value_name = "URI")]
    pub input: String,

    /// Local directory to copy into
    ///
    /// Each object is written at DIR/KEY.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: String,
}

/// Storage service configuration
///
/// Used by: `S3Store::connect()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Storage Options")]
pub struct StorageConfig {
    /// Region of the bucket
    #[arg(short = 'r', long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Retries per request performed by the storage transport
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    /// Endpoint of an S3-compatible service (uses path-style addressing)
    #[arg(long, value_name = "URL")]
    pub endpoint_url: Option<String>,
}

#[cfg(feature = "s3")]
impl StorageConfig {
    /// Connection settings for the S3 backend
    #[must_use]
    pub fn s3_config(&self) -> crate::storage::s3::S3Config {
        crate::storage::s3::S3Config {
            region: self.region.clone(),
            max_retries: self.max_retries,
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// Destination safety and layout configuration
///
/// Used by: `SafetyGuard::new()`, `Copier::with_options()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Destination Options")]
pub struct SafetyConfig {
    /// Also refuse to write inside DIR (repeatable)
    #[arg(long = "protect", value_name = "DIR")]
    pub protect: Vec<PathBuf>,

    /// Write keys relative to the source prefix instead of the full key
    #[arg(long)]
    pub strip_prefix: bool,
}

impl SafetyConfig {
    /// Built-in protected directories followed by any `--protect` entries
    ///
    /// # Errors
    ///
    /// Returns an error if a `--protect` entry cannot be made absolute.
    pub fn protected_directories(&self) -> Result<ProtectedDirectories> {
        let mut protected = ProtectedDirectories::default();
        protected.extend(&self.protect)?;
        Ok(protected)
    }

    /// Key layout selected by `--strip-prefix`
    #[must_use]
    pub const fn layout(&self) -> KeyLayout {
        if self.strip_prefix {
            KeyLayout::StripPrefix
        } else {
            KeyLayout::FullKey
        }
    }
}

/// Output and logging configuration
///
/// Used by: `main()`, logging initialization, progress display
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Show what would be copied without fetching or writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Show progress information
    #[arg(long)]
    pub progress: bool,

    /// Verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Maximum log level for the tracing subscriber
    #[must_use]
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

// ============================================================================
// IMPLEMENTATION: Convenience methods and validation
// ============================================================================

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The input is not a `scheme://bucket/prefix` URI
    /// - The output directory is empty
    /// - Both --quiet and --verbose options are used
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = StorageUri::parse(&self.paths.input) {
            anyhow::bail!("{e} (expected s3://bucket/prefix)");
        }

        if self.paths.output.trim().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }

        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        Ok(())
    }

    /// Options for the copier derived from the flags
    #[must_use]
    pub const fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            layout: self.safety.layout(),
            dry_run: self.output.dry_run,
        }
    }
}
