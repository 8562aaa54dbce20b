//! Common test argument builders for use across test files

use bucketcp::cli::{Args, OutputConfig, PathConfig, SafetyConfig, StorageConfig, DEFAULT_REGION};
use std::path::PathBuf;

/// Create minimal test Args for basic testing
pub fn create_minimal_test_args() -> Args {
    Args {
        paths: PathConfig {
            input: "s3://bucket/".to_string(),
            output: "/tmp/bucketcp-test".to_string(),
        },
        storage: StorageConfig {
            region: DEFAULT_REGION.to_string(),
            max_retries: 3,
            endpoint_url: None,
        },
        safety: SafetyConfig {
            protect: Vec::new(),
            strip_prefix: false,
        },
        output: OutputConfig {
            dry_run: false,
            progress: false,
            verbose: 0,
            quiet: false,
        },
    }
}

/// Builder for test Args with fluent API
#[allow(dead_code)]
pub struct ArgsBuilder {
    args: Args,
}

#[allow(dead_code)]
impl ArgsBuilder {
    pub fn new() -> Self {
        Self {
            args: create_minimal_test_args(),
        }
    }

    pub fn input(mut self, uri: &str) -> Self {
        self.args.paths.input = uri.to_string();
        self
    }

    pub fn output(mut self, dir: &std::path::Path) -> Self {
        self.args.paths.output = dir.to_string_lossy().into_owned();
        self
    }

    pub fn protect(mut self, dir: PathBuf) -> Self {
        self.args.safety.protect.push(dir);
        self
    }

    pub fn strip_prefix(mut self, enabled: bool) -> Self {
        self.args.safety.strip_prefix = enabled;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.args.output.dry_run = enabled;
        self
    }

    pub fn build(self) -> Args {
        self.args
    }
}

impl Default for ArgsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
