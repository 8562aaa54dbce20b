//! Amazon S3 backend
//!
//! Wraps the async AWS SDK behind the blocking [`ObjectStore`] interface. A
//! current-thread tokio runtime owned by the store drives each request to
//! completion before returning, so callers stay strictly sequential.
//!
//! Credentials come from the SDK's default provider chain (environment
//! variables, shared profile, then the instance metadata role). Transient
//! failures are retried inside the SDK up to the configured attempt count.

use super::{ListPage, ObjectStore, StoreError};
use crate::cli::DEFAULT_REGION;
use crate::path::DEFAULT_SCHEME;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tokio::runtime::{Builder, Runtime};

/// Retries performed by the SDK transport when none is given
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings for [`S3Store`]
#[derive(Debug, Clone)]
pub struct S3Config {
    /// AWS region of the bucket
    pub region: String,
    /// Transport-level retries per request (attempts = retries + 1)
    pub max_retries: u32,
    /// Custom endpoint for S3-compatible services; enables path-style URLs
    pub endpoint_url: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            endpoint_url: None,
        }
    }
}

/// S3 object store driven by a private tokio runtime
pub struct S3Store {
    client: Client,
    runtime: Runtime,
}

impl S3Store {
    /// Load credentials and build a client for `config`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the runtime cannot be started.
    pub fn connect(config: &S3Config) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::with_source("failed to start storage runtime", e))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_retries.saturating_add(1)));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = runtime.block_on(loader.load());

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.endpoint_url.is_some() {
            s3_config = s3_config.force_path_style(true);
        }

        tracing::debug!(
            region = %config.region,
            max_retries = config.max_retries,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "S3 client configured"
        );

        Ok(Self {
            client: Client::from_conf(s3_config.build()),
            runtime,
        })
    }
}

impl ObjectStore for S3Store {
    fn list_objects_page(
        &self,
        container: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let request = self
            .client
            .list_objects_v2()
            .bucket(container)
            .prefix(prefix)
            .set_continuation_token(continuation.map(String::from));

        let output = self.runtime.block_on(request.send()).map_err(|e| {
            StoreError::new(format!(
                "ListObjectsV2 failed for {DEFAULT_SCHEME}://{container}/{prefix}: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        Ok(ListPage {
            keys: output
                .contents()
                .iter()
                .filter_map(|object| object.key().map(String::from))
                .collect(),
            next_token: output.next_continuation_token().map(String::from),
        })
    }

    fn get_object(&self, container: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let request = self.client.get_object().bucket(container).key(key);

        self.runtime.block_on(async {
            let output = request.send().await.map_err(|e| {
                StoreError::new(format!(
                    "GetObject failed for {DEFAULT_SCHEME}://{container}/{key}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
            let body = output.body.collect().await.map_err(|e| {
                StoreError::with_source(
                    format!("failed to read body of {DEFAULT_SCHEME}://{container}/{key}"),
                    e,
                )
            })?;
            Ok::<_, StoreError>(body.into_bytes().to_vec())
        })
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
