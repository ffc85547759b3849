//! Object-storage destination: upload the bundle to an S3 bucket.
//!
//! Uploads are sequential and abort on the first failure — object storage
//! offers no multi-object transaction, so a failed upload means the caller
//! must treat the bundle as not produced even though earlier objects may
//! already exist under the prefix. No cleanup of partial uploads is
//! attempted.

use crate::error::FlipbookError;
use crate::output::ConversionResult;
use crate::package::bundle;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use serde::Serialize;
use tracing::{debug, info};

/// Public URLs of the uploaded bundle.
#[derive(Debug, Clone, Serialize)]
pub struct UrlMap {
    pub index_url: String,
    pub css_url: String,
    pub js_url: String,
    pub pages: Vec<String>,
    pub thumbs: Vec<String>,
    pub base_url: String,
}

/// S3 packaging destination bound to one bucket.
#[derive(Debug, Clone)]
pub struct S3Packager {
    client: Client,
    bucket: String,
    region: String,
}

impl S3Packager {
    /// Build a packager from the ambient AWS credential chain.
    pub async fn from_env(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        let region = region.into();
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;
        Self {
            client: Client::new(&config),
            bucket: bucket.into(),
            region,
        }
    }

    /// Wrap an existing client (tests, custom endpoints).
    pub fn with_client(client: Client, bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            region: region.into(),
        }
    }

    /// Upload the whole bundle under `prefix` and return its public URLs.
    ///
    /// The key layout under the prefix is identical to the directory and
    /// ZIP destinations.
    pub async fn upload(
        &self,
        result: &ConversionResult,
        prefix: &str,
    ) -> Result<UrlMap, FlipbookError> {
        let prefix = prefix.trim_matches('/');
        let base_url = format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, prefix
        );

        for entry in bundle(result) {
            let key = format!("{prefix}/{}", entry.path);
            debug!("Uploading s3://{}/{}", self.bucket, key);
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(&key)
                .body(ByteStream::from(entry.bytes))
                .content_type(entry.content_type)
                .send()
                .await
                .map_err(|e| FlipbookError::Packaging {
                    destination: format!("s3://{}/{}", self.bucket, key),
                    detail: e.to_string(),
                })?;
        }

        info!(
            "Uploaded {} pages to s3://{}/{}",
            result.page_count, self.bucket, prefix
        );

        Ok(UrlMap {
            index_url: format!("{base_url}/index.html"),
            css_url: format!("{base_url}/css/style.css"),
            js_url: format!("{base_url}/js/flipbook.js"),
            pages: (1..=result.page_count)
                .map(|ordinal| format!("{base_url}/files/pages/{ordinal}.jpg"))
                .collect(),
            thumbs: (1..=result.page_count)
                .map(|ordinal| format!("{base_url}/files/thumb/{ordinal}.jpg"))
                .collect(),
            base_url,
        })
    }
}
