//! Amazon S3 backend (and S3-compatible stores via a custom endpoint).

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{Client, error::DisplayErrorContext, primitives::ByteStream};
use tracing::instrument;
use url::Url;

use super::{ObjectStore, PutObjectRequest, Result, StorageError, StoredObject};
use crate::config::AwsConfig;

const DEFAULT_REGION: &str = "us-east-1";

/// How object URLs are addressed.
#[derive(Debug, Clone)]
enum UrlStyle {
    /// `https://<bucket>.s3.<region>.amazonaws.com/<key>`, or `https://<bucket>.s3.amazonaws.com/<key>`
    /// in `us-east-1`
    VirtualHosted { region: String },
    /// `<endpoint>/<bucket>/<key>`
    PathStyle { endpoint: Url },
}

pub struct S3ObjectStore {
    client: Client,
    url_style: UrlStyle,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig, aws: &AwsConfig) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

        let url_style = match &aws.endpoint_url {
            Some(endpoint) => {
                builder = builder
                    .endpoint_url(endpoint.as_str().trim_end_matches('/'))
                    .force_path_style(true);
                UrlStyle::PathStyle {
                    endpoint: endpoint.clone(),
                }
            }
            None => UrlStyle::VirtualHosted {
                region: sdk_config
                    .region()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            },
        };

        Self {
            client: Client::from_conf(builder.build()),
            url_style,
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> Result<String> {
        let url_error = |reason: String| StorageError::Url {
            key: key.to_string(),
            reason,
        };

        let mut url = match &self.url_style {
            UrlStyle::VirtualHosted { region } if region == DEFAULT_REGION => {
                Url::parse(&format!("https://{bucket}.s3.amazonaws.com/")).map_err(|e| url_error(e.to_string()))?
            }
            UrlStyle::VirtualHosted { region } => {
                Url::parse(&format!("https://{bucket}.s3.{region}.amazonaws.com/")).map_err(|e| url_error(e.to_string()))?
            }
            UrlStyle::PathStyle { endpoint } => {
                let mut url = endpoint.clone();
                url.path_segments_mut()
                    .map_err(|_| url_error(format!("endpoint {endpoint} cannot carry a path")))?
                    .pop_if_empty()
                    .push(bucket);
                url
            }
        };

        url.path_segments_mut()
            .map_err(|_| url_error("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(key.split('/'));

        Ok(url.into())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, request), fields(bucket = %request.bucket, key = %request.key, size = request.content.len()), err)]
    async fn put(&self, request: PutObjectRequest) -> Result<StoredObject> {
        let PutObjectRequest {
            bucket,
            key,
            content,
            content_type,
        } = request;

        self.client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .body(ByteStream::from(content))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %DisplayErrorContext(&e), "S3 PutObject failed");
                StorageError::Upload {
                    key: key.clone(),
                    source: Box::new(e),
                }
            })?;

        let url = self.object_url(&bucket, &key)?;
        tracing::debug!(url = %url, "Stored object");

        Ok(StoredObject { bucket, key, url })
    }
}
