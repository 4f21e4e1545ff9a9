use anyhow::Context;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use axum::async_trait;

/// Container holding the full-resolution card portraits.
pub const CARD_IMAGES: &str = "card-high-res-images";
/// Container holding the downscaled variants used in list views.
pub const CARD_THUMBNAILS: &str = "card-thumbnails";

/// Issues time-limited readable URLs for stored card images.
///
/// URLs are for display only; equality checks always use the underlying
/// image key, since every presign produces a different string.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn signed_url(&self, category: &str, key: &str, seconds: u64)
        -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn signed_url(
        &self,
        category: &str,
        key: &str,
        seconds: u64,
    ) -> anyhow::Result<String> {
        let object_key = format!("{}/{}", category, key);
        let req = self.client.get_object().bucket(&self.bucket).key(object_key);
        let presigned = req
            .presigned(PresigningConfig::expires_in(
                std::time::Duration::from_secs(seconds),
            )?)
            .await
            .context("s3 presign get")?;
        Ok(presigned.uri().to_string())
    }
}
