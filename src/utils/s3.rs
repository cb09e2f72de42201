use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use aws_config::ConfigLoader;
use aws_types::region::Region;
use aws_config::BehaviorVersion;
use log::debug;
use url::Url;

use crate::errors::AppError;
use crate::storage::{public_url, BlobStore};

pub async fn create_s3_client(region: Option<String>) -> S3Client {
    let aws_config = ConfigLoader::default()
        .region(region.map(Region::new))
        .behavior_version(BehaviorVersion::latest())
        .load()
        .await;

    S3Client::new(&aws_config)
}

/// Default public address of objects in `bucket`.
pub fn bucket_base_url(bucket: &str) -> Result<Url, AppError> {
    Url::parse(&format!("https://{}.s3.amazonaws.com/", bucket))
        .map_err(|err| AppError::ConfigError(format!("Invalid bucket name {}: {}", bucket, err)))
}

pub struct S3BlobStore {
    client: S3Client,
    bucket_name: String,
    base_url: Url,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket_name: String, base_url: Url) -> Self {
        Self {
            client,
            bucket_name,
            base_url,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        debug!("Uploading {} ({} bytes) to bucket {}", key, body.len(), self.bucket_name);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| AppError::AWSError(err.to_string()))?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_url(&self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_url_follows_virtual_hosted_style() {
        let base = bucket_base_url("employee-photos").unwrap();
        assert_eq!(
            public_url(&base, "employee_images/E-1.png"),
            "https://employee-photos.s3.amazonaws.com/employee_images/E-1.png"
        );
    }
}
