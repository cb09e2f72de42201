use std::env;

use url::Url;

use crate::errors::AppError;
use crate::utils::s3::bucket_base_url;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;
const MEMORY_IMAGE_BASE_URL: &str = "memory://employee-directory/";

#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    /// PostgreSQL for documents, S3 for photos.
    Postgres {
        database_url: String,
        bucket: String,
        region: Option<String>,
        image_base_url: Url,
    },
    Memory {
        image_base_url: Url,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_address: String,
    pub storage: StorageConfig,
    pub json_body_limit: usize,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::ConfigError(format!("{} must be set", key)))
        };
        let image_base_url = |default: Url| match var("IMAGE_BASE_URL") {
            Some(raw) => Url::parse(&raw)
                .map_err(|err| AppError::ConfigError(format!("Invalid IMAGE_BASE_URL: {}", err))),
            None => Ok(default),
        };

        let storage = match var("STORAGE_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => {
                let bucket = required("AWS_S3_BUCKET")?;
                StorageConfig::Postgres {
                    database_url: required("DATABASE_URL")?,
                    region: var("AWS_REGION"),
                    image_base_url: image_base_url(bucket_base_url(&bucket)?)?,
                    bucket,
                }
            }
            "memory" => StorageConfig::Memory {
                image_base_url: image_base_url(
                    Url::parse(MEMORY_IMAGE_BASE_URL)
                        .map_err(|err| AppError::ConfigError(err.to_string()))?,
                )?,
            },
            other => {
                return Err(AppError::ConfigError(format!(
                    "Unknown STORAGE_BACKEND {}, expected postgres or memory",
                    other
                )))
            }
        };

        let json_body_limit = match var("JSON_BODY_LIMIT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::ConfigError(format!("Invalid JSON_BODY_LIMIT: {}", raw)))?,
            None => DEFAULT_JSON_BODY_LIMIT,
        };

        Ok(Config {
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            storage,
            json_body_limit,
            cors_allowed_origin: var("CORS_ALLOWED_ORIGIN"),
        })
    }
}
