//! Persistence seams for employee documents and their photos.

pub mod memory;

use async_trait::async_trait;
use url::Url;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeChanges};

/// Employee documents keyed by `employee_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, employee_id: &str) -> Result<Option<Employee>, AppError>;

    /// All documents, in whatever order the backend yields them.
    async fn list(&self) -> Result<Vec<Employee>, AppError>;

    /// Writes the whole document, replacing any existing one with the same key.
    async fn put(&self, employee: &Employee) -> Result<(), AppError>;

    /// Merges the present fields of `changes` into an existing document.
    /// Returns `false` when there is no document under `employee_id`.
    async fn merge(&self, employee_id: &str, changes: &EmployeeChanges) -> Result<bool, AppError>;

    /// Removes the document. Deleting a missing key is not an error.
    async fn delete(&self, employee_id: &str) -> Result<(), AppError>;
}

/// Object storage for employee photos.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    fn public_url(&self, key: &str) -> String;
}

/// Appends each `/`-separated part of `key` to `base` as an encoded path segment.
pub fn public_url(base: &Url, key: &str) -> String {
    let mut url = base.clone();
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(key.split('/'));
        }
        Err(()) => return format!("{}/{}", base.as_str().trim_end_matches('/'), key),
    }
    url.to_string()
}
