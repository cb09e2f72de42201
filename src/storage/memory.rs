//! In-process backends, used by `STORAGE_BACKEND=memory` and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use super::{public_url, BlobStore, DocumentStore};
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeChanges};

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Employee>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        Ok(self.documents.read().await.get(employee_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, AppError> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn put(&self, employee: &Employee) -> Result<(), AppError> {
        self.documents
            .write()
            .await
            .insert(employee.employee_id.clone(), employee.clone());
        Ok(())
    }

    async fn merge(&self, employee_id: &str, changes: &EmployeeChanges) -> Result<bool, AppError> {
        let mut documents = self.documents.write().await;
        let Some(existing) = documents.get(employee_id) else {
            return Ok(false);
        };

        let mut merged = serde_json::to_value(existing)
            .map_err(|err| AppError::DatabaseError(err.to_string()))?;
        let patch = serde_json::to_value(changes)
            .map_err(|err| AppError::DatabaseError(err.to_string()))?;
        if let (Value::Object(target), Value::Object(fields)) = (&mut merged, patch) {
            target.extend(fields);
        }

        let updated: Employee = serde_json::from_value(merged)
            .map_err(|err| AppError::DatabaseError(err.to_string()))?;
        documents.insert(employee_id.to_string(), updated);
        Ok(true)
    }

    async fn delete(&self, employee_id: &str) -> Result<(), AppError> {
        self.documents.write().await.remove(employee_id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: String,
}

pub struct MemoryBlobStore {
    base_url: Url,
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.blobs.write().await.insert(
            key.to_string(),
            StoredBlob {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_url(&self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::{Gender, Position};

    fn employee(id: &str) -> Employee {
        Employee {
            employee_id: id.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            position: Position::Developer,
            gender: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn merge_only_touches_present_fields() {
        let store = MemoryDocumentStore::new();
        store.put(&employee("E-1")).await.unwrap();

        let changes = EmployeeChanges {
            phone: Some("555-0199".to_string()),
            gender: Some(Some(Gender::Female)),
            ..Default::default()
        };
        assert!(store.merge("E-1", &changes).await.unwrap());

        let stored = store.get("E-1").await.unwrap().unwrap();
        assert_eq!(stored.phone, "555-0199");
        assert_eq!(stored.gender, Some(Gender::Female));
        assert_eq!(stored.name, "Ada");

        let clear = EmployeeChanges {
            gender: Some(None),
            ..Default::default()
        };
        assert!(store.merge("E-1", &clear).await.unwrap());
        assert_eq!(store.get("E-1").await.unwrap().unwrap().gender, None);
    }

    #[tokio::test]
    async fn merge_on_missing_document_creates_nothing() {
        let store = MemoryDocumentStore::new();
        let changes = EmployeeChanges {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(!store.merge("nobody", &changes).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_overwrites_and_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        store.put(&employee("E-1")).await.unwrap();
        let mut renamed = employee("E-1");
        renamed.name = "Grace".to_string();
        store.put(&renamed).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![renamed]);

        store.delete("E-1").await.unwrap();
        store.delete("E-1").await.unwrap();
        assert!(store.get("E-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blob_store_keeps_body_and_builds_url() {
        let store = MemoryBlobStore::new(Url::parse("memory://employee-directory/").unwrap());
        store
            .put("employee_images/E-1.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        let blob = store.get("employee_images/E-1.png").await.unwrap();
        assert_eq!(blob.body, vec![1, 2, 3]);
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(
            store.public_url("employee_images/E-1.png"),
            "memory://employee-directory/employee_images/E-1.png"
        );
    }
}
