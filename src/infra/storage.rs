//! Object storage - remote file blobs referenced by upload rows.
//!
//! Storage operations are deliberately decoupled from database
//! transactions: blobs are written before the row insert and removed
//! after the row delete commits. A failed removal is logged and
//! swallowed so an orphaned blob never blocks a committed delete.

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::errors::{AppError, AppResult};

/// Object storage trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a blob under `bucket/path` and return its public URL
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<String>;

    /// Remove the blob a public URL points at.
    ///
    /// Best-effort from the caller's perspective; callers log and
    /// continue on failure.
    async fn remove(&self, url: &str) -> AppResult<()>;
}

/// Build the storage path for a file: one folder per owning entity
pub fn object_path(folder: Uuid, file_name: &str) -> String {
    format!("{}/{}-{}", folder, Uuid::new_v4(), sanitize(file_name))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// HTTP-backed object store speaking the Supabase Storage REST API.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpObjectStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        let response = self
            .client
            .post(self.object_url(bucket, path))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Upload request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::storage(format!(
                "Upload rejected with status {status}: {body}"
            )));
        }

        Ok(self.public_url(bucket, path))
    }

    async fn remove(&self, url: &str) -> AppResult<()> {
        // Public URLs embed the bucket/path after the /public/ segment
        let Some(suffix) = url.split("/storage/v1/object/public/").nth(1) else {
            return Err(AppError::storage(format!(
                "Unrecognized storage URL: {url}"
            )));
        };

        let response = self
            .client
            .delete(format!("{}/storage/v1/object/{}", self.base_url, suffix))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Remove request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::storage(format!(
                "Remove rejected with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// In-memory object store for tests and local development.
pub struct MemoryObjectStore {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
    fail_removals: bool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: std::sync::Mutex::new(std::collections::HashMap::new()),
            fail_removals: false,
        }
    }

    /// A store whose removals always fail, for exercising the
    /// best-effort cleanup paths
    pub fn failing_removals() -> Self {
        Self {
            objects: std::sync::Mutex::new(std::collections::HashMap::new()),
            fail_removals: true,
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(url)
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        let url = format!("memory://{bucket}/{path}");
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.clone(), bytes);
        Ok(url)
    }

    async fn remove(&self, url: &str) -> AppResult<()> {
        if self.fail_removals {
            return Err(AppError::storage("Removal disabled"));
        }
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(url);
        Ok(())
    }
}
