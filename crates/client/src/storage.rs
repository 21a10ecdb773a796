//! Object storage over the platform's `/storage/v1` surface.

use async_trait::async_trait;

use chronica_core::backend::{BackendError, Result, StorageApi};

use crate::BackendClient;

impl BackendClient {
    async fn storage_send(&self, req: reqwest::RequestBuilder) -> Result<()> {
        let response = self
            .authorized(req)
            .await
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(BackendError::Storage(format!("{status}: {message}")))
        }
    }
}

#[async_trait]
impl StorageApi for BackendClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let req = self
            .http
            .post(self.storage_url(bucket, path))
            .header("Content-Type", content_type.to_string())
            .body(bytes);
        self.storage_send(req).await
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        self.storage_send(self.http.delete(self.storage_url(bucket, path)))
            .await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }
}
