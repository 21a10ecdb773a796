//! Table API over the platform's `/rest/v1` surface.

use async_trait::async_trait;

use chronica_core::backend::{BackendError, Result, TableApi};
use chronica_core::content::{Record, RecordId};

use crate::BackendClient;

/// Media type asserting that a row filter matches exactly one row.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Query string for an equality filter.
fn eq_params(column: &str, value: &str) -> String {
    format!("select=*&{}=eq.{}", column, urlencoding::encode(value))
}

/// Query string for a case-insensitive substring search.
fn search_params(column: &str, query: &str, limit: usize) -> String {
    let pattern = format!("*{query}*");
    format!(
        "select=*&{}=ilike.{}&limit={}",
        column,
        urlencoding::encode(&pattern),
        limit
    )
}

impl BackendClient {
    /// Send a request expected to produce a JSON array of rows.
    async fn expect_rows<E: Record>(&self, req: reqwest::RequestBuilder) -> Result<Vec<E>> {
        let response = self
            .authorized(req)
            .await
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(BackendError::Query {
                table: E::TABLE,
                message: format!("{status}: {message}"),
            });
        }

        response.json::<Vec<E>>().await.map_err(|e| BackendError::Query {
            table: E::TABLE,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl<E: Record> TableApi<E> for BackendClient {
    async fn select_all(&self) -> Result<Vec<E>> {
        let url = format!(
            "{}?select=*&order=created_at.desc",
            self.rest_url(E::TABLE)
        );
        self.expect_rows(self.http.get(url)).await
    }

    async fn select_by_id(&self, id: RecordId) -> Result<E> {
        let url = format!("{}?{}", self.rest_url(E::TABLE), eq_params("id", &id.to_string()));
        let response = self
            .authorized(self.http.get(url).header("Accept", SINGLE_OBJECT))
            .await
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        // The single-object assertion fails with 406 when the filter matched
        // zero rows or more than one.
        if status == reqwest::StatusCode::NOT_ACCEPTABLE
            || status == reqwest::StatusCode::NOT_FOUND
        {
            return Err(BackendError::NotFound {
                table: E::TABLE,
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(BackendError::Query {
                table: E::TABLE,
                message: format!("{status}: {message}"),
            });
        }

        response.json::<E>().await.map_err(|e| BackendError::Query {
            table: E::TABLE,
            message: e.to_string(),
        })
    }

    async fn select_eq(&self, column: &str, value: &str) -> Result<Vec<E>> {
        let url = format!("{}?{}", self.rest_url(E::TABLE), eq_params(column, value));
        self.expect_rows(self.http.get(url)).await
    }

    async fn search(&self, column: &str, query: &str, limit: usize) -> Result<Vec<E>> {
        let url = format!(
            "{}?{}",
            self.rest_url(E::TABLE),
            search_params(column, query, limit)
        );
        self.expect_rows(self.http.get(url)).await
    }

    async fn insert(&self, draft: &E::Draft) -> Result<E> {
        let req = self
            .http
            .post(self.rest_url(E::TABLE))
            .header("Prefer", "return=representation")
            .json(draft);
        let rows: Vec<E> = self.expect_rows(req).await?;
        rows.into_iter().next().ok_or(BackendError::Query {
            table: E::TABLE,
            message: "insert returned no rows".to_string(),
        })
    }

    async fn update(&self, id: RecordId, patch: &E::Patch) -> Result<E> {
        let url = format!("{}?{}", self.rest_url(E::TABLE), eq_params("id", &id.to_string()));
        let req = self
            .http
            .patch(url)
            .header("Prefer", "return=representation")
            .json(patch);
        let rows: Vec<E> = self.expect_rows(req).await?;
        rows.into_iter().next().ok_or(BackendError::NotFound {
            table: E::TABLE,
            id: id.to_string(),
        })
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let url = format!("{}?{}", self.rest_url(E::TABLE), eq_params("id", &id.to_string()));
        let response = self
            .authorized(self.http.delete(url))
            .await
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(BackendError::Query {
                table: E::TABLE,
                message: format!("{status}: {message}"),
            });
        }
        Ok(())
    }
}
