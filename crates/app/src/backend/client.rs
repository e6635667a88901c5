//! HTTP client for the hosted row-store REST API.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::BackendConfig;

use super::{BackendError, QuerySpec};

/// Client for the hosted backend row-store.
///
/// Cheap to clone; all methods take `&self`.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();

        let key = config.service_key.expose_secret();
        let header_value = |v: &str| {
            HeaderValue::from_str(v).map_err(|e| BackendError::Api {
                status: 0,
                message: format!("Invalid service key format: {e}"),
            })
        };

        headers.insert("apikey", header_value(key)?);
        headers.insert("Authorization", header_value(&format!("Bearer {key}"))?);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.inner.base_url)
    }

    /// Fetch all rows matching the spec.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API responds with a
    /// non-success status, or the rows do not parse.
    #[instrument(skip(self), fields(collection = %spec.collection()))]
    pub async fn fetch<T: DeserializeOwned>(&self, spec: &QuerySpec) -> Result<Vec<T>, BackendError> {
        let response = self
            .inner
            .http
            .get(self.url(spec.collection()))
            .query(&spec.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        // Parse from text so a mismatched row shape logs the offending body
        match serde_json::from_str(&body) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend rows"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    /// Fetch the first row matching the spec.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no row matches, or any fetch
    /// error.
    pub async fn fetch_one<T: DeserializeOwned>(&self, spec: &QuerySpec) -> Result<T, BackendError> {
        self.fetch_optional(spec)
            .await?
            .ok_or_else(|| BackendError::NotFound(spec.collection().to_string()))
    }

    /// Fetch the first row matching the spec, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch itself fails.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        spec: &QuerySpec,
    ) -> Result<Option<T>, BackendError> {
        let rows: Vec<T> = self.fetch(spec).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert a row into the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the row.
    #[instrument(skip(self, row), fields(collection = %collection))]
    pub async fn insert<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        row: &T,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .http
            .post(self.url(collection))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(())
    }

    /// Update rows matching the spec's filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the patch.
    #[instrument(skip(self, patch), fields(collection = %spec.collection()))]
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        spec: &QuerySpec,
        patch: &T,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .http
            .patch(self.url(spec.collection()))
            .query(&spec.to_query_pairs())
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(())
    }

    /// Delete rows matching the spec's filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the delete.
    #[instrument(skip(self), fields(collection = %spec.collection()))]
    pub async fn delete(&self, spec: &QuerySpec) -> Result<(), BackendError> {
        let response = self
            .inner
            .http
            .delete(self.url(spec.collection()))
            .query(&spec.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(())
    }

    /// Exact count of rows matching the spec's filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the count header is missing.
    #[instrument(skip(self), fields(collection = %spec.collection()))]
    pub async fn count(&self, spec: &QuerySpec) -> Result<u64, BackendError> {
        let response = self
            .inner
            .http
            .head(self.url(spec.collection()))
            .query(&spec.to_query_pairs())
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), ""));
        }

        response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| BackendError::Api {
                status: status.as_u16(),
                message: "Missing or malformed Content-Range header".to_string(),
            })
    }
}

fn api_error(status: u16, body: &str) -> BackendError {
    tracing::error!(
        status,
        body = %body.chars().take(500).collect::<String>(),
        "Backend returned non-success status"
    );
    BackendError::Api {
        status,
        message: body.chars().take(200).collect(),
    }
}

/// Parse the total out of a `Content-Range` value like `0-24/3573` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("garbage"), None);
        assert_eq!(parse_content_range("0-24/*"), None);
    }
}
