//! Hosted backend row-store client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for every persisted entity - NO
//!   local database, direct REST calls against named collections
//! - Filter assembly is an explicit [`QuerySpec`] value built by the
//!   caller and handed to a single execute call, so it stays pure and
//!   testable apart from the I/O
//! - Supported operators mirror what the callers actually use: `eq`,
//!   `ilike`, `in`, `gte`, `or`, ordering, limiting, and exact counting
//!
//! # Example
//!
//! ```rust,ignore
//! use meubairro_app::backend::{Client, QuerySpec};
//!
//! let client = Client::new(&config.backend);
//!
//! let spec = QuerySpec::from_collection("pesquisas_usuarios")
//!     .eq("bairro_usuario", "centro")
//!     .order_desc("created_at")
//!     .limit(20);
//! let rows: Vec<SearchRecord> = client.fetch(&spec).await?;
//! ```

mod client;
mod query;
pub mod types;

pub use client::Client;
pub use query::{Filter, Order, QuerySpec};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Row not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("comercios".to_string());
        assert_eq!(err.to_string(), "Not found: comercios");

        let err = BackendError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - unavailable");
    }
}
