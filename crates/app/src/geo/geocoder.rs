//! Reverse-geocoding client (Nominatim).
//!
//! Resolves a coordinate to a neighborhood name. Every lookup waits a
//! fixed courtesy delay first (a delay, not a queue) and fails soft: any
//! network or parse problem yields [`UNKNOWN_NEIGHBORHOOD`] instead of an
//! error. Successful resolutions are cached by rounded coordinate.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, instrument};

use meubairro_core::Coordinate;

use crate::config::GeocoderConfig;

use super::UNKNOWN_NEIGHBORHOOD;

/// Identify ourselves to the geocoding service, per its usage policy.
const USER_AGENT: &str = "meubairro/0.1 (contato@meubairro.app)";

/// Cached resolutions live for an hour; bairros do not move.
const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Reverse-geocoding client.
#[derive(Clone)]
pub struct Geocoder {
    inner: Arc<GeocoderInner>,
}

struct GeocoderInner {
    http: reqwest::Client,
    base_url: String,
    courtesy_delay: Duration,
    cache: Cache<String, String>,
}

impl Geocoder {
    /// Create a new geocoder client.
    #[must_use]
    pub fn new(config: &GeocoderConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(GeocoderInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                courtesy_delay: config.courtesy_delay,
                cache,
            }),
        }
    }

    /// Resolve a coordinate to a neighborhood name.
    ///
    /// Never fails: invalid coordinates, network errors, and unparseable
    /// responses all resolve to [`UNKNOWN_NEIGHBORHOOD`].
    #[instrument(skip(self))]
    pub async fn resolve_neighborhood(&self, coord: Coordinate) -> String {
        if !coord.is_valid() {
            return UNKNOWN_NEIGHBORHOOD.to_string();
        }

        // ~11 m precision is plenty for neighborhood-level lookups
        let cache_key = format!("{:.4},{:.4}", coord.latitude, coord.longitude);
        if let Some(bairro) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for reverse geocode");
            return bairro;
        }

        // Courtesy delay between calls, per the geocoding service's policy
        tokio::time::sleep(self.inner.courtesy_delay).await;

        match self.reverse(coord).await {
            Ok(Some(bairro)) => {
                self.inner.cache.insert(cache_key, bairro.clone()).await;
                bairro
            }
            Ok(None) => UNKNOWN_NEIGHBORHOOD.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Reverse geocoding failed");
                UNKNOWN_NEIGHBORHOOD.to_string()
            }
        }
    }

    async fn reverse(&self, coord: Coordinate) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .inner
            .http
            .get(format!("{}/reverse", self.inner.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("lat", coord.latitude.to_string()),
                ("lon", coord.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ReverseResponse = response.json().await?;
        Ok(body.address.as_ref().and_then(neighborhood_from_address))
    }
}

/// Relevant slice of the reverse-geocoding response.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

/// Address components that can name a neighborhood.
#[derive(Debug, Default, Deserialize)]
struct Address {
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    city_district: Option<String>,
}

/// Fallback chain: suburb, then neighbourhood, then city district.
fn neighborhood_from_address(address: &Address) -> Option<String> {
    address
        .suburb
        .clone()
        .or_else(|| address.neighbourhood.clone())
        .or_else(|| address.city_district.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_chain_prefers_suburb() {
        let address = Address {
            suburb: Some("Universitário".to_string()),
            neighbourhood: Some("Outro".to_string()),
            city_district: Some("Distrito".to_string()),
        };
        assert_eq!(
            neighborhood_from_address(&address).as_deref(),
            Some("Universitário")
        );
    }

    #[test]
    fn test_fallback_chain_walks_down() {
        let address = Address {
            suburb: None,
            neighbourhood: None,
            city_district: Some("Distrito Norte".to_string()),
        };
        assert_eq!(
            neighborhood_from_address(&address).as_deref(),
            Some("Distrito Norte")
        );
    }

    #[test]
    fn test_fallback_chain_empty_address() {
        assert!(neighborhood_from_address(&Address::default()).is_none());
    }

    #[tokio::test]
    async fn test_invalid_coordinate_short_circuits_to_sentinel() {
        let geocoder = Geocoder::new(&GeocoderConfig {
            base_url: "http://127.0.0.1:0".to_string(),
            courtesy_delay: Duration::from_millis(0),
        });
        let bairro = geocoder
            .resolve_neighborhood(Coordinate::new(f64::NAN, 0.0))
            .await;
        assert_eq!(bairro, UNKNOWN_NEIGHBORHOOD);
    }

    #[tokio::test]
    async fn test_unreachable_service_resolves_to_sentinel() {
        // Port 0 is never listening; the request errors and we fail soft.
        let geocoder = Geocoder::new(&GeocoderConfig {
            base_url: "http://127.0.0.1:0".to_string(),
            courtesy_delay: Duration::from_millis(0),
        });
        let bairro = geocoder
            .resolve_neighborhood(Coordinate::new(-29.7156, -52.4297))
            .await;
        assert_eq!(bairro, UNKNOWN_NEIGHBORHOOD);
    }
}
