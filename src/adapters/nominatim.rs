use crate::config::toml_config::GeocoderConfig;
use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::{FloodRiskError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Forward geocoding against a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    country_codes: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            country_codes: config.country_codes.clone(),
        })
    }

    fn parse_coordinate(field: &str, value: &str) -> Result<f64> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| FloodRiskError::GeocoderResponse {
                message: format!("{} '{}' is not a number: {}", field, value, e),
            })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        tracing::debug!("Geocoding address: {}", address);

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", "1")]);
        if let Some(codes) = &self.country_codes {
            request = request.query(&[("countrycodes", codes.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Geocoder response status: {}", status);

        if !status.is_success() {
            return Err(FloodRiskError::GeocoderResponse {
                message: format!("HTTP {} from {}", status, self.endpoint),
            });
        }

        let results: Vec<SearchResult> = response.json().await?;
        let Some(best) = results.into_iter().next() else {
            tracing::info!("🔍 No geocoding result for '{}'", address);
            return Ok(None);
        };

        let coordinates = Coordinates::new(
            Self::parse_coordinate("lon", &best.lon)?,
            Self::parse_coordinate("lat", &best.lat)?,
        );
        tracing::info!(
            "📍 Resolved '{}' to ({:.5}, {:.5}) {}",
            address,
            coordinates.longitude,
            coordinates.latitude,
            best.display_name.unwrap_or_default()
        );
        Ok(Some(coordinates))
    }
}
