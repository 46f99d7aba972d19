//! OpenStreetMap Nominatim geocoding.
//!
//! `/reverse` turns coordinates into a city and country; `/search` turns a
//! city and country into coordinates.

use serde::Deserialize;

use super::error::ProviderError;
use super::http::HttpClient;
use super::{Geocoder, Place};
use crate::types::Coordinates;

const SERVICE: &str = "nominatim";

/// Address fields returned by `/reverse`, most specific first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub suburb: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
}

impl NominatimAddress {
    /// Returns the most specific settlement name available.
    pub fn settlement(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.hamlet,
            &self.suburb,
            &self.county,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Extracts city and country from a `/reverse` response.
pub fn parse_reverse(response: ReverseResponse) -> Result<Place, ProviderError> {
    if let Some(error) = response.error {
        return Err(ProviderError::NotFound(error));
    }
    let address = response
        .address
        .ok_or_else(|| ProviderError::decode(SERVICE, "response has no address"))?;

    Ok(Place {
        city: address
            .settlement()
            .unwrap_or("Unknown City")
            .to_string(),
        country: address
            .country
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Unknown Country".to_string()),
    })
}

/// Takes the first `/search` hit.
pub fn parse_search(results: Vec<SearchResult>, query: &str) -> Result<Coordinates, ProviderError> {
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NotFound(query.to_string()))?;

    let latitude = first
        .lat
        .parse::<f64>()
        .map_err(|e| ProviderError::decode(SERVICE, format!("bad lat {:?}: {}", first.lat, e)))?;
    let longitude = first
        .lon
        .parse::<f64>()
        .map_err(|e| ProviderError::decode(SERVICE, format!("bad lon {:?}: {}", first.lon, e)))?;

    Coordinates::new(latitude, longitude).map_err(ProviderError::InvalidData)
}

/// Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: HttpClient,
    base_url: String,
}

impl NominatimClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Geocoder for NominatimClient {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Place, ProviderError> {
        let url = format!("{}/reverse", self.base_url);
        let query = [
            ("format", "json".to_string()),
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
            ("zoom", "10".to_string()),
            ("addressdetails", "1".to_string()),
        ];
        let response: ReverseResponse = self.http.get_json(SERVICE, &url, &query).await?;
        parse_reverse(response)
    }

    async fn search(&self, city: &str, country: &str) -> Result<Coordinates, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let query = [
            ("city", city.to_string()),
            ("country", country.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        let results: Vec<SearchResult> = self.http.get_json(SERVICE, &url, &query).await?;
        parse_search(results, &format!("{}, {}", city, country))
    }
}
