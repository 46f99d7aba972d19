//! Approximate location from the caller's IP address.

use serde::Deserialize;

use super::error::ProviderError;
use super::http::HttpClient;
use super::IpLocator;
use crate::types::{format_location_name, Coordinates, Location, LocationSource};

const SERVICE: &str = "ipinfo";

/// Subset of the ipinfo.io JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct IpInfoResponse {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// "latitude,longitude"
    #[serde(default)]
    pub loc: Option<String>,
}

/// Converts an ipinfo response into a location.
pub fn parse_ip_location(response: IpInfoResponse) -> Result<Location, ProviderError> {
    let loc = response
        .loc
        .ok_or_else(|| ProviderError::decode(SERVICE, "response has no coordinates"))?;
    let coordinates = parse_loc(&loc)?;

    Ok(Location {
        city: format_location_name(response.city.as_deref().unwrap_or_default()),
        country: response
            .country
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        latitude: coordinates.latitude,
        longitude: coordinates.longitude,
        source: LocationSource::Approximate,
    })
}

fn parse_loc(loc: &str) -> Result<Coordinates, ProviderError> {
    let (lat, lon) = loc
        .split_once(',')
        .ok_or_else(|| ProviderError::decode(SERVICE, format!("malformed loc {:?}", loc)))?;

    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| ProviderError::decode(SERVICE, format!("bad latitude {:?}: {}", lat, e)))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| ProviderError::decode(SERVICE, format!("bad longitude {:?}: {}", lon, e)))?;

    Coordinates::new(latitude, longitude).map_err(ProviderError::InvalidData)
}

/// IP geolocation client.
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    http: HttpClient,
    url: String,
}

impl IpInfoClient {
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl IpLocator for IpInfoClient {
    async fn locate_ip(&self) -> Result<Location, ProviderError> {
        let response: IpInfoResponse = self.http.get_json(SERVICE, &self.url, &[]).await?;
        parse_ip_location(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> IpInfoResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_ip_location() {
        let location = parse_ip_location(response(
            r#"{"ip":"41.0.0.1","city":"giza","region":"Giza","country":"EG","loc":"30.0081,31.2109","timezone":"Africa/Cairo"}"#,
        ))
        .unwrap();

        assert_eq!(location.city, "Giza");
        assert_eq!(location.country, "EG");
        assert!((location.latitude - 30.0081).abs() < 1e-9);
        assert!((location.longitude - 31.2109).abs() < 1e-9);
        assert_eq!(location.source, LocationSource::Approximate);
    }

    #[test]
    fn test_missing_city_is_unknown() {
        let location = parse_ip_location(response(r#"{"country":"EG","loc":"30,31"}"#)).unwrap();
        assert_eq!(location.city, "Unknown");
    }

    #[test]
    fn test_missing_loc_is_error() {
        let err = parse_ip_location(response(r#"{"city":"Cairo","country":"EG"}"#)).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn test_malformed_loc_is_error() {
        for loc in ["30.0", "a,b", "30.0;31.0"] {
            let json = format!(r#"{{"loc":"{}"}}"#, loc);
            assert!(parse_ip_location(response(&json)).is_err(), "loc {:?}", loc);
        }
    }

    #[test]
    fn test_out_of_range_loc_is_error() {
        let err = parse_ip_location(response(r#"{"loc":"95.0,31.0"}"#)).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidData(_)));
    }
}
