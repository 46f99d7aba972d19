//! External services that feed the countdown.
//!
//! This module provides:
//! - IP geolocation (ipinfo.io)
//! - Forward and reverse geocoding (OpenStreetMap Nominatim)
//! - Daily prayer times (Aladhan)
//! - A resolver chaining precise, approximate, and manual location sources
//! - Cancellable requests so late results are dropped after teardown
//!
//! The countdown engine never calls these directly; results are injected with
//! `CountdownEngine::set_prayer_times`.

pub mod aladhan;
pub mod config;
pub mod error;
mod http;
pub mod ipinfo;
pub mod mock;
pub mod nominatim;
pub mod request;
pub mod resolver;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Coordinates, Location, PrayerTimes};

pub use aladhan::AladhanClient;
pub use config::ProviderConfig;
pub use error::{Cancelled, ProviderError};
pub use http::HttpClient;
pub use ipinfo::IpInfoClient;
pub use mock::{MockGeocoder, MockIpLocator, MockPrayerTimeProvider};
pub use nominatim::NominatimClient;
pub use request::{CancelHandle, CancellableRequest};
pub use resolver::{lookup, LocationQuery, LocationResolver};

/// A named place without coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    pub country: String,
}

/// Approximate location from the caller's IP address.
#[allow(async_fn_in_trait)]
pub trait IpLocator {
    async fn locate_ip(&self) -> Result<Location, ProviderError>;
}

/// Converts between coordinates and place names.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// Coordinates to city and country.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Place, ProviderError>;

    /// City and country to coordinates.
    async fn search(&self, city: &str, country: &str) -> Result<Coordinates, ProviderError>;
}

/// Daily prayer times for a position.
#[allow(async_fn_in_trait)]
pub trait PrayerTimeProvider {
    async fn prayer_times(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<PrayerTimes, ProviderError>;
}

impl<T: IpLocator + ?Sized> IpLocator for &T {
    async fn locate_ip(&self) -> Result<Location, ProviderError> {
        (**self).locate_ip().await
    }
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Place, ProviderError> {
        (**self).reverse(coordinates).await
    }

    async fn search(&self, city: &str, country: &str) -> Result<Coordinates, ProviderError> {
        (**self).search(city, country).await
    }
}

impl<T: PrayerTimeProvider + ?Sized> PrayerTimeProvider for &T {
    async fn prayer_times(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<PrayerTimes, ProviderError> {
        (**self).prayer_times(coordinates, date).await
    }
}

/// The HTTP-backed resolver used by the CLI.
pub type HttpLocationResolver = LocationResolver<IpInfoClient, NominatimClient>;

/// Builds the HTTP-backed resolver and prayer-time client.
pub fn http_providers(
    config: &ProviderConfig,
) -> Result<(HttpLocationResolver, AladhanClient), ProviderError> {
    let http = HttpClient::new(config)?;
    let resolver = LocationResolver::new(
        IpInfoClient::new(http.clone(), config.ipinfo_url.clone()),
        NominatimClient::new(http.clone(), config.nominatim_url.clone()),
    );
    let prayer_times = AladhanClient::new(http, config.aladhan_url.clone(), config.method);
    Ok((resolver, prayer_times))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_providers_from_default_config() {
        let (_resolver, client) = http_providers(&ProviderConfig::default()).unwrap();
        assert_eq!(client.method(), 5);
    }
}
