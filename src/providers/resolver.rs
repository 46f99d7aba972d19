//! Location resolution with fallback.
//!
//! Precise coordinates are reverse geocoded; if that fails the resolver falls
//! back to IP geolocation. A manually entered city is geocoded as given and
//! never falls back, since silently replacing the user's choice would count
//! down to the wrong place.

use chrono::NaiveDate;

use super::error::ProviderError;
use super::{Geocoder, IpLocator, PrayerTimeProvider};
use crate::types::{format_location_name, Coordinates, Location, LocationSource, PrayerTimes};

/// How the user asked for their location.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Detect from the IP address
    Automatic,
    /// Coordinates supplied by the user
    Precise(Coordinates),
    /// City and country entered by the user
    Manual { city: String, country: String },
}

/// Resolves a [`LocationQuery`] into a [`Location`].
#[derive(Debug, Clone)]
pub struct LocationResolver<I, G> {
    ip: I,
    geocoder: G,
}

impl<I: IpLocator, G: Geocoder> LocationResolver<I, G> {
    pub fn new(ip: I, geocoder: G) -> Self {
        Self { ip, geocoder }
    }

    pub async fn resolve(&self, query: &LocationQuery) -> Result<Location, ProviderError> {
        let location = match query {
            LocationQuery::Manual { city, country } => self.resolve_manual(city, country).await?,
            LocationQuery::Precise(coordinates) => match self.resolve_precise(*coordinates).await {
                Ok(location) => location,
                Err(e) => {
                    tracing::warn!("Reverse geocoding failed, using IP location: {}", e);
                    self.resolve_approximate().await?
                }
            },
            LocationQuery::Automatic => self.resolve_approximate().await?,
        };

        tracing::info!(
            "Location resolved: {} ({}, {})",
            location.display_name(),
            location.coordinates(),
            location.source.as_str()
        );
        Ok(location)
    }

    async fn resolve_precise(&self, coordinates: Coordinates) -> Result<Location, ProviderError> {
        let place = self.geocoder.reverse(coordinates).await?;
        Ok(Location {
            city: place.city,
            country: place.country,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            source: LocationSource::Precise,
        })
    }

    async fn resolve_approximate(&self) -> Result<Location, ProviderError> {
        self.ip
            .locate_ip()
            .await
            .map_err(|e| ProviderError::AllSourcesFailed(e.to_string()))
    }

    async fn resolve_manual(&self, city: &str, country: &str) -> Result<Location, ProviderError> {
        let (city, country) = (city.trim(), country.trim());
        if city.is_empty() || country.is_empty() {
            return Err(ProviderError::InvalidData(
                "both city and country are required".to_string(),
            ));
        }

        let coordinates = self.geocoder.search(city, country).await?;
        Ok(Location {
            city: format_location_name(city),
            country: country.to_string(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            source: LocationSource::Manual,
        })
    }
}

/// Resolves the location and fetches its prayer times for `date`.
pub async fn lookup<I, G, P>(
    resolver: &LocationResolver<I, G>,
    provider: &P,
    query: &LocationQuery,
    date: NaiveDate,
) -> Result<(Location, PrayerTimes), ProviderError>
where
    I: IpLocator,
    G: Geocoder,
    P: PrayerTimeProvider,
{
    let location = resolver.resolve(query).await?;
    let times = provider.prayer_times(location.coordinates(), date).await?;
    tracing::debug!("Prayer times for {}: {:?}", date, times);
    Ok((location, times))
}
