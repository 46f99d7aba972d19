//! Mock providers for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;

use super::error::ProviderError;
use super::{Geocoder, IpLocator, Place, PrayerTimeProvider};
use crate::types::{Coordinates, Location, PrayerTimes};

/// IP locator returning a fixed result.
#[derive(Debug)]
pub struct MockIpLocator {
    result: Result<Location, ProviderError>,
    calls: AtomicUsize,
}

impl MockIpLocator {
    pub fn returning(location: Location) -> Self {
        Self {
            result: Ok(location),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IpLocator for MockIpLocator {
    async fn locate_ip(&self) -> Result<Location, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Geocoder returning fixed results for both directions.
#[derive(Debug)]
pub struct MockGeocoder {
    reverse: Result<Place, ProviderError>,
    search: Result<Coordinates, ProviderError>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    pub fn new(
        reverse: Result<Place, ProviderError>,
        search: Result<Coordinates, ProviderError>,
    ) -> Self {
        Self {
            reverse,
            search,
            calls: AtomicUsize::new(0),
        }
    }

    /// Both lookups fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::new(Err(error.clone()), Err(error))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for MockGeocoder {
    async fn reverse(&self, _coordinates: Coordinates) -> Result<Place, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reverse.clone()
    }

    async fn search(&self, _city: &str, _country: &str) -> Result<Coordinates, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.search.clone()
    }
}

/// Prayer-time provider returning a fixed result and recording requests.
#[derive(Debug)]
pub struct MockPrayerTimeProvider {
    result: Result<PrayerTimes, ProviderError>,
    requests: Mutex<Vec<(Coordinates, NaiveDate)>>,
}

impl MockPrayerTimeProvider {
    pub fn returning(times: PrayerTimes) -> Self {
        Self {
            result: Ok(times),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            result: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Coordinates, NaiveDate)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PrayerTimeProvider for MockPrayerTimeProvider {
    async fn prayer_times(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<PrayerTimes, ProviderError> {
        self.requests.lock().unwrap().push((coordinates, date));
        self.result.clone()
    }
}
