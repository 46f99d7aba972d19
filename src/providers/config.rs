//! Provider configuration types.

use serde::{Deserialize, Serialize};

/// Default prayer-time calculation method (Egyptian General Authority of Survey).
fn default_method() -> u8 {
    5
}

/// Default HTTP timeout in seconds.
fn default_timeout_seconds() -> u64 {
    10
}

/// Default number of attempts per request.
fn default_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    format!("Iftar Countdown App/{}", env!("CARGO_PKG_VERSION"))
}

fn default_ipinfo_url() -> String {
    "https://ipinfo.io/json".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_aladhan_url() -> String {
    "https://api.aladhan.com/v1".to_string()
}

/// Calculation methods accepted by the prayer-time service.
///
/// 1 Karachi, 2 ISNA, 3 Muslim World League, 4 Umm Al-Qura, 5 Egyptian
/// General Authority of Survey, 7 Tehran, 8 Gulf Region, 9 Kuwait, 10 Qatar,
/// 11 Singapore, 12 France, 13 Turkey, 14 Russia, 15 Moonsighting Committee.
pub const CALCULATION_METHODS: [u8; 14] = [1, 2, 3, 4, 5, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Configuration for the external services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Prayer-time calculation method
    #[serde(default = "default_method")]
    pub method: u8,

    /// Timeout for a single HTTP request in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Attempts per request, including the first (1-10)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// User-Agent header; Nominatim rejects requests without one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// IP geolocation endpoint
    #[serde(default = "default_ipinfo_url")]
    pub ipinfo_url: String,

    /// Nominatim base URL
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Aladhan API base URL
    #[serde(default = "default_aladhan_url")]
    pub aladhan_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
            ipinfo_url: default_ipinfo_url(),
            nominatim_url: default_nominatim_url(),
            aladhan_url: default_aladhan_url(),
        }
    }
}

impl ProviderConfig {
    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if !CALCULATION_METHODS.contains(&self.method) {
            return Err(format!("unknown calculation method {}", self.method));
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > 120 {
            return Err("timeout_seconds must be between 1 and 120".to_string());
        }
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err("max_retries must be between 1 and 10".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}
