//! Engine configuration. The public surface is versioned: callers pin the
//! API version their code was written against, and the few behaviors that
//! changed across versions are gated on it at the kernel level.

use std::cmp::Ordering;
use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Lowest API version callers may pin
pub const MIN_API_VERSION: ApiVersion = ApiVersion {
    major: 0,
    minor: 20,
};

/// Highest (current) API version
pub const MAX_API_VERSION: ApiVersion = ApiVersion { major: 1, minor: 0 };

/// A `major.minor` API version pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a version string like `"0.20"` or `"1.0"` and check it falls
    /// inside the supported range
    pub fn parse(text: &str) -> Result<Self> {
        let version = Self::from_str(text)?;
        if version < MIN_API_VERSION || version > MAX_API_VERSION {
            return Err(Error::UnsupportedApiVersion(format!(
                "{} is outside the supported range {}..={}",
                version, MIN_API_VERSION, MAX_API_VERSION
            )));
        }
        Ok(version)
    }

    /// Raising an integer to a negative integer power promotes the result
    /// to Float64 from 1.0 on; older pins reject it
    pub fn negative_int_pow_promotes(&self) -> bool {
        *self >= ApiVersion::new(1, 0)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let bad = || Error::UnsupportedApiVersion(format!("cannot parse version \"{}\"", text));
        let (major, minor) = text.trim().split_once('.').ok_or_else(bad)?;
        Ok(Self {
            major: major.parse().map_err(|_| bad())?,
            minor: minor.parse().map_err(|_| bad())?,
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

/// Configuration shared by every backend instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub api_version: ApiVersion,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_version: MAX_API_VERSION,
        }
    }
}

impl EngineConfig {
    pub fn with_api_version(version: ApiVersion) -> Self {
        Self {
            api_version: version,
        }
    }

    /// Read overrides from the environment. `DFBRIDGE_API_VERSION` pins the
    /// API version; anything unset keeps its default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("DFBRIDGE_API_VERSION") {
            config.api_version = ApiVersion::parse(&raw)?;
            log::debug!("api version pinned to {} from environment", config.api_version);
        }
        Ok(config)
    }

    /// Load from a JSON document, for embedding in host configuration
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::InvalidOperation(format!("invalid engine config: {}", e)))?;
        if config.api_version < MIN_API_VERSION || config.api_version > MAX_API_VERSION {
            return Err(Error::UnsupportedApiVersion(format!(
                "{} is outside the supported range {}..={}",
                config.api_version, MIN_API_VERSION, MAX_API_VERSION
            )));
        }
        Ok(config)
    }
}
