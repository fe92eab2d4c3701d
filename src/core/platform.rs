//! Build platforms a signing step may be invoked for.

use std::fmt;
use std::str::FromStr;

use crate::core::error::CosignError;

/// Platform of the surrounding build lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Mac,
    Tvos,
    Watchos,
    Android,
}

impl Platform {
    /// Whether code signing settings can be applied on this platform.
    pub fn is_supported(self) -> bool {
        matches!(self, Platform::Ios | Platform::Mac)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Mac => "mac",
            Platform::Tvos => "tvos",
            Platform::Watchos => "watchos",
            Platform::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "mac" | "osx" | "macos" => Ok(Platform::Mac),
            "tvos" => Ok(Platform::Tvos),
            "watchos" => Ok(Platform::Watchos),
            "android" => Ok(Platform::Android),
            _ => Err(format!("unknown platform '{}'", s)),
        }
    }
}

/// Reject a platform name that is unknown or not supported.
pub fn ensure_supported(name: &str) -> Result<Platform, CosignError> {
    match name.parse::<Platform>() {
        Ok(platform) if platform.is_supported() => Ok(platform),
        _ => Err(CosignError::UnsupportedPlatform {
            platform: name.to_string(),
        }),
    }
}
