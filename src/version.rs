//! Swift language versions
//!
//! Rules that depend on a language feature compare the version in effect
//! against a minimum. Versions are ordered field by field.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A Swift language version (`major.minor.patch`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwiftVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Error returned when a version string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid Swift version '{input}': expected MAJOR[.MINOR[.PATCH]]")]
pub struct VersionParseError {
    pub input: String,
}

impl SwiftVersion {
    pub const THREE: SwiftVersion = SwiftVersion::new(3, 0, 0);
    pub const FOUR: SwiftVersion = SwiftVersion::new(4, 0, 0);
    pub const FOUR_DOT_TWO: SwiftVersion = SwiftVersion::new(4, 2, 0);
    pub const FIVE: SwiftVersion = SwiftVersion::new(5, 0, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a feature introduced in `minimum` is available in this version
    pub fn supports(self, minimum: SwiftVersion) -> bool {
        self >= minimum
    }
}

impl Default for SwiftVersion {
    fn default() -> Self {
        SwiftVersion::FIVE
    }
}

impl fmt::Display for SwiftVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

impl FromStr for SwiftVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };

        let mut parts = [0u32; 3];
        let mut count = 0;
        for part in s.trim().split('.') {
            if count == parts.len() {
                return Err(err());
            }
            parts[count] = part.parse().map_err(|_| err())?;
            count += 1;
        }

        Ok(SwiftVersion::new(parts[0], parts[1], parts[2]))
    }
}

impl Serialize for SwiftVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SwiftVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
