//! SDK version identifier.
//!
//! Notices embed the SDK version they were authored against in the prefixed
//! form `eforms-sdk-major.minor`, while the SDK folders on disk carry the full
//! `major.minor.patch`. Version compatibility checks always ignore the patch
//! component.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Prefix carried by version identifiers embedded in notices.
pub const EFORMS_SDK_PREFIX: &str = "eforms-sdk-";

/// An SDK version (`major.minor.patch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SdkVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SdkVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch component.
    #[must_use]
    pub const fn patch(&self) -> u32 {
        self.patch
    }

    /// Parses a prefixed version identifier such as `eforms-sdk-1.8` or
    /// `eforms-sdk-1.8.2`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidVersion`] when the prefix or the numeric
    /// part is malformed.
    pub fn parse_prefixed(text: &str) -> Result<Self, ModelError> {
        let rest = text
            .strip_prefix(EFORMS_SDK_PREFIX)
            .ok_or_else(|| ModelError::invalid_version(text))?;
        rest.parse()
    }

    /// Renders the version with the notice prefix and without the patch
    /// component, the form embedded in generated notices.
    #[must_use]
    pub fn to_prefixed_without_patch(&self) -> String {
        format!("{EFORMS_SDK_PREFIX}{}.{}", self.major, self.minor)
    }

    /// Renders `major.minor` without the patch component.
    #[must_use]
    pub fn without_patch(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Compares two versions ignoring the patch component.
    #[must_use]
    pub fn same_ignoring_patch(&self, other: &SdkVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl FromStr for SdkVersion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let major = parse_component(s, parts.next())?;
        let minor = parse_component(s, parts.next())?;
        let patch = match parts.next() {
            Some(p) => parse_component(s, Some(p))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(ModelError::invalid_version(s));
        }
        Ok(Self::new(major, minor, patch))
    }
}

fn parse_component(full: &str, part: Option<&str>) -> Result<u32, ModelError> {
    part.ok_or_else(|| ModelError::invalid_version(full))?
        .parse()
        .map_err(|_| ModelError::invalid_version(full))
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
