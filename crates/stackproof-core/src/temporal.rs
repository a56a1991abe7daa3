//! # Issuance Timestamps
//!
//! [`IssuedAt`] is the credential issuance timestamp: an RFC 3339 UTC
//! string with `Z` suffix. The type preserves the exact string it was
//! constructed with, because the signed message embeds that string
//! byte-for-byte. Reformatting on parse would break message recomputation
//! for credentials issued elsewhere with a different sub-second precision.
//!
//! Locally issued timestamps use millisecond precision
//! (`2026-01-15T12:00:00.000Z`), matching the rendering of the browser
//! wallets this credential format originated with.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A credential issuance timestamp: RFC 3339, UTC only, rendering preserved.
///
/// # Construction
///
/// - [`IssuedAt::now()`] — current UTC time at millisecond precision.
/// - [`IssuedAt::from_utc()`] — from a `DateTime<Utc>`, millisecond precision.
/// - [`IssuedAt::new()`] — from an existing string, preserving its rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IssuedAt(String);

impl IssuedAt {
    /// Capture the current UTC time at millisecond precision.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Render a `DateTime<Utc>` at millisecond precision with `Z` suffix.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Accept an existing RFC 3339 string, preserving its exact rendering.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted;
    /// explicit offsets are refused even when semantically equivalent
    /// (`+00:00`), so that one instant cannot have several ambiguous
    /// renderings in locally issued credentials. Sub-second precision is
    /// not constrained: seconds, milliseconds, and microseconds all pass,
    /// and the given string is stored untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if the string is not
    /// valid RFC 3339 or does not end in `Z`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp {
                value: s,
                reason: "must use the Z suffix (UTC only)".to_string(),
            });
        }
        if let Err(e) = DateTime::parse_from_rfc3339(&s) {
            return Err(ValidationError::InvalidTimestamp {
                value: s,
                reason: e.to_string(),
            });
        }
        Ok(Self(s))
    }

    /// The timestamp string exactly as constructed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant this timestamp denotes.
    pub fn instant(&self) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&self.0)
            .map(|dt| dt.with_timezone(&Utc))
            .expect("validated at construction")
    }
}

impl std::fmt::Display for IssuedAt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Deserializes as a plain string, then routes through `new()` so that
// non-UTC or malformed timestamps are rejected at deserialization time.
impl<'de> Deserialize<'de> for IssuedAt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
