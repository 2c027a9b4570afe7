//! Identity triple and cache key normalization.
//!
//! A character is addressed by (region, realm, character). All three parts
//! are case-insensitive; the normalized form is trimmed and lower-cased and
//! is the only form that reaches the cache or the backend.

use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every progress cache key.
pub const CACHE_KEY_PREFIX: &str = "achv";

/// Normalized (region, realm, character) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    region: String,
    realm: String,
    character: String,
}

impl Identity {
    /// Build a normalized identity, rejecting blank parts and regions the
    /// backend does not serve.
    pub fn new(
        region: impl AsRef<str>,
        realm: impl AsRef<str>,
        character: impl AsRef<str>,
    ) -> Result<Self, IdentityError> {
        let region = normalize(region.as_ref(), "region")?;
        let region = region.parse::<Region>()?;
        Ok(Self {
            region: region.as_str().to_string(),
            realm: normalize(realm.as_ref(), "realm")?,
            character: normalize(character.as_ref(), "character")?,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    /// Cache key of the form `achv_<region>_<realm>_<character>`.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey(format!(
            "{}_{}_{}_{}",
            CACHE_KEY_PREFIX, self.region, self.realm, self.character
        ))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.region, self.realm, self.character)
    }
}

fn normalize(value: &str, field: &'static str) -> Result<String, IdentityError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::MissingField { field });
    }
    Ok(trimmed.to_lowercase())
}

/// Key under which a progress tree is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Game regions served by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Eu,
    Kr,
    Tw,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[Region::Us, Region::Eu, Region::Kr, Region::Tw]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
            Region::Kr => "kr",
            Region::Tw => "tw",
        }
    }

    pub fn next(&self) -> Region {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> Region {
        let all = Self::all();
        let idx = all.iter().position(|r| r == self).unwrap_or(0);
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            "kr" => Ok(Region::Kr),
            "tw" => Ok(Region::Tw),
            _ => Err(IdentityError::UnsupportedRegion {
                region: s.to_string(),
            }),
        }
    }
}
