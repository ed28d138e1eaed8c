//! Country identifier reconciliation
//!
//! Datasets refer to countries in different identifier spaces: salary rows
//! use ISO alpha-2 codes, disaster rows use alpha-3 codes or display names,
//! and the world topology is keyed by numeric IDs. The [`CountryRegistry`]
//! is built once from the reference table and answers every conversion in
//! O(1), returning `None` when a code is unknown.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a country code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    #[error("invalid alpha-2 code: {0:?}")]
    InvalidAlpha2(String),

    #[error("invalid alpha-3 code: {0:?}")]
    InvalidAlpha3(String),

    #[error("invalid numeric country id: {0:?}")]
    InvalidId(String),
}

/// Numeric country identifier as used by the world topology (ISO 3166 numeric)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryId(pub u16);

impl FromStr for CountryId {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Topology files zero-pad ids ("004"), a plain parse handles both forms
        trimmed
            .parse::<u16>()
            .map(CountryId)
            .map_err(|_| CountryCodeError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

macro_rules! letter_code {
    ($name:ident, $len:literal, $err:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            /// The code as an upper-case string slice
            pub fn as_str(&self) -> &str {
                // Constructed only from ASCII letters
                std::str::from_utf8(&self.0).unwrap_or_default()
            }
        }

        impl FromStr for $name {
            type Err = CountryCodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let bytes = trimmed.as_bytes();
                if bytes.len() != $len || !bytes.iter().all(u8::is_ascii_alphabetic) {
                    return Err(CountryCodeError::$err(s.to_string()));
                }
                let mut code = [0u8; $len];
                for (dst, src) in code.iter_mut().zip(bytes) {
                    *dst = src.to_ascii_uppercase();
                }
                Ok(Self(code))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }
    };
}

letter_code!(Alpha2, 2, InvalidAlpha2, "ISO 3166-1 alpha-2 code, stored upper case");
letter_code!(Alpha3, 3, InvalidAlpha3, "ISO 3166-1 alpha-3 code, stored upper case");

/// All identifiers of one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryIdentity {
    pub id: CountryId,
    pub alpha2: Alpha2,
    pub alpha3: Alpha3,
    pub name: String,
}

/// Bidirectional lookup tables between the country identifier spaces
#[derive(Debug, Default, Clone)]
pub struct CountryRegistry {
    identities: AHashMap<CountryId, CountryIdentity>,
    alpha2_to_id: AHashMap<Alpha2, CountryId>,
    alpha3_to_id: AHashMap<Alpha3, CountryId>,
    alpha2_to_alpha3: AHashMap<Alpha2, Alpha3>,
    alpha3_to_alpha2: AHashMap<Alpha3, Alpha2>,
    name_to_id: AHashMap<String, CountryId>,
}

impl CountryRegistry {
    /// Build the registry in a single pass over the reference rows.
    ///
    /// A row that would bind an already-registered alpha-2, alpha-3 or id to
    /// a different country is skipped, keeping every direction mutually
    /// inverse.
    pub fn from_identities<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CountryIdentity>,
    {
        let mut registry = Self::default();
        for identity in rows {
            registry.insert(identity);
        }
        tracing::debug!("Country registry built with {} countries", registry.len());
        registry
    }

    fn insert(&mut self, identity: CountryIdentity) {
        if self.identities.contains_key(&identity.id)
            || self.alpha2_to_id.contains_key(&identity.alpha2)
            || self.alpha3_to_id.contains_key(&identity.alpha3)
        {
            tracing::warn!(
                "Skipping conflicting reference row {} / {} / {} ({})",
                identity.alpha2,
                identity.alpha3,
                identity.id,
                identity.name
            );
            return;
        }

        self.alpha2_to_id.insert(identity.alpha2, identity.id);
        self.alpha3_to_id.insert(identity.alpha3, identity.id);
        self.alpha2_to_alpha3.insert(identity.alpha2, identity.alpha3);
        self.alpha3_to_alpha2.insert(identity.alpha3, identity.alpha2);
        self.name_to_id
            .entry(normalize_name(&identity.name))
            .or_insert(identity.id);
        self.identities.insert(identity.id, identity);
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn contains(&self, id: CountryId) -> bool {
        self.identities.contains_key(&id)
    }

    pub fn identity(&self, id: CountryId) -> Option<&CountryIdentity> {
        self.identities.get(&id)
    }

    pub fn alpha2_to_id(&self, code: Alpha2) -> Option<CountryId> {
        self.alpha2_to_id.get(&code).copied()
    }

    pub fn alpha3_to_id(&self, code: Alpha3) -> Option<CountryId> {
        self.alpha3_to_id.get(&code).copied()
    }

    pub fn alpha2_to_alpha3(&self, code: Alpha2) -> Option<Alpha3> {
        self.alpha2_to_alpha3.get(&code).copied()
    }

    pub fn alpha3_to_alpha2(&self, code: Alpha3) -> Option<Alpha2> {
        self.alpha3_to_alpha2.get(&code).copied()
    }

    pub fn id_to_name(&self, id: CountryId) -> Option<&str> {
        self.identities.get(&id).map(|c| c.name.as_str())
    }

    pub fn id_to_alpha2(&self, id: CountryId) -> Option<Alpha2> {
        self.identities.get(&id).map(|c| c.alpha2)
    }

    pub fn id_to_alpha3(&self, id: CountryId) -> Option<Alpha3> {
        self.identities.get(&id).map(|c| c.alpha3)
    }

    /// Case-insensitive lookup by display name
    pub fn name_to_id(&self, name: &str) -> Option<CountryId> {
        self.name_to_id.get(&normalize_name(name)).copied()
    }

    /// Resolve a raw alpha-2 string, `None` when unparseable or unknown
    pub fn resolve_alpha2(&self, raw: &str) -> Option<CountryId> {
        raw.parse::<Alpha2>().ok().and_then(|code| self.alpha2_to_id(code))
    }

    /// Resolve a raw alpha-3 string, `None` when unparseable or unknown
    pub fn resolve_alpha3(&self, raw: &str) -> Option<CountryId> {
        raw.parse::<Alpha3>().ok().and_then(|code| self.alpha3_to_id(code))
    }

    /// Iterate identities in ascending id order
    pub fn identities(&self) -> impl Iterator<Item = &CountryIdentity> {
        let mut ids: Vec<_> = self.identities.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(move |id| self.identities.get(&id))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
