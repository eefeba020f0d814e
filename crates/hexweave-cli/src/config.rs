//! CLI configuration.

use hexweave_tessellate::SearchConfig;

use crate::error::{Error, Result};

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Largest ring searched for tile offsets (`HEXWEAVE_MAX_RADIUS`).
    pub max_radius: u64,
    /// Maximum number of tilings reported (`HEXWEAVE_MAX_TILINGS`).
    pub max_tilings: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            max_radius: search.max_radius,
            max_tilings: search.max_tilings,
        }
    }
}

impl CliConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_radius: parse_var(&lookup, "HEXWEAVE_MAX_RADIUS", defaults.max_radius)?,
            max_tilings: parse_var(&lookup, "HEXWEAVE_MAX_TILINGS", defaults.max_tilings)?,
        })
    }

    pub fn search(&self) -> SearchConfig {
        SearchConfig {
            max_radius: self.max_radius,
            max_tilings: self.max_tilings,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key}={raw:?} is not a valid number"))),
    }
}
