//! Store configuration.

use core::str::FromStr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shelfwise_core::DomainError;

/// What `add_product` does when the SKU already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateSkuPolicy {
    /// Fail with a conflict and leave the stored row untouched.
    #[default]
    Reject,
    /// Replace every field of the stored row, quantity included.
    Upsert,
}

impl DuplicateSkuPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateSkuPolicy::Reject => "reject",
            DuplicateSkuPolicy::Upsert => "upsert",
        }
    }
}

impl core::fmt::Display for DuplicateSkuPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicateSkuPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DuplicateSkuPolicy::Reject),
            "upsert" => Ok(DuplicateSkuPolicy::Upsert),
            other => Err(DomainError::validation(format!(
                "unknown duplicate sku policy '{other}' (expected 'reject' or 'upsert')"
            ))),
        }
    }
}

/// Connection settings for the SQLite-backed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `sqlite://path/to/file.db` or `sqlite::memory:`.
    pub database_url: String,
    /// Pool size for file databases. In-memory databases always use one connection.
    pub max_connections: u32,
    pub duplicate_policy: DuplicateSkuPolicy,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            duplicate_policy: DuplicateSkuPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// A private, non-durable database that lives as long as the store.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            duplicate_policy: DuplicateSkuPolicy::default(),
        }
    }

    /// A database file at `path` (created if missing).
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite://{}", path.as_ref().display()),
            ..Self::default()
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicateSkuPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(DomainError::validation(format!(
                "database url must use the sqlite scheme (got '{}')",
                self.database_url
            )));
        }
        if self.max_connections == 0 {
            return Err(DomainError::validation("max_connections must be at least 1"));
        }
        Ok(())
    }
}
