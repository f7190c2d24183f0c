//! Engine configuration
//!
//! The engine can be configured in code or from TOML:
//!
//! ```toml
//! restricted_types = ["reflex.Reflex", "com.acme.Vault"]
//! debug = false
//! strict_overloads = false
//!
//! [cache]
//! ttl_ms = 300000
//! max_size = 1000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{duration_millis, DEFAULT_MAX_SIZE, DEFAULT_TTL};
use crate::error::{ReflectError, ReflectResult};

/// Type name under which the engine itself is known; restricted by default
pub const ENGINE_TYPE_NAME: &str = "reflex.Reflex";

/// Cache settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Maximum number of entries
    pub max_size: usize,
}

impl CacheConfig {
    /// Time-to-live as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: duration_millis(DEFAULT_TTL),
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// Resolution engine settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fully-qualified names the engine refuses to reflect on
    pub restricted_types: Vec<String>,
    /// Log resolutions at debug instead of trace level
    pub debug: bool,
    /// Report ambiguous by-argument overloads instead of taking the first
    pub strict_overloads: bool,
    /// Cache settings
    pub cache: CacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            restricted_types: vec![ENGINE_TYPE_NAME.to_string()],
            debug: false,
            strict_overloads: false,
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> ReflectResult<Self> {
        toml::from_str(content).map_err(|e| ReflectError::Config(e.to_string()))
    }

    /// Load from a TOML file
    pub fn load_from_file(path: &Path) -> ReflectResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReflectError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Add a restricted type name
    pub fn restrict(mut self, type_name: impl Into<String>) -> Self {
        self.restricted_types.push(type_name.into());
        self
    }

    /// Toggle debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Toggle strict overload resolution
    pub fn with_strict_overloads(mut self, strict: bool) -> Self {
        self.strict_overloads = strict;
        self
    }

    /// Set cache time-to-live
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl_ms = duration_millis(ttl);
        self
    }

    /// Set cache capacity
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.cache.max_size = max_size;
        self
    }

    /// Check if a type name is restricted
    pub fn is_restricted(&self, type_name: &str) -> bool {
        self.restricted_types.iter().any(|t| t == type_name)
    }
}
