//! Registry configuration.
//!
//! Defaults suit production use. Override via environment variables or
//! explicit construction in tests.

/// Tunables for a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Cache discriminator resolutions per built index.
    /// Default: `true`.
    pub memoize: bool,
    /// Most discriminators the memo cache holds per built index. Once full,
    /// further lookups resolve uncached.
    /// Default: 4096.
    pub memo_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            memo_capacity: 4096,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SPK_RESOLVER_MEMOIZE` (default: `true`; accepts `1/0`, `true/false`,
    ///   `yes/no`, `on/off`)
    /// - `SPK_RESOLVER_MEMO_CAPACITY` (default: `4096`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            memoize: env_bool("SPK_RESOLVER_MEMOIZE", defaults.memoize)?,
            memo_capacity: env_usize("SPK_RESOLVER_MEMO_CAPACITY", defaults.memo_capacity)?,
        })
    }
}

pub(crate) fn env_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

pub(crate) fn env_usize(var: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {0}: '{1}'")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_memoizes() {
        let config = RegistryConfig::default();
        assert!(config.memoize);
        assert_eq!(config.memo_capacity, 4096);
    }

    #[test]
    fn env_usize_uses_default_when_var_absent() {
        assert_eq!(env_usize("NONEXISTENT_SPK_VAR_12345", 7).unwrap(), 7);
    }

    #[test]
    fn env_bool_uses_default_when_var_absent() {
        assert!(env_bool("NONEXISTENT_SPK_VAR_12345", true).unwrap());
        assert!(!env_bool("NONEXISTENT_SPK_VAR_12345", false).unwrap());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool(" no "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
