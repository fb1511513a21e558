//! Host-supplied configuration for index construction.
//!
//! The host indexing layer extracts keys from records by inspecting a
//! designated field; that field name arrives here as a plain struct and is
//! validated when the index is built. The configured name stays readable
//! through [`crate::OrderedIndex::key_field`] afterwards.

use crate::error::ConfigError;

/// Construction-time configuration for an index.
///
/// `key_field` names the record field/property the index key is derived
/// from. Building an index from a config with no key field fails with
/// [`ConfigError::MissingKeyField`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexConfig {
    /// Record field the key is extracted from, if configured.
    pub key_field: Option<String>,
}

impl IndexConfig {
    /// Config naming `field` as the key source.
    #[must_use]
    pub fn with_key_field(field: impl Into<String>) -> Self {
        Self {
            key_field: Some(field.into()),
        }
    }

    /// Validate the config, yielding the key-source field name.
    pub(crate) fn into_key_field(self) -> Result<String, ConfigError> {
        self.key_field.ok_or(ConfigError::MissingKeyField)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_key_field() {
        let config = IndexConfig::with_key_field("age");

        assert_eq!(config.key_field.as_deref(), Some("age"));
        assert_eq!(config.into_key_field(), Ok("age".to_string()));
    }

    #[test]
    fn test_default_config_has_no_key_field() {
        let config = IndexConfig::default();

        assert_eq!(config.key_field, None);
        assert_eq!(config.into_key_field(), Err(ConfigError::MissingKeyField));
    }
}
