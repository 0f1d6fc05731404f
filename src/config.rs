//! Configuration management for the vault.
//!
//! Defines the structure for user-configurable settings.

use alloc::string::String;
use core::fmt;

use crate::core::PrimeField;
use crate::mpc::MIN_THRESHOLD;

/// Built-in prime fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldChoice {
    /// 2^61 - 1. Test vectors and small secrets only.
    Mersenne61,
    /// 2^127 - 1.
    Mersenne127,
    /// 2^521 - 1. Wide enough for a 256-bit key.
    Mersenne521,
}

impl FieldChoice {
    pub fn field(self) -> PrimeField {
        match self {
            FieldChoice::Mersenne61 => PrimeField::mersenne_61(),
            FieldChoice::Mersenne127 => PrimeField::mersenne_127(),
            FieldChoice::Mersenne521 => PrimeField::mersenne_521(),
        }
    }

    pub fn bits(self) -> u64 {
        match self {
            FieldChoice::Mersenne61 => 61,
            FieldChoice::Mersenne127 => 127,
            FieldChoice::Mersenne521 => 521,
        }
    }
}

/// Errors from configuration validation and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Threshold outside `2..=share_count`.
    InvalidThreshold { threshold: usize, share_count: usize },
    /// The field cannot hold the secret the vault splits.
    FieldTooSmall { bits: u64, required: u64 },
    /// Extensions must start with a dot and be more than a dot.
    InvalidExtension(String),
    /// Serialized configuration could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold { threshold, share_count } => write!(
                f,
                "Threshold {} is invalid for {} shares (need 2 <= t <= n)",
                threshold, share_count
            ),
            ConfigError::FieldTooSmall { bits, required } => write!(
                f,
                "A {}-bit field cannot hold the key; more than {} bits required",
                bits, required
            ),
            ConfigError::InvalidExtension(ext) => write!(f, "Invalid file extension {:?}", ext),
            ConfigError::Parse(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Main configuration structure for the vault.
///
/// This struct should be populated by the host application (CLI/GUI) and passed
/// to the respective modules.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VaultConfig {
    /// Shares needed to open (t).
    pub threshold: usize,

    /// Shares produced when sealing (n).
    pub share_count: usize,

    /// Field the key is shared over.
    pub field: FieldChoice,

    /// Appended to a file name when it is sealed (e.g. `notes.txt.ssv`).
    pub encrypted_extension: String,

    /// Extension of the per-holder share files.
    pub share_extension: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            threshold: 3,
            share_count: 5,
            field: FieldChoice::Mersenne521,
            encrypted_extension: String::from(".ssv"),
            share_extension: String::from(".share"),
        }
    }
}

impl VaultConfig {
    /// Checks the settings without drawing randomness or touching disk.
    ///
    /// `key_bits` is the width of the secret to be shared; the field must be
    /// strictly wider.
    pub fn validate(&self, key_bits: u64) -> Result<(), ConfigError> {
        if self.threshold < MIN_THRESHOLD || self.threshold > self.share_count {
            return Err(ConfigError::InvalidThreshold {
                threshold: self.threshold,
                share_count: self.share_count,
            });
        }
        if self.field.bits() <= key_bits {
            return Err(ConfigError::FieldTooSmall {
                bits: self.field.bits(),
                required: key_bits,
            });
        }
        for ext in [&self.encrypted_extension, &self.share_extension] {
            let valid = ext.len() > 1
                && ext.starts_with('.')
                && !ext.contains(['/', '\\']);
            if !valid {
                return Err(ConfigError::InvalidExtension(ext.clone()));
            }
        }
        Ok(())
    }

    /// Parses a JSON configuration. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(alloc::format!("{}", e)))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(alloc::format!("{}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.threshold, 3);
        assert_eq!(config.share_count, 5);
        assert_eq!(config.field, FieldChoice::Mersenne521);
        assert_eq!(config.validate(256), Ok(()));
    }

    #[test]
    fn test_field_choice_matches_field() {
        for choice in [FieldChoice::Mersenne61, FieldChoice::Mersenne127, FieldChoice::Mersenne521] {
            assert_eq!(choice.field().bits(), choice.bits());
        }
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let mut config = VaultConfig::default();
        config.threshold = 6;
        assert_eq!(
            config.validate(256),
            Err(ConfigError::InvalidThreshold { threshold: 6, share_count: 5 })
        );
        config.threshold = 1;
        assert!(config.validate(256).is_err());
    }

    #[test]
    fn test_rejects_narrow_field() {
        let config = VaultConfig {
            field: FieldChoice::Mersenne127,
            ..VaultConfig::default()
        };
        assert_eq!(
            config.validate(256),
            Err(ConfigError::FieldTooSmall { bits: 127, required: 256 })
        );
        assert_eq!(config.validate(64), Ok(()));
    }

    #[test]
    fn test_rejects_bad_extension() {
        for ext in ["", ".", "ssv", "./x", ".a\\b"] {
            let config = VaultConfig {
                encrypted_extension: String::from(ext),
                ..VaultConfig::default()
            };
            assert!(
                matches!(config.validate(256), Err(ConfigError::InvalidExtension(_))),
                "accepted {:?}",
                ext
            );
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip() {
        let config = VaultConfig {
            threshold: 2,
            share_count: 3,
            ..VaultConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(VaultConfig::from_json(&json).unwrap(), config);

        let partial = VaultConfig::from_json(r#"{"threshold": 4, "field": "Mersenne127"}"#).unwrap();
        assert_eq!(partial.threshold, 4);
        assert_eq!(partial.share_count, 5);
        assert_eq!(partial.field, FieldChoice::Mersenne127);

        assert!(matches!(
            VaultConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
