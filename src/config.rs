use std::path::Path;

use fractic_server_error::ServerError;
use iso_currency::Currency;
use serde_derive::{Deserialize, Serialize};

use crate::errors::{ConfigReadError, InvalidConfig, InvalidIsoCurrencyCode};

/// Reconciler settings, usually kept in a RON file:
///
/// ```ron
/// (
///     origin: "https://receipts.example.com",
///     currency: "EUR",
/// )
/// ```
///
/// Omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Scopes stored overrides, so two deployments sharing a storage file do
    /// not see each other's edits.
    pub origin: String,
    pub key_prefix: String,
    /// ISO 4217 code used when printing amounts.
    pub currency: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            origin: "default".to_string(),
            key_prefix: "receipt_override:".to_string(),
            currency: "EUR".to_string(),
        }
    }
}

impl ReconcilerConfig {
    pub fn from_ron(s: &str) -> Result<Self, ServerError> {
        let config: Self = ron::from_str(s).map_err(|e| InvalidConfig::with_debug(&e))?;
        config.iso_currency()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigReadError::with_debug(&e))?;
        Self::from_ron(&contents)
    }

    pub fn iso_currency(&self) -> Result<Currency, ServerError> {
        Currency::from_code(self.currency.trim())
            .ok_or_else(|| InvalidIsoCurrencyCode::new(&self.currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let config = ReconcilerConfig::from_ron(r#"(origin: "app")"#).unwrap();
        assert_eq!(config.origin, "app");
        assert_eq!(config.key_prefix, "receipt_override:");
        assert_eq!(config.iso_currency().unwrap(), Currency::EUR);
    }

    #[test]
    fn rejects_unknown_currencies_and_bad_ron() {
        assert!(ReconcilerConfig::from_ron(r#"(currency: "XYZ1")"#).is_err());
        assert!(ReconcilerConfig::from_ron("(origin: ").is_err());
    }

    #[test]
    fn reads_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reconciler.ron");
        std::fs::write(&path, r#"(currency: "JPY", key_prefix: "edits:")"#).unwrap();
        let config = ReconcilerConfig::from_file(&path).unwrap();
        assert_eq!(config.iso_currency().unwrap(), Currency::JPY);
        assert_eq!(config.key_prefix, "edits:");
        assert_eq!(config.origin, "default");

        assert!(ReconcilerConfig::from_file(dir.path().join("missing.ron")).is_err());
    }
}
