//! Settings
//!
//! Optional YAML defaults for the command-line front end. Every field can be
//! overridden by a flag or environment variable.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::{Currency, EUR, GBP, KES, USD};
use serde::Deserialize;
use thiserror::Error;

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Storefront settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Path to the local order database
    pub database: PathBuf,

    /// ISO currency code prices are quoted in
    pub currency: String,

    /// Verified email of the signed-in user
    pub owner_email: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("rental-wheels.db"),
            currency: "KES".to_string(),
            owner_email: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse settings from YAML text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Yaml`] if the text is not valid settings YAML.
    pub fn from_yaml(contents: &str) -> Result<Self, SettingsError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownCurrency`] for unsupported codes.
    pub fn currency(&self) -> Result<&'static Currency, SettingsError> {
        parse_currency(&self.currency)
    }
}

/// Resolve a supported ISO currency code.
///
/// # Errors
///
/// Returns [`SettingsError::UnknownCurrency`] for unsupported codes.
pub fn parse_currency(code: &str) -> Result<&'static Currency, SettingsError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "KES" => Ok(KES),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        other => Err(SettingsError::UnknownCurrency(other.to_string())),
    }
}
