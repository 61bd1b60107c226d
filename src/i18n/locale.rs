//! Validated locale handle.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use anyhow::{bail, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// A locale that exists in the registry and is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const SPANISH: Locale = Locale { code: "es" };
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const FRENCH: Locale = Locale { code: "fr" };

    /// Create a Locale from its code.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered and enabled
    /// * `Err` if the code is unknown or the locale is disabled
    pub fn from_code(code: &str) -> Result<Locale> {
        match LocaleRegistry::get().get_by_code(code) {
            Some(config) if config.enabled => Ok(Locale { code: config.code }),
            Some(_) => bail!("Locale '{}' is not enabled", code),
            None => bail!("Unknown locale code: '{}'", code),
        }
    }

    /// Every enabled locale, in registry order.
    pub fn all_enabled() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    /// ISO 639-1 code, also the catalog file stem.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Registry entry for this locale.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .expect("Locale code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Path of this locale's catalog: `<messages_dir>/<code>.json`.
    pub fn catalog_path(&self, messages_dir: &Path) -> PathBuf {
        messages_dir.join(format!("{}.json", self.code))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
