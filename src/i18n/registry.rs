//! Locale registry: the catalogs the site ships.
//!
//! Every locale listed here has a `<code>.json` catalog in the messages
//! directory. The registry is built once on first access and is immutable
//! afterwards.

use std::sync::OnceLock;

/// Metadata for one supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 code, also the catalog file stem (e.g. "es")
    pub code: &'static str,

    /// English name of the locale
    pub name: &'static str,

    /// Native name of the locale
    pub native_name: &'static str,

    /// Disabled locales are rejected by [`crate::i18n::Locale::from_code`]
    pub enabled: bool,
}

/// Global locale registry.
///
/// Access it through [`LocaleRegistry::get`]; there is no way to build a
/// second instance.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global registry instance, initializing it on first call.
    ///
    /// # Returns
    /// A static reference to the registry, shared by every caller
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Look up a locale by code.
    ///
    /// # Arguments
    /// * `code` - ISO 639-1 code such as "es"
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the code is registered, enabled or not
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All enabled locales, in registry order.
    ///
    /// Registry order is the order catalogs are checked and patched in.
    pub fn list_enabled(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().filter(|locale| locale.enabled).collect()
    }

}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            enabled: true,
        },
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            enabled: true,
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            enabled: true,
        },
    ]
}
