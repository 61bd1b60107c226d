//! Locale catalogs.
//!
//! - `registry`: the locales the site ships and their metadata
//! - `locale`: validated `Locale` handle and catalog path resolution
//! - `validator`: structural checks of a catalog after patching

mod locale;
mod registry;
mod validator;

pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
pub use validator::{CatalogValidator, ValidationReport};
