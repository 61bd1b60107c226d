//! Check that every enabled locale catalog is a single JSON object.
//!
//! Usage:
//!   cargo run --bin check_catalogs
//!
//! Optional:
//! - MESSAGES_DIR (defaults to messages)
//! - CATALOG_ENCODING (utf-8 or latin-1, defaults to utf-8)

use anyhow::{bail, Result};
use locale_patch::config::Config;
use locale_patch::i18n::{CatalogValidator, Locale};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("check_catalogs=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let encoding = config.catalog_encoding;
    let mut failures = 0;

    info!(
        messages_dir = %config.messages_dir.display(),
        encoding = %encoding,
        "Checking catalogs"
    );

    for locale in Locale::all_enabled() {
        let path = locale.catalog_path(&config.messages_dir);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    "{} ({}): cannot read {}: {}",
                    locale.code(),
                    locale.name(),
                    path.display(),
                    e
                );
                failures += 1;
                continue;
            }
        };

        let content = match encoding.decode(&path, &bytes) {
            Ok(content) => content,
            Err(e) => {
                error!("{} ({}): {}", locale.code(), locale.name(), e);
                failures += 1;
                continue;
            }
        };
        let report = CatalogValidator::validate_structure(&content);
        for warning in &report.warnings {
            warn!("{}: {}", path.display(), warning);
        }
        if report.has_errors() {
            for e in &report.errors {
                error!("{}: {}", path.display(), e);
            }
            failures += 1;
        } else {
            info!(
                "✓ {} ({}, {}): {} keys",
                locale.code(),
                locale.name(),
                locale.native_name(),
                report.keys
            );
        }
    }

    if failures > 0 {
        bail!("{} catalog(s) failed the check", failures);
    }
    Ok(())
}
