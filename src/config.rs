use crate::encoding::TextEncoding;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the `<locale>.json` catalogs
    pub messages_dir: PathBuf,

    /// Report what would change without writing
    pub dry_run: bool,

    /// Re-parse each catalog after writing it
    pub verify: bool,

    /// Encoding `check_catalogs` reads catalogs with
    pub catalog_encoding: TextEncoding,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            messages_dir: std::env::var("MESSAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("messages")),
            dry_run: parse_flag("PATCH_DRY_RUN", false)?,
            verify: parse_flag("PATCH_VERIFY", true)?,
            catalog_encoding: match std::env::var("CATALOG_ENCODING") {
                Ok(label) => label
                    .parse()
                    .context("CATALOG_ENCODING must be utf-8 or latin-1")?,
                Err(_) => TextEncoding::default(),
            },
        })
    }

    /// Config rooted at an explicit messages directory, with defaults otherwise.
    pub fn with_messages_dir(messages_dir: impl Into<PathBuf>) -> Self {
        Self {
            messages_dir: messages_dir.into(),
            dry_run: false,
            verify: true,
            catalog_encoding: TextEncoding::default(),
        }
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    let Ok(value) = std::env::var(name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("{} must be a boolean, got '{}'", name, other),
    }
}
