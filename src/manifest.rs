//! Patch manifests: declarative descriptions of one insertion batch per
//! catalog, sharing a single marker key.

use crate::batch::{BatchEntry, InsertionBatch, MarkerKey};
use crate::config::Config;
use crate::encoding::TextEncoding;
use crate::i18n::Locale;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchManifest {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Key whose presence means the batch was already applied
    pub marker: String,

    #[serde(default)]
    pub encoding: TextEncoding,

    pub targets: Vec<TargetSpec>,

    /// Directory relative target paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One catalog to patch, named either by locale or by path.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub path: Option<PathBuf>,

    pub entries: Vec<BatchEntry>,
}

impl PatchManifest {
    /// Load a manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let mut manifest: PatchManifest = text
            .parse()
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        manifest.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(manifest)
    }

    pub fn marker(&self) -> MarkerKey {
        MarkerKey::new(self.marker.as_str())
    }

    /// Resolve every target to its catalog path and build its batch, in
    /// manifest order.
    pub fn batches(&self, config: &Config) -> Result<Vec<(PathBuf, InsertionBatch)>> {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, target)| {
                let path = self
                    .resolve_path(target, config)
                    .with_context(|| format!("Target #{} of manifest '{}'", i + 1, self.name))?;
                let batch = InsertionBatch::from_entries(&target.entries, self.marker())
                    .with_context(|| format!("Batch for {}", path.display()))?;
                Ok((path, batch))
            })
            .collect()
    }

    fn resolve_path(&self, target: &TargetSpec, config: &Config) -> Result<PathBuf> {
        match (&target.locale, &target.path) {
            (Some(code), None) => Ok(Locale::from_code(code)?.catalog_path(&config.messages_dir)),
            (None, Some(path)) if path.is_absolute() => Ok(path.clone()),
            (None, Some(path)) => Ok(self.base_dir.join(path)),
            (Some(_), Some(_)) => bail!("target sets both 'locale' and 'path'"),
            (None, None) => bail!("target needs either 'locale' or 'path'"),
        }
    }
}

impl FromStr for PatchManifest {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let manifest: PatchManifest =
            serde_json::from_str(text).context("Failed to parse manifest JSON")?;
        if manifest.targets.is_empty() {
            bail!("manifest '{}' has no targets", manifest.name);
        }
        Ok(manifest)
    }
}
