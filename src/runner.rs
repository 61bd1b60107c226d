//! Applies a patch manifest to its catalogs, one file after another.

use crate::appender::{ApplyOutcome, KeyAppender};
use crate::batch::InsertionBatch;
use crate::config::Config;
use crate::i18n::CatalogValidator;
use crate::manifest::PatchManifest;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome for a single catalog.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub keys: usize,
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
}

/// Summary of one manifest run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub manifest: String,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn applied(&self) -> usize {
        self.files
            .iter()
            .filter(|f| !matches!(f.outcome, ApplyOutcome::AlreadyApplied))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.files.len() - self.applied()
    }
}

/// Apply every target of `manifest` in order.
///
/// The first failure aborts the run; files patched before it stay patched.
pub fn run_manifest(config: &Config, manifest: &PatchManifest) -> Result<RunReport> {
    let started_at = Utc::now();
    let batches = manifest.batches(config)?;
    let appender = KeyAppender::new(manifest.encoding).with_dry_run(config.dry_run);

    info!(
        manifest = %manifest.name,
        targets = batches.len(),
        encoding = %manifest.encoding,
        "Applying manifest"
    );

    let mut files = Vec::with_capacity(batches.len());
    for (path, batch) in &batches {
        let outcome = appender
            .apply(path, batch)
            .with_context(|| format!("Failed to patch {}", path.display()))?;

        if outcome.wrote() && config.verify {
            verify(path, &appender, batch)?;
        }

        files.push(FileReport {
            path: path.clone(),
            keys: batch.len(),
            outcome,
        });
    }

    let report = RunReport {
        manifest: manifest.name.clone(),
        started_at,
        dry_run: config.dry_run,
        files,
    };
    info!(
        manifest = %report.manifest,
        applied = report.applied(),
        skipped = report.skipped(),
        "Manifest done"
    );
    Ok(report)
}

fn verify(path: &Path, appender: &KeyAppender, batch: &InsertionBatch) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to re-read {}", path.display()))?;
    let content = appender.encoding().decode(path, &bytes)?;

    let report = CatalogValidator::validate(&content, batch);
    for warning in &report.warnings {
        warn!(path = %path.display(), "{}", warning);
    }
    if report.has_errors() {
        bail!(
            "{} failed validation after patching: {}",
            path.display(),
            report.errors.join("; ")
        );
    }
    Ok(())
}
