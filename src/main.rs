//! Apply patch manifests to the site's locale catalogs.
//!
//! Usage:
//!   locale-patch batches/not_found.json
//!   locale-patch --dry-run batches/*.json
//!
//! Optional environment variables:
//! - MESSAGES_DIR (defaults to messages)
//! - PATCH_DRY_RUN (defaults to false)
//! - PATCH_VERIFY (defaults to true)

use anyhow::{bail, Context, Result};
use locale_patch::{config::Config, manifest::PatchManifest, runner};
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_patch=info".parse()?),
        )
        .init();

    let mut config = Config::from_env()?;
    let mut manifests = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => config.dry_run = true,
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            path => manifests.push(PathBuf::from(path)),
        }
    }

    if manifests.is_empty() {
        bail!("Usage: locale-patch [--dry-run] <manifest.json>...");
    }

    info!(
        messages_dir = %config.messages_dir.display(),
        dry_run = config.dry_run,
        "Starting locale patch run"
    );

    for path in &manifests {
        let manifest = PatchManifest::from_file(path)?;
        let report = runner::run_manifest(&config, &manifest)
            .with_context(|| format!("Manifest {} failed", path.display()))?;

        for file in &report.files {
            info!("  {} -> {}", file.path.display(), serde_json::to_string(&file.outcome)?);
        }
    }

    info!("✓ All manifests processed");
    Ok(())
}
