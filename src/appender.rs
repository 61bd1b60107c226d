//! Idempotent key appender.
//!
//! Appends an [`InsertionBatch`] to a catalog holding a single JSON object
//! literal, directly before its closing brace. The catalog is never parsed:
//! the only checks are the marker substring and the trailing `}`.

use crate::batch::InsertionBatch;
use crate::encoding::TextEncoding;
use crate::error::AppendError;
use atomic_write_file::AtomicWriteFile;
use encoding_rs::Encoding;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Whether a batch has been applied to some content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    NotApplied,
    Applied,
}

impl PatchState {
    pub fn detect(content: &str, batch: &InsertionBatch) -> Self {
        if batch.marker().is_present_in(content) {
            PatchState::Applied
        } else {
            PatchState::NotApplied
        }
    }
}

/// Result of patching content in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patched {
    Unchanged,
    Updated(String),
}

/// Result of applying a batch to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied { bytes_written: usize },
    AlreadyApplied,
    /// Dry run: the batch would have been applied.
    WouldApply,
}

impl ApplyOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Insert `batch` before the closing brace of `content`.
///
/// `path` is only used to label errors.
pub fn patch_content(
    path: &Path,
    content: &str,
    batch: &InsertionBatch,
) -> Result<Patched, AppendError> {
    if PatchState::detect(content, batch) == PatchState::Applied {
        return Ok(Patched::Unchanged);
    }

    let body = content
        .trim_end()
        .strip_suffix('}')
        .ok_or_else(|| AppendError::MissingClosingBrace {
            path: path.to_path_buf(),
        })?;

    let lines = batch.lines().join("\n");
    let mut updated = String::with_capacity(body.len() + lines.len() + 8);

    // The comma joins the last existing member; an empty object has none.
    let open = body.trim_end();
    updated.push_str(open);
    if open.ends_with('{') {
        updated.push('\n');
    } else {
        updated.push_str(",\n");
    }
    updated.push_str(&lines);
    updated.push_str("\n}\n");

    Ok(Patched::Updated(updated))
}

/// Applies insertion batches to files in a fixed encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyAppender {
    encoding: TextEncoding,
    dry_run: bool,
}

impl KeyAppender {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            dry_run: false,
        }
    }

    /// Report what would change without writing anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Apply `batch` to the file at `path`.
    ///
    /// The file is read once and, unless the marker is already present, the
    /// whole content is replaced in one atomic rename. Nothing is written
    /// when the precondition fails.
    pub fn apply(&self, path: &Path, batch: &InsertionBatch) -> Result<ApplyOutcome, AppendError> {
        let bytes = std::fs::read(path).map_err(|e| AppendError::io(path, e))?;
        let content = self.encoding.decode(path, &bytes)?;

        let updated = match patch_content(path, &content, batch)? {
            Patched::Unchanged => {
                debug!(
                    path = %path.display(),
                    marker = %batch.marker(),
                    "Marker already present, skipping"
                );
                return Ok(ApplyOutcome::AlreadyApplied);
            }
            Patched::Updated(updated) => updated,
        };

        let encoded = self.encoding.encode(&updated)?;

        // Latin-1 passes UTF-8 catalogs through untouched, but non-ASCII batch
        // text would land as single bytes inside them.
        if self.encoding == TextEncoding::Latin1
            && is_utf8(&bytes)
            && !is_utf8(&encoded)
        {
            return Err(AppendError::BreaksUtf8 {
                path: path.to_path_buf(),
            });
        }

        if self.dry_run {
            info!(
                path = %path.display(),
                keys = batch.len(),
                "Dry run: would append keys"
            );
            return Ok(ApplyOutcome::WouldApply);
        }

        write_whole_file(path, &encoded)?;
        info!(
            path = %path.display(),
            keys = batch.len(),
            encoding = %self.encoding,
            "Appended keys"
        );

        Ok(ApplyOutcome::Applied {
            bytes_written: encoded.len(),
        })
    }
}

/// Apply `batch` to `path`, reading and writing with `encoding`.
pub fn apply(
    path: &Path,
    batch: &InsertionBatch,
    encoding: TextEncoding,
) -> Result<ApplyOutcome, AppendError> {
    KeyAppender::new(encoding).apply(path, batch)
}

fn is_utf8(bytes: &[u8]) -> bool {
    Encoding::utf8_valid_up_to(bytes) == bytes.len()
}

fn write_whole_file(path: &Path, bytes: &[u8]) -> Result<(), AppendError> {
    let mut file = AtomicWriteFile::open(path).map_err(|e| AppendError::io(path, e))?;
    file.write_all(bytes).map_err(|e| AppendError::io(path, e))?;
    file.commit().map_err(|e| AppendError::io(path, e))
}
