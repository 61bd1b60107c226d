//! Idempotent patching of JSON locale catalogs.
//!
//! The core is [`appender`]: append a batch of member lines before a
//! catalog's closing brace unless its marker key is already there. The
//! remaining modules load batches from manifests and run them across the
//! site's locales.

pub mod appender;
pub mod batch;
pub mod config;
pub mod encoding;
pub mod error;
pub mod i18n;
pub mod manifest;
pub mod runner;

pub use appender::{apply, patch_content, ApplyOutcome, KeyAppender, PatchState, Patched};
pub use batch::{BatchEntry, InsertionBatch, MarkerKey};
pub use encoding::TextEncoding;
pub use error::AppendError;
