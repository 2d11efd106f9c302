//! Flattened export of open images, singly or as a cancellable batch.
//!
//! Batch output files are named `{order}_modified_{stem}.{ext}` where `order`
//! is the 1-based position in the caller's chosen order. A failure is recorded
//! and the batch moves on; cancelling stops before the next file and leaves
//! files already written in place. An output directory that cannot be created
//! fails the whole batch before anything is exported.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use markcrop_raster::RasterError;
use thiserror::Error;
use web_time::Instant;

use crate::codec::{CodecError, ExportFormat, ImageCodec};
use crate::session::FileSlot;

/// Errors from exporting one image.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Flattening failed
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Encoding or writing failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Batch order names a slot that is not open
    #[error("No image at index {index} ({len} open)")]
    NoSuchSlot { index: usize, len: usize },
}

/// Reported before each file of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// Files handled so far
    pub done: usize,
    pub total: usize,
    /// Source path of the file about to be exported
    pub current: PathBuf,
}

/// One file that could not be exported.
#[derive(Debug)]
pub struct BatchFailure {
    pub source: PathBuf,
    pub error: ExportError,
}

/// Outcome of a batch export.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Written files, in batch order
    pub exported: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
    /// Stopped by the progress callback before finishing
    pub cancelled: bool,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

/// Batch file name for the `order`-th (1-based) exported image.
pub fn export_file_name(order: usize, source: &Path, format: ExportFormat) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{}_modified_{}.{}", order, stem, format.extension())
}

/// Flatten `slot` and write it to `path`.
pub fn export_slot(
    slot: &FileSlot,
    path: &Path,
    format: ExportFormat,
    codec: &dyn ImageCodec,
) -> Result<(), ExportError> {
    let composite = slot.flatten()?;
    codec.encode(&composite, path, format)?;
    log::info!(
        "Exported {:?} -> {:?} ({}, {} shapes)",
        slot.path(),
        path,
        format,
        slot.shapes().len()
    );
    Ok(())
}

/// Export `slots` in `order` (indices into `slots`) into `out_dir`.
///
/// `on_progress` runs before every file; returning `ControlFlow::Break`
/// cancels the rest of the batch.
pub fn run_batch(
    slots: &[FileSlot],
    order: &[usize],
    out_dir: &Path,
    format: ExportFormat,
    codec: &dyn ImageCodec,
    mut on_progress: impl FnMut(&BatchProgress) -> ControlFlow<()>,
) -> BatchReport {
    let started = Instant::now();
    let mut report = BatchReport::default();

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        log::warn!("Could not create output directory {:?}: {}", out_dir, e);
        report.failures.push(BatchFailure {
            source: out_dir.to_path_buf(),
            error: ExportError::Codec(CodecError::Io(e)),
        });
        return report;
    }

    for (position, &index) in order.iter().enumerate() {
        let Some(slot) = slots.get(index) else {
            log::warn!("Batch skips missing slot {}", index);
            report.failures.push(BatchFailure {
                source: PathBuf::new(),
                error: ExportError::NoSuchSlot {
                    index,
                    len: slots.len(),
                },
            });
            continue;
        };

        let progress = BatchProgress {
            done: position,
            total: order.len(),
            current: slot.path().to_path_buf(),
        };
        if on_progress(&progress).is_break() {
            log::info!("Batch export cancelled after {} files", position);
            report.cancelled = true;
            break;
        }

        let target = out_dir.join(export_file_name(position + 1, slot.path(), format));
        match export_slot(slot, &target, format, codec) {
            Ok(()) => report.exported.push(target),
            Err(error) => {
                log::warn!("Failed to export {:?}: {}", slot.path(), error);
                report.failures.push(BatchFailure {
                    source: slot.path().to_path_buf(),
                    error,
                });
            }
        }
    }

    log::info!(
        "Batch export: {} written, {} failed in {:?}",
        report.exported.len(),
        report.failures.len(),
        started.elapsed()
    );
    report
}
