//! End-to-end processing of one skin directory
//!
//! Order matters and is fixed here: optional copy, hi-res cleanup,
//! compositing, `skin.ini` patch, then the optional forced overlay pass
//! (which must see the overlay only after compositing has used it).

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compositor::{delete_hires_assets, CompositeError, Compositor};
use crate::config::StackConfig;
use crate::notify::{Notice, Notifier};
use crate::options::ProcessOptions;
use crate::report::{AssetOutcome, BatchReport};
use crate::skin_ini::{patch_skin_ini, IniError, IniPatch, SKIN_INI};
use crate::workdir::{copy_destination, copy_dir_all};

/// Errors that abort a processing run
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StackError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot derive a copy name from {}", .0.display())]
    NoCopyName(PathBuf),
    #[error("cannot resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Composite(#[from] CompositeError),
    #[error(transparent)]
    Ini(#[from] IniError),
}

/// Copy `dir` to its unique `@3xStack` sibling and return the copy's path.
///
/// `dir` is resolved first, so `.` and `skin/..` name a real folder.
pub fn make_working_copy(dir: &Path, suffix: &str) -> Result<PathBuf, StackError> {
    let dir = fs::canonicalize(dir)
        .map_err(|source| StackError::Resolve { path: dir.to_path_buf(), source })?;
    let to = copy_destination(&dir, suffix).ok_or_else(|| StackError::NoCopyName(dir.clone()))?;
    copy_dir_all(&dir, &to).map_err(|source| StackError::Copy {
        from: dir.clone(),
        to: to.clone(),
        source,
    })?;
    Ok(to)
}

/// Run every step against `dir`.
///
/// A missing overlay stops compositing but the `skin.ini` patch still runs;
/// the returned report is then marked aborted.
pub fn process(
    dir: &Path,
    config: &StackConfig,
    options: ProcessOptions,
    notifier: &dyn Notifier,
) -> Result<BatchReport, StackError> {
    if !dir.is_dir() {
        return Err(StackError::NotADirectory(dir.to_path_buf()));
    }

    let dir = if options.create_copy {
        let copy = make_working_copy(dir, &config.skin.copy_suffix)?;
        notifier.notify(Notice::info("Copy created", copy.display().to_string()));
        copy
    } else {
        dir.to_path_buf()
    };

    let mut report = BatchReport::new();
    report.directory = Some(dir.display().to_string());

    let deleted = delete_hires_assets(&dir, &config.skin.hires_marker, &mut report)?;
    if !deleted.is_empty() {
        notifier.notify(Notice::info(
            format!("Deleted {} assets", config.skin.hires_marker.trim_start_matches('@')),
            deleted.join("\n"),
        ));
    }

    let compositor = Compositor::new(&dir, config, options);
    match compositor.composite_all(&mut report, notifier) {
        Ok(()) => {}
        Err(e @ CompositeError::MissingOverlay(_)) => {
            notifier.notify(Notice::error("Compositing stopped", e.to_string()));
            report.aborted = Some(e.to_string());
        }
        Err(e) => return Err(e.into()),
    }

    let outcome = patch_skin_ini(&dir, &IniPatch::hit_circle_overlap(config.ini.overlap.as_str()))?;
    log::info!("{} patched ({} stale line(s) removed)", SKIN_INI, outcome.removed);
    report.record(SKIN_INI, AssetOutcome::Success);

    if options.force_overlay {
        report.record(config.skin.overlay.clone(), compositor.force_overlay_resolution());
    }

    if report.has_failures() {
        notifier.notify(Notice::warning("Complete", "Finished with errors."));
    } else {
        notifier.notify(Notice::info("Complete", "Done!"));
    }
    Ok(report)
}
