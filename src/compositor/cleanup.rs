//! Removal of redundant hi-res (`@2x`) asset variants

use std::fs;
use std::path::Path;

use super::CompositeError;
use crate::report::{AssetOutcome, BatchReport};

/// Delete every regular file in `dir` whose name contains `marker`,
/// compared case-insensitively. Subdirectories are never touched.
///
/// Individual deletions are best-effort: a failure is recorded in `report`
/// and the sweep continues. Returns the deleted names, sorted.
pub fn delete_hires_assets(
    dir: &Path,
    marker: &str,
    report: &mut BatchReport,
) -> Result<Vec<String>, CompositeError> {
    let list_err = |source| CompositeError::ListDir { path: dir.to_path_buf(), source };
    let marker = marker.to_lowercase();

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().contains(&marker) && entry.path().is_file() {
            candidates.push(name);
        }
    }
    candidates.sort();

    let mut deleted = Vec::new();
    for name in candidates {
        match fs::remove_file(dir.join(&name)) {
            Ok(()) => {
                log::debug!("deleted {}", name);
                deleted.push(name);
            }
            Err(e) => {
                log::warn!("could not delete {}: {}", name, e);
                report.record(name, AssetOutcome::FailedBestEffort(e.to_string()));
            }
        }
    }

    report.deleted.extend(deleted.iter().cloned());
    Ok(deleted)
}
