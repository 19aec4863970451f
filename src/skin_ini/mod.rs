//! `skin.ini` rewriting
//!
//! Registers the hitcircle overlap in the `[Fonts]` section while leaving
//! every other byte of the file, including its encoding and BOM, alone.

mod document;
mod encoding;
mod patch;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use document::IniDocument;
pub use encoding::TextEncoding;
pub use patch::{IniPatch, PatchOutcome, Placement};

/// Fixed configuration file name inside a skin directory
pub const SKIN_INI: &str = "skin.ini";

/// Errors from reading or writing `skin.ini`
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IniError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Key or anchor name produced an unusable pattern
    #[error("invalid key pattern: {0}")]
    Pattern(String),
}

/// Patch `skin.ini` in `skin_dir`, creating it if absent.
pub fn patch_skin_ini(skin_dir: &Path, patch: &IniPatch) -> Result<PatchOutcome, IniError> {
    let path = skin_dir.join(SKIN_INI);
    let mut doc = IniDocument::read(&path)?;
    let outcome = patch.apply(&mut doc)?;
    log::debug!(
        "{}: {:?}, removed {} stale '{}' line(s), placed {:?}",
        path.display(),
        doc.encoding,
        outcome.removed,
        patch.key,
        outcome.placement
    );
    doc.write(&path)?;
    Ok(outcome)
}
