//! Overlay compositing for hitcircle sprites
//!
//! Stacks `hitcircleoverlay.png` onto the numbered `default-N.png` sprites
//! and onto `hitcircle.png`, writing each result back to the file it came
//! from. Also removes redundant hi-res variants and can force the overlay
//! file itself to a fixed resolution.

mod cleanup;

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

use crate::config::StackConfig;
use crate::notify::{Notice, Notifier};
use crate::options::ProcessOptions;
use crate::raster::{
    centered_offset, load_rgba, paste, paste_masked, resize_nearest, save_image,
    transparent_canvas, RasterError,
};
use crate::report::{AssetOutcome, BatchReport};

pub use cleanup::delete_hires_assets;

/// Errors that stop compositing altogether
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompositeError {
    /// The overlay every sprite depends on is absent
    #[error("Missing {}", .0.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())]
    MissingOverlay(PathBuf),
    /// The overlay exists but cannot be used
    #[error("failed to load overlay {}: {source}", path.display())]
    Overlay {
        path: PathBuf,
        #[source]
        source: RasterError,
    },
    /// Directory listing failed during hi-res cleanup
    #[error("failed to list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Composites the overlay onto every sprite of one skin directory
pub struct Compositor<'a> {
    dir: &'a Path,
    config: &'a StackConfig,
    options: ProcessOptions,
}

impl<'a> Compositor<'a> {
    pub fn new(dir: &'a Path, config: &'a StackConfig, options: ProcessOptions) -> Self {
        Self { dir, config, options }
    }

    fn overlay_path(&self) -> PathBuf {
        self.dir.join(&self.config.skin.overlay)
    }

    /// Load the overlay at the configured square size.
    pub fn prepare_overlay(&self) -> Result<RgbaImage, CompositeError> {
        let path = self.overlay_path();
        if !path.is_file() {
            return Err(CompositeError::MissingOverlay(path));
        }
        let overlay =
            load_rgba(&path).map_err(|source| CompositeError::Overlay { path: path.clone(), source })?;
        let size = self.config.sizes.overlay;
        Ok(resize_nearest(&overlay, size, size))
    }

    /// Composite all sprites, recording one outcome per candidate file.
    ///
    /// Fails only when the overlay is unusable. A failure on one sprite is
    /// recorded and the rest are still processed.
    pub fn composite_all(
        &self,
        report: &mut BatchReport,
        notifier: &dyn Notifier,
    ) -> Result<(), CompositeError> {
        let overlay = self.prepare_overlay()?;

        let mut found = 0;
        for index in 0..self.config.skin.sprite_count {
            let name = self.config.skin.sprite_name(index);
            let path = self.dir.join(&name);
            if !path.is_file() {
                report.record(name, AssetOutcome::SkippedOptional);
                continue;
            }
            found += 1;
            report.record(name, outcome_of(&path, self.composite_numbered(&path, &overlay)));
        }
        if found == 0 {
            notifier.notify(Notice::warning(
                "Numbered sprites",
                format!(
                    "No {}#{} found.",
                    self.config.skin.sprite_prefix, self.config.skin.sprite_suffix
                ),
            ));
        }

        let name = &self.config.skin.hitcircle;
        let path = self.dir.join(name);
        let outcome = if path.is_file() {
            outcome_of(&path, self.composite_hitcircle(&path, &overlay))
        } else {
            log::debug!("{} not present, skipping", path.display());
            AssetOutcome::SkippedOptional
        };
        report.record(name.clone(), outcome);

        Ok(())
    }

    /// Center a numbered sprite on the canvas, then stack the overlay on top.
    fn composite_numbered(&self, path: &Path, overlay: &RgbaImage) -> Result<(), RasterError> {
        let sprite = load_rgba(path)?;
        let size = self.config.sizes.canvas;
        let mut canvas = transparent_canvas(size, size);
        paste(
            &mut canvas,
            &sprite,
            centered_offset(size, sprite.width()),
            centered_offset(size, sprite.height()),
        );
        paste_masked(&mut canvas, overlay, 0, 0);
        save_image(&canvas, path)
    }

    /// Stack the overlay onto the hitcircle at the forced or native size.
    fn composite_hitcircle(&self, path: &Path, overlay: &RgbaImage) -> Result<(), RasterError> {
        let mut hitcircle = load_rgba(path)?;
        let fitted = match self.options.resolution.size() {
            Some(r) => {
                hitcircle = resize_nearest(&hitcircle, r, r);
                resize_nearest(overlay, r, r)
            }
            None => resize_nearest(overlay, hitcircle.width(), hitcircle.height()),
        };
        paste_masked(&mut hitcircle, &fitted, 0, 0);
        save_image(&hitcircle, path)
    }

    /// Rewrite the overlay file itself as a square of the forced resolution.
    ///
    /// Best-effort: decode and encode failures are reported, never raised.
    /// Must run after [`Compositor::composite_all`], which reads the overlay
    /// at its previous size.
    pub fn force_overlay_resolution(&self) -> AssetOutcome {
        let path = self.overlay_path();
        if !path.is_file() {
            return AssetOutcome::SkippedOptional;
        }
        let r = self.options.resolution.size().unwrap_or(self.config.sizes.forced_overlay);

        let result = load_rgba(&path).and_then(|overlay| {
            if overlay.dimensions() == (r, r) {
                return Ok(false);
            }
            save_image(&resize_nearest(&overlay, r, r), &path).map(|()| true)
        });
        match result {
            Ok(true) => AssetOutcome::Success,
            Ok(false) => AssetOutcome::Unchanged,
            Err(e) => {
                log::warn!("could not force {} to {}x{}: {}", path.display(), r, r, e);
                AssetOutcome::FailedBestEffort(e.to_string())
            }
        }
    }
}

fn outcome_of(path: &Path, result: Result<(), RasterError>) -> AssetOutcome {
    match result {
        Ok(()) => {
            log::debug!("composited {}", path.display());
            AssetOutcome::Success
        }
        Err(e) => {
            log::warn!("failed to composite {}: {}", path.display(), e);
            AssetOutcome::Failed(e.to_string())
        }
    }
}
