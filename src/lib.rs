//! Triple Stack Skin Maker - batch edits an osu! skin directory
//!
//! This library provides functionality to:
//! - Stack the hitcircle overlay onto the numbered and hitcircle sprites
//! - Remove redundant `@2x` assets
//! - Register `HitCircleOverlap` in `skin.ini`, preserving its encoding and BOM

pub mod cli;
pub mod compositor;
pub mod config;
pub mod notify;
pub mod options;
pub mod pipeline;
pub mod raster;
pub mod report;
pub mod skin_ini;
pub mod workdir;
