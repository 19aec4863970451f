//! Configuration schema types for `triplestack.toml`
//!
//! Every field is optional in the file; defaults match the stock osu! skin
//! layout the tool was written for.

use serde::{Deserialize, Serialize};

use crate::options::Resolution;

/// Skin directory layout: which files the tool touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkinConfig {
    /// Overlay image composited onto every sprite
    pub overlay: String,
    /// Distinguished sprite, composited at its own resolution
    pub hitcircle: String,
    /// Numbered sprites are `{sprite_prefix}{index}{sprite_suffix}`
    pub sprite_prefix: String,
    pub sprite_suffix: String,
    /// Indices `0..sprite_count` are tried
    pub sprite_count: u32,
    /// Files whose name contains this token (any case) are deleted
    pub hires_marker: String,
    /// Appended to the directory name when working on a copy
    pub copy_suffix: String,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            overlay: "hitcircleoverlay.png".to_string(),
            hitcircle: "hitcircle.png".to_string(),
            sprite_prefix: "default-".to_string(),
            sprite_suffix: ".png".to_string(),
            sprite_count: 11,
            hires_marker: "@2x".to_string(),
            copy_suffix: "@3xStack".to_string(),
        }
    }
}

impl SkinConfig {
    /// File name of numbered sprite `index`
    pub fn sprite_name(&self, index: u32) -> String {
        format!("{}{}{}", self.sprite_prefix, index, self.sprite_suffix)
    }
}

/// Pixel sizes used while compositing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizesConfig {
    /// Square canvas every numbered sprite is centered on
    pub canvas: u32,
    /// Square size the overlay is prepared at
    pub overlay: u32,
    /// Forced overlay size when the resolution is `native`
    pub forced_overlay: u32,
}

impl Default for SizesConfig {
    fn default() -> Self {
        Self { canvas: 160, overlay: 160, forced_overlay: 160 }
    }
}

/// `skin.ini` patch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IniConfig {
    /// Value written as `HitCircleOverlap`
    pub overlap: String,
}

impl Default for IniConfig {
    fn default() -> Self {
        Self { overlap: "160".to_string() }
    }
}

/// Defaults for the processing options, overridable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub copy: bool,
    pub resolution: Resolution,
    pub force_overlay: bool,
}

/// Root of `triplestack.toml`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    pub skin: SkinConfig,
    pub sizes: SizesConfig,
    pub ini: IniConfig,
    pub defaults: DefaultsConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "sizes.canvas")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "triplestack.toml: '{}' {}", self.field, self.message)
    }
}

impl StackConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: message.to_string(),
            })
        };

        for (field, value) in [
            ("sizes.canvas", self.sizes.canvas),
            ("sizes.overlay", self.sizes.overlay),
            ("sizes.forced_overlay", self.sizes.forced_overlay),
        ] {
            if value == 0 {
                push(field, "must be a positive integer");
            }
        }

        if self.ini.overlap.trim().is_empty() {
            push("ini.overlap", "must be a non-empty string");
        } else if self.ini.overlap.contains(['\r', '\n']) {
            push("ini.overlap", "must fit on a single line");
        }

        for (field, value) in [
            ("skin.overlay", &self.skin.overlay),
            ("skin.hitcircle", &self.skin.hitcircle),
            ("skin.hires_marker", &self.skin.hires_marker),
            ("skin.copy_suffix", &self.skin.copy_suffix),
        ] {
            if value.is_empty() {
                push(field, "must be a non-empty string");
            }
        }

        errors
    }
}
