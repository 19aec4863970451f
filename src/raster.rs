//! Image loading, saving and the two pixel operations compositing needs

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Failure to load or save a sprite
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Open an image and convert it to 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, RasterError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Save an RGBA image, format chosen by the path's extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), RasterError> {
    image.save(path)?;
    Ok(())
}

/// Resize with nearest-neighbor sampling.
///
/// This preserves crisp pixel edges. Returns a plain copy when the image
/// already has the requested size.
pub fn resize_nearest(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    image::imageops::resize(image, width, height, FilterType::Nearest)
}

/// Offset that centers `inner` within `outer`, rounded toward negative
/// infinity. Negative when `inner` is larger.
pub fn centered_offset(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2)
}

/// Allocate a fully transparent canvas.
pub fn transparent_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}

/// Copy `top` onto `bottom` at (x, y), replacing pixels including alpha.
/// Parts falling outside `bottom` are clipped.
pub fn paste(bottom: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    image::imageops::replace(bottom, top, x, y);
}

/// Blend `top` onto `bottom` at (x, y) using `top`'s alpha as the mask.
///
/// Every channel, alpha included, becomes
/// `bottom * (255 - a) / 255 + top * a / 255` (rounded), so a fully
/// transparent mask pixel leaves `bottom` untouched and an opaque one
/// replaces it.
pub fn paste_masked(bottom: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (bw, bh) = (i64::from(bottom.width()), i64::from(bottom.height()));

    for (tx, ty, src) in top.enumerate_pixels() {
        let dx = x + i64::from(tx);
        let dy = y + i64::from(ty);
        if dx < 0 || dy < 0 || dx >= bw || dy >= bh {
            continue;
        }

        let mask = u32::from(src[3]);
        if mask == 0 {
            continue;
        }

        let dst = bottom.get_pixel_mut(dx as u32, dy as u32);
        for c in 0..4 {
            dst[c] = blend_channel(dst[c], src[c], mask);
        }
    }
}

fn blend_channel(dst: u8, src: u8, mask: u32) -> u8 {
    let v = u32::from(dst) * (255 - mask) + u32::from(src) * mask + 128;
    (((v >> 8) + v) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_offset_odd_difference() {
        assert_eq!(centered_offset(160, 99), 30);
        assert_eq!(centered_offset(160, 160), 0);
        assert_eq!(centered_offset(160, 201), -21);
    }

    #[test]
    fn test_paste_centered_leaves_transparent_border() {
        let mut canvas = transparent_canvas(160, 160);
        let sprite = RgbaImage::from_pixel(99, 99, Rgba([10, 20, 30, 255]));
        let offset = centered_offset(160, 99);
        paste(&mut canvas, &sprite, offset, offset);

        assert_eq!(canvas.get_pixel(29, 29)[3], 0);
        assert_eq!(*canvas.get_pixel(30, 30), Rgba([10, 20, 30, 255]));
        assert_eq!(*canvas.get_pixel(128, 128), Rgba([10, 20, 30, 255]));
        // 31 transparent columns on the far side
        assert_eq!(canvas.get_pixel(129, 129)[3], 0);
    }

    #[test]
    fn test_paste_clips_larger_sprite() {
        let mut canvas = transparent_canvas(4, 4);
        let mut sprite = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255]));
        sprite.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        paste(&mut canvas, &sprite, -1, -1);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_paste_replaces_with_transparency() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let clear = transparent_canvas(1, 1);
        paste(&mut canvas, &clear, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_paste_masked_extremes() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba([100, 100, 100, 255]));
        let mut top = RgbaImage::new(2, 1);
        top.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        top.put_pixel(1, 0, Rgba([255, 0, 0, 0]));
        paste_masked(&mut canvas, &top, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_paste_masked_half_alpha() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let top = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        paste_masked(&mut canvas, &top, 0, 0);
        // 255 * 128 / 255 = 128; alpha 128 * 128 / 255 = 64
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([128, 128, 128, 64]));
    }

    #[test]
    fn test_resize_nearest_keeps_hard_edges() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let scaled = resize_nearest(&image, 4, 2);
        assert_eq!(scaled.dimensions(), (4, 2));
        for px in scaled.pixels() {
            assert!(*px == Rgba([255, 0, 0, 255]) || *px == Rgba([0, 0, 255, 255]));
        }
    }

    #[test]
    fn test_load_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default-0.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, RasterError::Image(_)));
        assert!(err.to_string().starts_with("Image error: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}
