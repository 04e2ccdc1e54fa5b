//! Tile binarization.
//!
//! The photo is split into a fixed number of horizontal strips and each
//! strip is binarized independently, which keeps local illumination
//! changes (shadows, flash falloff) from shifting a single global
//! threshold. Binarized output uses white foreground on black background,
//! so projection profiles respond directly to printed text.

use image::{imageops, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use tracing::debug;

/// Binarizes one horizontal strip of the receipt photo.
///
/// Implementations are stateless per strip. The output must keep the
/// strip's dimensions and use 255 for foreground (ink) pixels.
pub trait TileBinarizer {
    /// Binarizes a single strip.
    fn binarize(&self, tile: &GrayImage) -> GrayImage;
}

/// Per-strip Otsu thresholding with dark-foreground inversion.
///
/// Printed receipt text is dark on bright paper; pixels at or below the
/// Otsu level become white foreground. A strip with no intensity variation
/// has nothing to separate and binarizes to all background.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtsuTileBinarizer;

impl TileBinarizer for OtsuTileBinarizer {
    fn binarize(&self, tile: &GrayImage) -> GrayImage {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for pixel in tile.pixels() {
            min = min.min(pixel.0[0]);
            max = max.max(pixel.0[0]);
        }
        if min >= max {
            return GrayImage::new(tile.width(), tile.height());
        }
        let level = otsu_level(tile);
        GrayImage::from_fn(tile.width(), tile.height(), |x, y| {
            if tile.get_pixel(x, y).0[0] > level {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }
}

/// Splits `image` into `strip_count` horizontal strips, binarizes each
/// independently, and reassembles them at the original dimensions.
///
/// The last strip absorbs any remainder rows. A strip count larger than
/// the image height degenerates to one strip per row.
pub fn binarize_strips(
    image: &GrayImage,
    strip_count: u32,
    binarizer: &(impl TileBinarizer + ?Sized),
) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }
    let strips = strip_count.clamp(1, height);
    let strip_height = height / strips;

    let mut out = GrayImage::new(width, height);
    let mut y = 0u32;
    for index in 0..strips {
        let h = if index == strips - 1 {
            height - y
        } else {
            strip_height
        };
        let tile = imageops::crop_imm(image, 0, y, width, h).to_image();
        let binarized = binarizer.binarize(&tile);
        imageops::replace(&mut out, &binarized, 0, y as i64);
        y += h;
    }
    debug!(strips, width, height, "binarized image in strips");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn paper_with_ink_rows(width: u32, height: u32, rows: &[u32]) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([230u8]));
        for &y in rows {
            for x in 0..width {
                img.put_pixel(x, y, Luma([20u8]));
            }
        }
        img
    }

    #[test]
    fn test_dark_ink_becomes_white_foreground() {
        let img = paper_with_ink_rows(40, 16, &[5]);
        let out = binarize_strips(&img, 1, &OtsuTileBinarizer);
        assert_eq!(out.dimensions(), (40, 16));
        assert_eq!(out.get_pixel(0, 5).0[0], 255);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_uniform_strip_binarizes_to_background() {
        let img = GrayImage::from_pixel(30, 10, Luma([255u8]));
        let out = binarize_strips(&img, 2, &OtsuTileBinarizer);
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_strips_reassemble_to_original_dimensions() {
        // 8 strips over 37 rows: the last strip absorbs the remainder.
        let img = paper_with_ink_rows(20, 37, &[3, 18, 33]);
        let out = binarize_strips(&img, 8, &OtsuTileBinarizer);
        assert_eq!(out.dimensions(), (20, 37));
        assert_eq!(out.get_pixel(10, 33).0[0], 255);
    }

    #[test]
    fn test_strip_count_clamped_to_height() {
        let img = paper_with_ink_rows(20, 4, &[1]);
        let out = binarize_strips(&img, 100, &OtsuTileBinarizer);
        assert_eq!(out.dimensions(), (20, 4));
    }

    #[test]
    fn test_empty_image_passes_through() {
        let img = GrayImage::new(0, 0);
        let out = binarize_strips(&img, 8, &OtsuTileBinarizer);
        assert_eq!(out.dimensions(), (0, 0));
    }
}
