use std::path::Path;

use image::{Rgb, RgbImage};
use lumen_core::DecodedImage;

/// Pixel `(x, y)` holds `[x, y, x + y]`, each wrapped to `u8`.
pub fn gradient_image(width: u32, height: u32) -> DecodedImage {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DecodedImage::new(pixels)
}

/// Black and white squares of side `cell`.
pub fn checkerboard_image(width: u32, height: u32, cell: u32) -> DecodedImage {
    let cell = cell.max(1);
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    DecodedImage::new(pixels)
}

/// Save `image` as a PNG so decode paths can be driven from disk.
pub fn write_png(path: impl AsRef<Path>, image: &DecodedImage) -> image::ImageResult<()> {
    image.pixels().save(path)
}
