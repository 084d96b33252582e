//! Decoded pixel grids and the sizes used to describe them.

use std::fmt;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{LumenError, LumenResult};

/// A `(width, height)` pair. Serialized as `[width, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Square of side `side`.
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// True when `other` fits inside `self` in both dimensions.
    pub fn contains(&self, other: Size) -> bool {
        other.width <= self.width && other.height <= self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<[u32; 2]> for Size {
    fn from([width, height]: [u32; 2]) -> Self {
        Self::new(width, height)
    }
}

impl From<Size> for [u32; 2] {
    fn from(size: Size) -> Self {
        [size.width, size.height]
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// RGB image with 8-bit channels, immutable once decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pixels: RgbImage,
}

impl DecodedImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Build an image from packed RGB bytes, row-major.
    ///
    /// Returns `None` when `data` does not hold exactly `width * height * 3` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Decode the file at `path` into an RGB pixel grid.
///
/// The format is sniffed from the file contents, not the extension. Any
/// format the `image` crate was built with is accepted; alpha and palette
/// images are flattened to RGB.
pub fn decode_image(path: impl AsRef<Path>) -> LumenResult<DecodedImage> {
    let path = path.as_ref();
    let decoded = read_guessed(path).map_err(|source| LumenError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DecodedImage::new(decoded.to_rgb8()))
}

fn read_guessed(path: &Path) -> Result<DynamicImage, ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.decode()
}
