//! Geometric preprocessing: center square, resize, center crop, NHWC `u8` tensor.

pub mod filter;
pub mod geometry;

use std::borrow::Cow;

use image::{imageops, RgbImage};
use lumen_core::{DecodedImage, LumenError, LumenResult, PreprocessedTensor, Size};
use tracing::debug;

pub use filter::ResizeFilter;
pub use geometry::{center_crop_window, center_square, CropWindow, PreprocessPlan};

/// Fixed-geometry preprocessor. Construction validates the sizes, so
/// `apply` can only fail on an empty input image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preprocessor {
    target_size: Size,
    crop_size: Size,
    filter: ResizeFilter,
}

impl Preprocessor {
    /// Fails with `InvalidCropConfiguration` when `crop_size` exceeds
    /// `target_size` in either dimension or either size is empty.
    pub fn new(target_size: Size, crop_size: Size, filter: ResizeFilter) -> LumenResult<Self> {
        if target_size.is_empty() || crop_size.is_empty() || !target_size.contains(crop_size) {
            return Err(LumenError::InvalidCropConfiguration {
                target: target_size,
                crop: crop_size,
            });
        }
        Ok(Self {
            target_size,
            crop_size,
            filter,
        })
    }

    pub fn target_size(&self) -> Size {
        self.target_size
    }

    pub fn crop_size(&self) -> Size {
        self.crop_size
    }

    pub fn filter(&self) -> ResizeFilter {
        self.filter
    }

    /// Windows used for an image of size `source`.
    pub fn plan(&self, source: Size) -> LumenResult<PreprocessPlan> {
        if source.is_empty() {
            return Err(LumenError::InvalidPipelineConfiguration(format!(
                "cannot preprocess an empty {source} image"
            )));
        }
        let final_crop = center_crop_window(self.target_size, self.crop_size).ok_or(
            LumenError::InvalidCropConfiguration {
                target: self.target_size,
                crop: self.crop_size,
            },
        )?;
        Ok(PreprocessPlan {
            source,
            square: center_square(source),
            resized: self.target_size,
            final_crop,
        })
    }

    /// Run the full geometry and produce a `(1, crop.height, crop.width, 3)` tensor.
    pub fn apply(&self, image: &DecodedImage) -> LumenResult<PreprocessedTensor> {
        let plan = self.plan(image.size())?;
        debug!(
            source = %plan.source,
            square = ?plan.square.bounds(),
            resized = %plan.resized,
            final_crop = ?plan.final_crop.bounds(),
            filter = %self.filter,
            "preprocessing image"
        );

        let square = crop(image.pixels(), plan.square);
        let resized = if square.dimensions() == (plan.resized.width, plan.resized.height) {
            square
        } else {
            Cow::Owned(imageops::resize(
                square.as_ref(),
                plan.resized.width,
                plan.resized.height,
                self.filter.filter_type(),
            ))
        };
        let cropped = crop(resized.as_ref(), plan.final_crop).into_owned();

        let (width, height) = cropped.dimensions();
        PreprocessedTensor::from_hwc(height as usize, width as usize, cropped.into_raw()).ok_or_else(
            || {
                LumenError::InvalidPipelineConfiguration(format!(
                    "preprocessed buffer does not match {width}x{height}x3"
                ))
            },
        )
    }
}

/// Preprocess `image` with the default (bicubic) filter.
pub fn preprocess(
    image: &DecodedImage,
    target_size: Size,
    crop_size: Size,
) -> LumenResult<PreprocessedTensor> {
    Preprocessor::new(target_size, crop_size, ResizeFilter::default())?.apply(image)
}

fn crop(pixels: &RgbImage, window: CropWindow) -> Cow<'_, RgbImage> {
    let (width, height) = pixels.dimensions();
    if window.covers(Size::new(width, height)) {
        return Cow::Borrowed(pixels);
    }
    Cow::Owned(
        imageops::crop_imm(pixels, window.x, window.y, window.width, window.height).to_image(),
    )
}
