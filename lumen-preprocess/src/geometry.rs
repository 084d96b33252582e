//! Crop-window arithmetic, kept apart from pixel work so it can be checked directly.

use lumen_core::Size;
use serde::Serialize;

/// Rectangle inside an image, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `(left, top, right, bottom)`, right and bottom exclusive.
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// True when the window covers all of an image of size `outer`.
    pub fn covers(&self, outer: Size) -> bool {
        self.x == 0 && self.y == 0 && self.size() == outer
    }
}

/// Window of size `inner` centered in `outer`, offsets floor-divided.
///
/// Returns `None` when `inner` does not fit.
pub fn center_crop_window(outer: Size, inner: Size) -> Option<CropWindow> {
    if !outer.contains(inner) {
        return None;
    }
    Some(CropWindow {
        x: (outer.width - inner.width) / 2,
        y: (outer.height - inner.height) / 2,
        width: inner.width,
        height: inner.height,
    })
}

/// Largest centered square of an image of size `outer`.
pub fn center_square(outer: Size) -> CropWindow {
    let side = outer.width.min(outer.height);
    CropWindow {
        x: (outer.width - side) / 2,
        y: (outer.height - side) / 2,
        width: side,
        height: side,
    }
}

/// Both crop windows and the intermediate size for one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PreprocessPlan {
    pub source: Size,
    pub square: CropWindow,
    pub resized: Size,
    pub final_crop: CropWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_square_is_centered_horizontally() {
        let window = center_square(Size::new(300, 200));
        assert_eq!(window.bounds(), (50, 0, 250, 200));
    }

    #[test]
    fn portrait_square_is_centered_vertically() {
        let window = center_square(Size::new(120, 181));
        assert_eq!(window.bounds(), (0, 30, 120, 150));
    }

    #[test]
    fn square_input_needs_no_crop() {
        let outer = Size::square(64);
        assert!(center_square(outer).covers(outer));
    }

    #[test]
    fn odd_margins_round_down() {
        let window = center_crop_window(Size::new(5, 2), Size::new(2, 2)).unwrap();
        assert_eq!((window.x, window.y), (1, 0));
        let window = center_crop_window(Size::square(3), Size::square(2)).unwrap();
        assert_eq!((window.x, window.y), (0, 0));
    }

    #[test]
    fn final_window_for_imagenet_sizes() {
        let window = center_crop_window(Size::square(256), Size::square(224)).unwrap();
        assert_eq!(window.bounds(), (16, 16, 240, 240));
    }

    #[test]
    fn oversized_inner_window_is_rejected() {
        assert!(center_crop_window(Size::square(224), Size::new(256, 200)).is_none());
        assert!(center_crop_window(Size::square(224), Size::new(200, 256)).is_none());
    }
}
