//! Helpers for exercising Lumen without a real model or image files.

pub mod images;
pub mod session;

pub use images::{checkerboard_image, gradient_image, write_png};
pub use session::{MockSession, RecordedCall};
