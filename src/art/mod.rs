//! Card-art extraction.
//!
//! - `geometry`: where the illustration sits on a scan
//! - `cropper`: crop, resize, augment, write
//! - `variant`: augmented-copy naming (`flip_`, `blur_`, `blur_flip_`)

pub mod cropper;
pub mod geometry;
pub mod variant;

pub use cropper::{default_art_dir, survey_scan_sizes, ArtCropper, CropReport};
pub use geometry::{ArtGeometry, PixelBox, Rect};
pub use variant::ArtVariant;
