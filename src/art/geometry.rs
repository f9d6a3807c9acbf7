//! Proportional crop geometry for card scans.
//!
//! The illustration on a scan occupies a fixed fraction of the card:
//!
//! ```text
//!   ┌──────────── W ────────────┐
//!   │   offset = 1.5 · margin   │
//!   │ m ┌───────────────────┐ m │
//!   │   │    ┌─────────┐    │   │   art rectangle: 0.76·W × 0.42·H
//!   │   │    │ square  │    │   │   square: side = art height,
//!   │   │    └─────────┘    │   │           centered horizontally
//!   │   └───────────────────┘   │
//!   │                           │
//!   └───────────────────────────┘
//! ```
//!
//! The vertical offset is a layout constant of this scan format, not
//! something derivable from the other ratios.

use crate::core::{PrepError, PrepResult};

/// Art width as a fraction of scan width.
pub const ART_WIDTH_RATIO: f64 = 0.76;
/// Art height as a fraction of scan height.
pub const ART_HEIGHT_RATIO: f64 = 0.42;
/// Top offset as a multiple of the horizontal margin.
pub const TOP_OFFSET_FACTOR: f64 = 1.5;

/// Axis-aligned rectangle in source-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Integer crop box in scan pixel space.
///
/// May start left of or above the scan and may extend past its far edges;
/// the cropper fills the uncovered part with black.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl PixelBox {
    /// Whether the box lies entirely inside a `width × height` image.
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + i64::from(self.width) <= i64::from(width)
            && self.y + i64::from(self.height) <= i64::from(height)
    }
}

/// Art and square-crop rectangles for one scan size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArtGeometry {
    /// Full art rectangle.
    pub art: Rect,
    /// Square of side `art.height`, centered horizontally on the art.
    pub square: Rect,
}

impl ArtGeometry {
    /// Compute the crop geometry for a `width × height` scan.
    ///
    /// The rectangles follow the ratios for any aspect ratio, even when they
    /// reach outside the scan. Fails only for an empty scan or a square that
    /// rounds to no pixels.
    pub fn for_size(width: u32, height: u32) -> PrepResult<Self> {
        let invalid = |reason| PrepError::InvalidGeometry {
            width,
            height,
            reason,
        };
        if width == 0 || height == 0 {
            return Err(invalid("image has no pixels"));
        }

        let w = f64::from(width);
        let h = f64::from(height);
        let art_width = w * ART_WIDTH_RATIO;
        let art_height = h * ART_HEIGHT_RATIO;
        let margin = (w - art_width) / 2.0;
        let art = Rect {
            x: margin,
            y: margin * TOP_OFFSET_FACTOR,
            width: art_width,
            height: art_height,
        };

        // Negative when the art is taller than wide
        let inset = (art_width - art_height) / 2.0;
        let square = Rect {
            x: art.x + inset,
            y: art.y,
            width: art_height,
            height: art_height,
        };

        let geometry = Self { art, square };
        let px = geometry.pixel_box();
        if px.width == 0 || px.height == 0 {
            return Err(invalid("art square rounds to zero pixels"));
        }
        Ok(geometry)
    }

    /// Horizontal margin on each side of the art rectangle.
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.art.x
    }

    /// The square crop with each edge rounded half away from zero.
    #[must_use]
    pub fn pixel_box(&self) -> PixelBox {
        let x0 = round_px(self.square.x);
        let y0 = round_px(self.square.y);
        let x1 = round_px(self.square.right());
        let y1 = round_px(self.square.bottom());
        PixelBox {
            x: x0,
            y: y0,
            width: span(x0, x1),
            height: span(y0, y1),
        }
    }
}

fn round_px(value: f64) -> i64 {
    // Scan sizes are u32, so every edge fits in i64.
    value.round() as i64
}

fn span(start: i64, end: i64) -> u32 {
    u32::try_from(end - start).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_standard_scan_geometry() {
        // 223x310 is the common scan size of the dataset
        let geometry = ArtGeometry::for_size(223, 310).unwrap();

        assert!(approx(geometry.art.width, 223.0 * 0.76));
        assert!(approx(geometry.art.height, 310.0 * 0.42));
        assert!(approx(geometry.margin(), (223.0 - 223.0 * 0.76) / 2.0));
        assert!(approx(geometry.art.y, geometry.margin() * 1.5));
        assert!(approx(geometry.square.width, geometry.art.height));
        assert!(approx(geometry.square.height, geometry.art.height));
    }

    #[test]
    fn test_square_is_centered_in_art() {
        let geometry = ArtGeometry::for_size(480, 680).unwrap();
        let left_gap = geometry.square.x - geometry.art.x;
        let right_gap = geometry.art.right() - geometry.square.right();
        assert!(approx(left_gap, right_gap));
    }

    #[test]
    fn test_pixel_box_rounding() {
        let geometry = ArtGeometry::for_size(100, 140).unwrap();
        // margin 12, offset 18, art 76 x 58.8, inset 8.6
        let px = geometry.pixel_box();
        assert_eq!(px.x, 21); // 20.6
        assert_eq!(px.y, 18);
        assert_eq!(px.width, 58); // 79.4 -> 79, minus 21
        assert_eq!(px.height, 59); // 76.8 -> 77, minus 18
    }

    #[test]
    fn test_tall_scan_square_overhangs_sides() {
        // art 38 x 168: the square is wider than the art and the scan
        let geometry = ArtGeometry::for_size(50, 400).unwrap();
        let px = geometry.pixel_box();

        assert!(approx(geometry.square.width, 168.0));
        assert!(px.x < 0);
        assert_eq!(px.width, 168);
        assert!(!px.fits_within(50, 400));
    }

    #[test]
    fn test_wide_scan_art_runs_past_bottom() {
        // offset 0.18 W puts the art below a short scan
        let geometry = ArtGeometry::for_size(1000, 100).unwrap();
        let px = geometry.pixel_box();

        assert!(geometry.art.bottom() > 100.0);
        assert_eq!(px.y, 180);
        assert!(!px.fits_within(1000, 100));
    }

    #[test]
    fn test_standard_scan_fits() {
        let px = ArtGeometry::for_size(223, 310).unwrap().pixel_box();
        assert!(px.fits_within(223, 310));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        assert!(ArtGeometry::for_size(0, 10).is_err());
        assert!(ArtGeometry::for_size(10, 0).is_err());
        // square rounds to a zero-width box
        assert!(ArtGeometry::for_size(2, 1).is_err());
    }
}
