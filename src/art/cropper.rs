//! Art extraction from card scans.
//!
//! `ArtCropper` cuts the square illustration out of each scan, resizes it,
//! and writes it plus the configured augmented copies into an output
//! directory. Decode and encode failures abort the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, RgbImage};
use tracing::{debug, info};

use super::geometry::{ArtGeometry, PixelBox};
use super::variant::ArtVariant;
use crate::core::{CropConfig, PrepError, PrepResult, PrepRng};
use crate::dataset::filename::{file_name_of, list_files};

/// Directory name used for art when no output directory is given.
pub const DEFAULT_ART_DIR: &str = "art";

/// Sibling `art` directory of a scan directory.
#[must_use]
pub fn default_art_dir(scan_dir: &Path) -> PathBuf {
    scan_dir
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_ART_DIR)
}

/// Summary of one directory pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CropReport {
    /// Scans cropped.
    pub processed: usize,
    /// Scans left out by proportion sampling.
    pub sampled_out: usize,
    /// Every file written, in order.
    pub written: Vec<PathBuf>,
}

/// Cuts art out of card scans.
#[derive(Clone, Debug)]
pub struct ArtCropper {
    config: CropConfig,
}

impl ArtCropper {
    /// Create a cropper, validating the config.
    pub fn new(config: CropConfig) -> PrepResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Cut and resize the art square of one scan.
    ///
    /// Parts of the square outside the scan come out black.
    pub fn crop(&self, scan: &DynamicImage) -> PrepResult<DynamicImage> {
        let geometry = ArtGeometry::for_size(scan.width(), scan.height())?;
        let (width, height) = self.config.output_size();

        let art = cut_box(scan, geometry.pixel_box()).resize_exact(
            width,
            height,
            self.config.filter.into(),
        );

        Ok(if self.config.grayscale {
            DynamicImage::ImageLuma8(art.to_luma8())
        } else {
            DynamicImage::ImageRgb8(art.to_rgb8())
        })
    }

    /// The art plus its enabled augmented copies.
    ///
    /// The mirror gets the stronger blur radius; `BlurFlip` is produced only
    /// when both flipping and blurring are on.
    #[must_use]
    pub fn variants(&self, art: DynamicImage) -> Vec<(ArtVariant, DynamicImage)> {
        let flipped = self.config.flip.then(|| art.fliph());

        let mut out = Vec::with_capacity(4);
        if self.config.blur {
            out.push((ArtVariant::Blur, art.blur(self.config.blur_radius)));
            if let Some(flipped) = &flipped {
                out.push((
                    ArtVariant::BlurFlip,
                    flipped.blur(self.config.flip_blur_radius),
                ));
            }
        }
        if let Some(flipped) = flipped {
            out.push((ArtVariant::Flip, flipped));
        }
        out.insert(0, (ArtVariant::Original, art));
        out
    }

    /// Crop one scan and write its art files into `output_dir`.
    pub fn process_file(&self, scan_path: &Path, output_dir: &Path) -> PrepResult<Vec<PathBuf>> {
        let scan = image::open(scan_path).map_err(|e| PrepError::image(scan_path, e))?;
        let scan_name = file_name_of(scan_path);

        let art = self.crop(&scan)?;
        let mut written = Vec::new();
        for (variant, image) in self.variants(art) {
            let path = output_dir.join(variant.file_name(scan_name));
            image.save(&path).map_err(|e| PrepError::image(&path, e))?;
            written.push(path);
        }
        debug!("Cropped {} into {} files", scan_name, written.len());
        Ok(written)
    }

    /// Crop every scan in `scan_dir` into `output_dir`.
    ///
    /// Scans are visited in sorted order; each one is kept with probability
    /// `proportion`, drawn from `rng`. The output directory is created if
    /// needed.
    pub fn process_dir(
        &self,
        scan_dir: &Path,
        output_dir: &Path,
        rng: &mut PrepRng,
    ) -> PrepResult<CropReport> {
        std::fs::create_dir_all(output_dir).map_err(|e| PrepError::io(output_dir, e))?;

        let scans = list_files(scan_dir)?;
        let total = scans.len();
        info!(
            "Generating card art: {} scans from {} into {}",
            total,
            scan_dir.display(),
            output_dir.display()
        );

        let mut report = CropReport::default();
        let mut last_decile = 0;
        for (index, scan_path) in scans.iter().enumerate() {
            if rng.gen_bool(self.config.proportion) {
                let written = self.process_file(scan_path, output_dir)?;
                report.processed += 1;
                report.written.extend(written);
            } else {
                report.sampled_out += 1;
            }

            let decile = (index + 1) * 10 / total;
            if decile > last_decile {
                last_decile = decile;
                info!("Percent done: {}%", decile * 10);
            }
        }

        info!(
            "Done: {} scans cropped, {} files written",
            report.processed,
            report.written.len()
        );
        Ok(report)
    }
}

/// Copy `px` out of `scan`, padding with black where it leaves the scan.
fn cut_box(scan: &DynamicImage, px: PixelBox) -> DynamicImage {
    if px.fits_within(scan.width(), scan.height()) {
        // Both offsets are non-negative and inside the scan here
        return scan.crop_imm(px.x as u32, px.y as u32, px.width, px.height);
    }

    debug!(
        "Crop box {:?} leaves the {}x{} scan; padding",
        px,
        scan.width(),
        scan.height()
    );
    let mut canvas = RgbImage::new(px.width, px.height);
    imageops::overlay(&mut canvas, &scan.to_rgb8(), -px.x, -px.y);
    DynamicImage::ImageRgb8(canvas)
}

/// Distinct scan widths mapped to the height of the first scan seen at
/// that width.
///
/// Reads only image headers.
pub fn survey_scan_sizes(scan_dir: &Path) -> PrepResult<BTreeMap<u32, u32>> {
    let mut sizes = BTreeMap::new();
    for path in list_files(scan_dir)? {
        let (width, height) =
            image::image_dimensions(&path).map_err(|e| PrepError::image(&path, e))?;
        if !sizes.contains_key(&width) {
            debug!("{}: {}x{}", file_name_of(&path), width, height);
            sizes.insert(width, height);
        }
    }
    Ok(sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResampleFilter;
    use image::Rgb;

    /// Scan whose art square is solid red and everything else white.
    fn synthetic_scan(width: u32, height: u32) -> DynamicImage {
        let geometry = ArtGeometry::for_size(width, height).unwrap();
        let px = geometry.pixel_box();
        let image = RgbImage::from_fn(width, height, |x, y| {
            let (x, y) = (i64::from(x), i64::from(y));
            let inside = x >= px.x
                && x < px.x + i64::from(px.width)
                && y >= px.y
                && y < px.y + i64::from(px.height);
            if inside {
                Rgb([255, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn test_crop_output_size() {
        let cropper = ArtCropper::new(CropConfig::default().with_size(32, 24)).unwrap();
        let art = cropper.crop(&synthetic_scan(223, 310)).unwrap();

        assert_eq!((art.width(), art.height()), (32, 24));
    }

    #[test]
    fn test_crop_keeps_only_art() {
        let config = CropConfig {
            filter: ResampleFilter::Nearest,
            ..CropConfig::default()
        };
        let cropper = ArtCropper::new(config).unwrap();
        let art = cropper.crop(&synthetic_scan(223, 310)).unwrap().to_rgb8();

        assert!(art.pixels().all(|p| p.0 == [255, 0, 0]));
    }

    #[test]
    fn test_tall_scan_is_padded_black() {
        // 50x400: the 168px square overhangs both sides of the scan
        let config = CropConfig {
            filter: ResampleFilter::Nearest,
            ..CropConfig::default().with_size(168, 168)
        };
        let cropper = ArtCropper::new(config).unwrap();
        let scan = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 400, Rgb([255, 255, 255])));
        let art = cropper.crop(&scan).unwrap().to_rgb8();

        assert_eq!(art.dimensions(), (168, 168));
        assert_eq!(art.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(art.get_pixel(167, 100).0, [0, 0, 0]);
        // box starts at x = -59, so scan column 0 lands at 59
        assert_eq!(art.get_pixel(59, 10).0, [255, 255, 255]);
        assert_eq!(art.get_pixel(108, 10).0, [255, 255, 255]);
        assert_eq!(art.get_pixel(109, 10).0, [0, 0, 0]);
    }

    #[test]
    fn test_short_scan_is_padded_below() {
        // 1000x100: the box starts at y = 180, entirely below the scan
        let cropper = ArtCropper::new(CropConfig::default()).unwrap();
        let scan = DynamicImage::ImageRgb8(RgbImage::from_pixel(1000, 100, Rgb([90, 90, 90])));
        let art = cropper.crop(&scan).unwrap().to_rgb8();

        assert!(art.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_grayscale_has_one_channel() {
        let cropper = ArtCropper::new(CropConfig::default().with_grayscale(true)).unwrap();
        let art = cropper.crop(&synthetic_scan(223, 310)).unwrap();

        assert_eq!(art.color().channel_count(), 1);
    }

    #[test]
    fn test_variants_follow_config() {
        let art = DynamicImage::ImageRgb8(RgbImage::new(8, 8));

        let all = ArtCropper::new(CropConfig::default()).unwrap();
        let kinds: Vec<_> = all.variants(art.clone()).into_iter().map(|(v, _)| v).collect();
        assert_eq!(
            kinds,
            vec![
                ArtVariant::Original,
                ArtVariant::Blur,
                ArtVariant::BlurFlip,
                ArtVariant::Flip
            ]
        );

        let blur_only =
            ArtCropper::new(CropConfig::default().with_variants(false, true)).unwrap();
        let kinds: Vec<_> = blur_only.variants(art.clone()).into_iter().map(|(v, _)| v).collect();
        assert_eq!(kinds, vec![ArtVariant::Original, ArtVariant::Blur]);

        let none = ArtCropper::new(CropConfig::default().with_variants(false, false)).unwrap();
        assert_eq!(none.variants(art).len(), 1);
    }

    #[test]
    fn test_flip_mirrors_pixels() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([10, 0, 0]));
        image.put_pixel(1, 0, Rgb([20, 0, 0]));

        let cropper = ArtCropper::new(CropConfig::default().with_variants(true, false)).unwrap();
        let variants = cropper.variants(DynamicImage::ImageRgb8(image));
        let (_, flipped) = variants
            .iter()
            .find(|(v, _)| *v == ArtVariant::Flip)
            .unwrap();

        assert_eq!(flipped.to_rgb8().get_pixel(0, 0).0, [20, 0, 0]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ArtCropper::new(CropConfig::default().with_size(0, 0)).is_err());
    }

    #[test]
    fn test_default_art_dir_is_sibling() {
        assert_eq!(
            default_art_dir(Path::new("data/cards")),
            PathBuf::from("data/art")
        );
    }
}
