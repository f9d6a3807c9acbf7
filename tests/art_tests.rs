//! Art extraction integration tests.

use std::path::Path;

use ccg_dataprep::art::{survey_scan_sizes, ArtCropper, ArtGeometry, ArtVariant};
use ccg_dataprep::core::{CropConfig, PrepError, PrepRng};
use ccg_dataprep::dataset::list_files;
use image::{Rgb, RgbImage};

// =============================================================================
// Helpers
// =============================================================================

fn write_scan(dir: &Path, name: &str, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([200, 100, 50]))
        .save(dir.join(name))
        .unwrap();
}

fn names_in(dir: &Path) -> Vec<String> {
    list_files(dir)
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

// =============================================================================
// Directory Processing
// =============================================================================

#[test]
fn test_process_dir_writes_all_variants() {
    let scans = tempfile::tempdir().unwrap();
    let art = tempfile::tempdir().unwrap();
    write_scan(scans.path(), "Bolt.png", 223, 310);
    std::fs::write(scans.path().join(".DS_Store"), b"not an image").unwrap();

    let cropper = ArtCropper::new(CropConfig::default()).unwrap();
    let report = cropper
        .process_dir(scans.path(), art.path(), &mut PrepRng::new(42))
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.written.len(), 4);
    assert_eq!(
        names_in(art.path()),
        vec!["Bolt.png", "blur_Bolt.png", "blur_flip_Bolt.png", "flip_Bolt.png"]
    );

    for path in &report.written {
        let (width, height) = image::image_dimensions(path).unwrap();
        assert_eq!((width, height), (64, 64));
    }
}

#[test]
fn test_process_dir_creates_output_dir() {
    let scans = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("nested").join("art");
    write_scan(scans.path(), "Bear.png", 223, 310);

    let config = CropConfig::default()
        .with_size(32, 16)
        .with_variants(false, false);
    let report = ArtCropper::new(config)
        .unwrap()
        .process_dir(scans.path(), &output, &mut PrepRng::new(1))
        .unwrap();

    assert_eq!(report.written, vec![output.join("Bear.png")]);
    assert_eq!(image::image_dimensions(&report.written[0]).unwrap(), (32, 16));
}

#[test]
fn test_zero_proportion_skips_everything() {
    let scans = tempfile::tempdir().unwrap();
    let art = tempfile::tempdir().unwrap();
    for name in ["A.png", "B.png", "C.png"] {
        write_scan(scans.path(), name, 223, 310);
    }

    let config = CropConfig::default().with_proportion(0.0);
    let report = ArtCropper::new(config)
        .unwrap()
        .process_dir(scans.path(), art.path(), &mut PrepRng::new(1))
        .unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.sampled_out, 3);
    assert!(names_in(art.path()).is_empty());
}

#[test]
fn test_sampling_is_seeded() {
    let scans = tempfile::tempdir().unwrap();
    for i in 0..20 {
        write_scan(scans.path(), &format!("Card{i:02}.png"), 100, 140);
    }
    let config = CropConfig::default()
        .with_proportion(0.5)
        .with_variants(false, false);
    let cropper = ArtCropper::new(config).unwrap();

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    cropper
        .process_dir(scans.path(), first.path(), &mut PrepRng::new(9))
        .unwrap();
    cropper
        .process_dir(scans.path(), second.path(), &mut PrepRng::new(9))
        .unwrap();

    assert_eq!(names_in(first.path()), names_in(second.path()));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_undecodable_scan_is_fatal() {
    let scans = tempfile::tempdir().unwrap();
    let art = tempfile::tempdir().unwrap();
    std::fs::write(scans.path().join("Broken.png"), b"definitely not a png").unwrap();

    let result = ArtCropper::new(CropConfig::default())
        .unwrap()
        .process_dir(scans.path(), art.path(), &mut PrepRng::new(0));

    assert!(matches!(result, Err(PrepError::Image { .. })));
}

#[test]
fn test_odd_aspect_scan_does_not_stop_the_run() {
    let scans = tempfile::tempdir().unwrap();
    let art = tempfile::tempdir().unwrap();
    write_scan(scans.path(), "A.png", 223, 310);
    // Art is taller than it is wide on a 1:2 scan
    write_scan(scans.path(), "B.png", 200, 400);
    write_scan(scans.path(), "C.png", 223, 310);

    let config = CropConfig::default().with_variants(false, false);
    let report = ArtCropper::new(config)
        .unwrap()
        .process_dir(scans.path(), art.path(), &mut PrepRng::new(0))
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(names_in(art.path()), vec!["A.png", "B.png", "C.png"]);
    assert_eq!(image::image_dimensions(art.path().join("C.png")).unwrap(), (64, 64));
}

#[test]
fn test_tall_scan_is_padded_not_rejected() {
    let scans = tempfile::tempdir().unwrap();
    let art = tempfile::tempdir().unwrap();
    // Art square would be 168px on a 50px-wide scan
    write_scan(scans.path(), "Tall.png", 50, 400);

    let config = CropConfig::default().with_variants(false, false);
    let report = ArtCropper::new(config)
        .unwrap()
        .process_dir(scans.path(), art.path(), &mut PrepRng::new(0))
        .unwrap();

    let cropped = image::open(&report.written[0]).unwrap().to_rgb8();
    let near = |actual: [u8; 3], expected: [u8; 3]| {
        actual.iter().zip(expected).all(|(&a, e)| a.abs_diff(e) <= 2)
    };
    assert!(near(cropped.get_pixel(0, 32).0, [0, 0, 0]));
    assert!(near(cropped.get_pixel(32, 32).0, [200, 100, 50]));
}

#[test]
fn test_empty_scan_is_invalid_geometry() {
    assert!(matches!(
        ArtGeometry::for_size(0, 310),
        Err(PrepError::InvalidGeometry { .. })
    ));
}

#[test]
fn test_geometry_matches_ratios() {
    let geometry = ArtGeometry::for_size(488, 680).unwrap();
    let margin = (488.0 - 488.0 * 0.76) / 2.0;

    assert!((geometry.margin() - margin).abs() < 1e-9);
    assert!((geometry.art.y - 1.5 * margin).abs() < 1e-9);
    assert!((geometry.square.width - 680.0 * 0.42).abs() < 1e-9);
    assert!((geometry.square.width - geometry.square.height).abs() < 1e-9);
}

// =============================================================================
// Scan Survey
// =============================================================================

#[test]
fn test_survey_scan_sizes() {
    let scans = tempfile::tempdir().unwrap();
    write_scan(scans.path(), "a.png", 223, 310);
    write_scan(scans.path(), "b.png", 223, 311);
    write_scan(scans.path(), "c.png", 100, 140);

    let sizes = survey_scan_sizes(scans.path()).unwrap();
    let pairs: Vec<_> = sizes.into_iter().collect();

    // First height seen per width, in sorted-filename order
    assert_eq!(pairs, vec![(100, 140), (223, 310)]);
}

#[test]
fn test_variant_names_round_trip_through_parse() {
    for variant in ArtVariant::ALL {
        let name = variant.file_name("3.Forest .full.jpg");
        assert_eq!(ArtVariant::parse(&name), (variant, "3.Forest .full.jpg"));
    }
}
