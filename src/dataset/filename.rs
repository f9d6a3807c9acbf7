//! Scan and art filename handling.
//!
//! Scans are named after the card they show, optionally prefixed by a
//! numeric disambiguator for reprints: `"3.Forest .full.jpg"` is a scan of
//! `Forest`. Art variants add a `flip_`/`blur_` prefix on top.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::art::ArtVariant;
use crate::core::{PrepError, PrepResult};

/// Filesystem metadata file that is never treated as a scan.
pub const SENTINEL_FILE: &str = ".DS_Store";

/// Whether a filename is the sentinel file.
#[must_use]
pub fn is_sentinel(file_name: &str) -> bool {
    file_name == SENTINEL_FILE
}

/// Whether `s` parses as an integer.
#[must_use]
pub fn represents_int(s: &str) -> bool {
    s.trim().parse::<i64>().is_ok()
}

/// Card name encoded in a scan or art filename.
///
/// Splits on `.`, drops a leading integer part (when something follows it),
/// then strips one trailing space from what is left.
///
/// ```
/// use ccg_dataprep::dataset::card_name;
///
/// assert_eq!(card_name("Lightning Bolt.jpg"), "Lightning Bolt");
/// assert_eq!(card_name("2.Forest .full.jpg"), "Forest");
/// assert_eq!(card_name("blur_flip_Island.jpg"), "Island");
/// ```
#[must_use]
pub fn card_name(file_name: &str) -> &str {
    let (_, scan_name) = ArtVariant::parse(file_name);
    let mut parts = scan_name.split('.');
    let first = parts.next().unwrap_or_default();
    let name = match parts.next() {
        Some(second) if represents_int(first) => second,
        _ => first,
    };
    name.strip_suffix(' ').unwrap_or(name)
}

/// Regular files in `dir`, sorted by name, sentinel excluded.
///
/// Sorting pins the processing order so seeded sampling and partitioning
/// replay identically on every platform.
pub fn list_files(dir: &Path) -> PrepResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PrepError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PrepError::io(dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!("Skipping non-UTF-8 filename {}", path.display());
            continue;
        };
        if is_sentinel(name) || !path.is_file() {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// The UTF-8 filename of a listed path.
#[must_use]
pub fn file_name_of(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_represents_int() {
        assert!(represents_int("12"));
        assert!(represents_int("-3"));
        assert!(!represents_int("Forest"));
        assert!(!represents_int(""));
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(card_name("Grizzly Bears.jpg"), "Grizzly Bears");
    }

    #[test]
    fn test_numeric_prefix_and_trailing_space() {
        assert_eq!(card_name("12.Swamp .full.jpg"), "Swamp");
        assert_eq!(card_name("Swamp .jpg"), "Swamp");
        // Only one trailing space is stripped
        assert_eq!(card_name("Swamp  .jpg"), "Swamp ");
    }

    #[test]
    fn test_integer_without_following_part_is_kept() {
        assert_eq!(card_name("1996"), "1996");
        assert_eq!(card_name("1996.jpg"), "jpg");
    }

    #[test]
    fn test_variant_prefix_is_stripped() {
        assert_eq!(card_name("flip_3.Plains.jpg"), "Plains");
        assert_eq!(card_name("blur_Plains.jpg"), "Plains");
    }

    #[test]
    fn test_sentinel() {
        assert!(is_sentinel(".DS_Store"));
        assert!(!is_sentinel("Bolt.jpg"));
    }

    #[test]
    fn test_list_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.jpg", ".DS_Store"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| file_name_of(p)).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_list_missing_dir_is_error() {
        let result = list_files(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(PrepError::Io { .. })));
    }
}
