//! Removal of scans that should never become training art.
//!
//! Token cards are not printed cards, and split cards carry two illustrations
//! on one scan; both are deleted from the scan directory before cropping.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::filename::{file_name_of, list_files};
use crate::cards::CardRegistry;
use crate::core::{PrepError, PrepResult};

/// Outcome of a pruning pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Files removed (or that would be removed in a dry run).
    pub removed: Vec<PathBuf>,
    /// Files left in place.
    pub kept: usize,
}

/// Deletes scans whose filename mentions a blocked card name.
#[derive(Clone, Debug, Default)]
pub struct ScanPruner {
    names: FxHashSet<String>,
    dry_run: bool,
}

impl ScanPruner {
    /// Block the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            dry_run: false,
        }
    }

    /// Block token names, split names, or both.
    #[must_use]
    pub fn from_registry(registry: &CardRegistry, tokens: bool, splits: bool) -> Self {
        let mut names = Vec::new();
        if tokens {
            names.extend(registry.token_names());
        }
        if splits {
            names.extend(registry.split_names());
        }
        Self::new(names)
    }

    /// Report matches without deleting anything.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Number of blocked names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether any `.`-separated part of `file_name` is a blocked name.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.split('.').any(|part| self.names.contains(part))
    }

    /// Remove matching files from `scan_dir`.
    pub fn prune(&self, scan_dir: &Path) -> PrepResult<PruneReport> {
        let mut report = PruneReport::default();
        for path in list_files(scan_dir)? {
            if !self.matches(file_name_of(&path)) {
                report.kept += 1;
                continue;
            }
            if self.dry_run {
                debug!("Would remove {}", path.display());
            } else {
                std::fs::remove_file(&path).map_err(|e| PrepError::io(&path, e))?;
                debug!("Removed {}", path.display());
            }
            report.removed.push(path);
        }

        info!(
            "{} {} scans from {}, {} kept",
            if self.dry_run { "Would remove" } else { "Removed" },
            report.removed.len(),
            scan_dir.display(),
            report.kept
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Layout};

    fn registry() -> CardRegistry {
        [
            Card::new("Goblin").with_layout(Layout::Token),
            Card::new("Treasure card").with_layout(Layout::Token),
            Card::new("Fire // Ice")
                .with_layout(Layout::Split)
                .with_names(["Fire", "Ice"]),
            Card::new("Bolt"),
        ]
        .into_iter()
        .collect()
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
    }

    #[test]
    fn test_matches_whole_parts_only() {
        let pruner = ScanPruner::from_registry(&registry(), true, true);

        assert!(pruner.matches("Goblin.full.jpg"));
        assert!(pruner.matches("2.Treasure.jpg"));
        assert!(pruner.matches("Fire - Ice.jpg"));
        assert!(!pruner.matches("Goblin Guide.jpg"));
        assert!(!pruner.matches("Bolt.jpg"));
    }

    #[test]
    fn test_from_registry_selects_kinds() {
        let registry = registry();
        assert_eq!(ScanPruner::from_registry(&registry, true, false).len(), 2);
        assert_eq!(ScanPruner::from_registry(&registry, false, true).len(), 1);
        assert!(ScanPruner::from_registry(&registry, false, false).is_empty());
    }

    #[test]
    fn test_prune_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["Goblin.jpg", "Bolt.jpg", "Fire - Ice.jpg"]);

        let report = ScanPruner::from_registry(&registry(), true, true)
            .prune(dir.path())
            .unwrap();

        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.kept, 1);
        assert!(dir.path().join("Bolt.jpg").exists());
        assert!(!dir.path().join("Goblin.jpg").exists());
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["Goblin.jpg"]);

        let report = ScanPruner::new(["Goblin"])
            .with_dry_run(true)
            .prune(dir.path())
            .unwrap();

        assert_eq!(report.removed, vec![dir.path().join("Goblin.jpg")]);
        assert!(dir.path().join("Goblin.jpg").exists());
    }
}
