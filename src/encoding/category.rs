//! Category vocabularies.
//!
//! Both modes use the same two passes: count label frequencies over the
//! whole dataset, then give contiguous indices to the sorted labels whose
//! count reaches the cutoff. Sorting makes the mapping independent of the
//! dataset's key order.
//!
//! ## Example
//!
//! ```
//! use ccg_dataprep::cards::{Card, CardRegistry};
//! use ccg_dataprep::encoding::{LabelEncoder, Label, PrimaryTypeEncoder};
//!
//! let registry: CardRegistry = [
//!     Card::new("Bolt").with_types(["Instant"]),
//!     Card::new("Bear").with_types(["Creature"]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let encoder = PrimaryTypeEncoder::fit(&registry, 0);
//! assert_eq!(encoder.encode_name(&registry, "Bear"), Label::Class(0));
//! assert_eq!(encoder.encode_name(&registry, "Bolt"), Label::Class(1));
//! assert_eq!(encoder.encode_name(&registry, "Unknown"), Label::Class(2));
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::label::{Label, LabelEncoder};
use super::{read_snapshot, write_snapshot};
use crate::cards::{Card, CardRegistry};
use crate::core::{LabelMode, LabelSource, PrepResult, VocabConfig};

/// Name of the bucket that absorbs rare and unknown primary types.
pub const OTHER_LABEL: &str = "Other";

/// Frozen label → index mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    /// Sorted labels; a label's position is its index.
    labels: Vec<String>,
    /// Whether an "Other" slot follows the labels.
    has_other: bool,
}

impl CategoryVocabulary {
    /// Build from frequency counts, keeping labels seen at least `cutoff` times.
    fn from_counts(counts: FxHashMap<&str, usize>, cutoff: usize, has_other: bool) -> Self {
        let mut labels: Vec<String> = counts
            .into_iter()
            .filter(|&(_, count)| count >= cutoff)
            .map(|(label, _)| label.to_string())
            .collect();
        labels.sort_unstable();
        Self { labels, has_other }
    }

    /// Build directly from a label list (sorted and deduplicated here).
    #[must_use]
    pub fn from_labels<I, S>(labels: I, has_other: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort_unstable();
        labels.dedup();
        Self { labels, has_other }
    }

    /// Index of a kept label.
    ///
    /// Labels that fell below the cutoff return `None`; callers decide
    /// whether that means "Other" or "no bit".
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    /// Label at `index`, including the "Other" slot.
    #[must_use]
    pub fn label_of(&self, index: usize) -> Option<&str> {
        match self.labels.get(index) {
            Some(label) => Some(label.as_str()),
            None if Some(index) == self.other_index() => Some(OTHER_LABEL),
            None => None,
        }
    }

    /// Index of the "Other" slot, always the last one.
    #[must_use]
    pub fn other_index(&self) -> Option<usize> {
        self.has_other.then_some(self.labels.len())
    }

    /// Kept labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of kept labels (excluding "Other").
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no label passed the cutoff.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of the label space (including "Other").
    #[must_use]
    pub fn num_categories(&self) -> usize {
        self.labels.len() + usize::from(self.has_other)
    }

    /// Persist to a bincode file.
    pub fn save(&self, path: impl AsRef<Path>) -> PrepResult<()> {
        write_snapshot(path.as_ref(), self)
    }

    /// Restore a vocabulary written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> PrepResult<Self> {
        read_snapshot(path.as_ref())
    }
}

/// Single-label encoder over primary types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryTypeEncoder {
    vocab: CategoryVocabulary,
}

impl PrimaryTypeEncoder {
    /// Count primary types and keep those seen at least `cutoff` times.
    #[must_use]
    pub fn fit(registry: &CardRegistry, cutoff: usize) -> Self {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for primary in registry.iter().filter_map(Card::primary_type) {
            *counts.entry(primary).or_insert(0) += 1;
        }
        let distinct = counts.len();

        let vocab = CategoryVocabulary::from_counts(counts, cutoff, true);
        info!(
            "Primary-type vocabulary: {} of {} types kept at cutoff {}",
            vocab.len(),
            distinct,
            cutoff
        );
        debug!("Kept types: {:?}", vocab.labels());
        Self { vocab }
    }

    /// Wrap an existing vocabulary. An "Other" slot is required.
    #[must_use]
    pub fn from_vocabulary(vocab: CategoryVocabulary) -> Self {
        Self {
            vocab: CategoryVocabulary {
                has_other: true,
                ..vocab
            },
        }
    }

    /// The frozen vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocab
    }

    fn other(&self) -> usize {
        self.vocab.len()
    }
}

impl LabelEncoder for PrimaryTypeEncoder {
    fn encode(&self, card: &Card) -> Label {
        let index = card
            .primary_type()
            .and_then(|t| self.vocab.index_of(t))
            .unwrap_or_else(|| self.other());
        Label::Class(index)
    }

    fn fallback(&self) -> Label {
        Label::Class(self.other())
    }

    fn num_categories(&self) -> usize {
        self.vocab.num_categories()
    }

    fn label_of(&self, index: usize) -> Option<&str> {
        self.vocab.label_of(index)
    }
}

/// Multi-hot encoder over a shared type/subtype label space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiHotEncoder {
    vocab: CategoryVocabulary,
    source: LabelSource,
}

impl MultiHotEncoder {
    /// Count labels from `source` and keep those seen at least `cutoff` times.
    ///
    /// A string used as both a type and a subtype shares one slot.
    #[must_use]
    pub fn fit(registry: &CardRegistry, source: LabelSource, cutoff: usize) -> Self {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for card in registry.iter() {
            for label in source_labels(card, source) {
                *counts.entry(label).or_insert(0) += 1;
            }
        }
        let distinct = counts.len();

        let vocab = CategoryVocabulary::from_counts(counts, cutoff, false);
        info!(
            "Multi-hot vocabulary: {} of {} labels kept at cutoff {}",
            vocab.len(),
            distinct,
            cutoff
        );
        Self { vocab, source }
    }

    /// The frozen vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocab
    }

    /// Fields the labels are read from.
    #[must_use]
    pub fn source(&self) -> LabelSource {
        self.source
    }
}

fn source_labels(card: &Card, source: LabelSource) -> Box<dyn Iterator<Item = &str> + '_> {
    match source {
        LabelSource::Types => Box::new(card.types.iter().map(String::as_str)),
        LabelSource::TypesAndSubtypes => Box::new(card.labels()),
    }
}

impl LabelEncoder for MultiHotEncoder {
    fn encode(&self, card: &Card) -> Label {
        let mut bits = vec![0u8; self.vocab.len()];
        for label in source_labels(card, self.source) {
            if let Some(index) = self.vocab.index_of(label) {
                bits[index] = 1;
            }
        }
        Label::MultiHot(bits)
    }

    fn fallback(&self) -> Label {
        Label::MultiHot(vec![0; self.vocab.len()])
    }

    fn num_categories(&self) -> usize {
        self.vocab.num_categories()
    }

    fn label_of(&self, index: usize) -> Option<&str> {
        self.vocab.label_of(index)
    }
}

/// Encoder selected by a `VocabConfig`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryEncoder {
    /// One class per card.
    PrimaryType(PrimaryTypeEncoder),
    /// One bit per label.
    MultiHot(MultiHotEncoder),
}

impl CategoryEncoder {
    /// Fit the encoder the config asks for.
    #[must_use]
    pub fn fit(registry: &CardRegistry, config: &VocabConfig) -> Self {
        match config.mode {
            LabelMode::PrimaryType => {
                Self::PrimaryType(PrimaryTypeEncoder::fit(registry, config.cutoff))
            }
            LabelMode::MultiHot => Self::MultiHot(MultiHotEncoder::fit(
                registry,
                config.source,
                config.cutoff,
            )),
        }
    }

    /// The frozen vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &CategoryVocabulary {
        match self {
            Self::PrimaryType(e) => e.vocabulary(),
            Self::MultiHot(e) => e.vocabulary(),
        }
    }

    /// Persist the fitted encoder to a bincode file.
    pub fn save(&self, path: impl AsRef<Path>) -> PrepResult<()> {
        write_snapshot(path.as_ref(), self)
    }

    /// Restore an encoder written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> PrepResult<Self> {
        read_snapshot(path.as_ref())
    }

    fn inner(&self) -> &dyn LabelEncoder {
        match self {
            Self::PrimaryType(e) => e,
            Self::MultiHot(e) => e,
        }
    }
}

impl LabelEncoder for CategoryEncoder {
    fn encode(&self, card: &Card) -> Label {
        self.inner().encode(card)
    }

    fn fallback(&self) -> Label {
        self.inner().fallback()
    }

    fn num_categories(&self) -> usize {
        self.inner().num_categories()
    }

    fn label_of(&self, index: usize) -> Option<&str> {
        self.inner().label_of(index)
    }
}
