//! Encoded labels and the encoder trait shared by every labelling mode.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardRegistry};

/// Encoded label of one example.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Class index (single-label mode, or next-character target).
    Class(usize),
    /// One 0/1 entry per vocabulary slot.
    MultiHot(Vec<u8>),
}

impl Label {
    /// Class index, if this is a single-label encoding.
    #[must_use]
    pub fn class(&self) -> Option<usize> {
        match self {
            Label::Class(index) => Some(*index),
            Label::MultiHot(_) => None,
        }
    }

    /// Dense float vector of length `num_categories`.
    ///
    /// Class labels are one-hot expanded; multi-hot bits are copied.
    #[must_use]
    pub fn to_vector(&self, num_categories: usize) -> Vec<f32> {
        match self {
            Label::Class(index) => to_categorical(*index, num_categories),
            Label::MultiHot(bits) => {
                let mut out: Vec<f32> = bits.iter().map(|&b| f32::from(b)).collect();
                out.resize(num_categories, 0.0);
                out
            }
        }
    }
}

/// One-hot vector with a 1 at `index`.
///
/// An out-of-range index yields the all-zero vector.
#[must_use]
pub fn to_categorical(index: usize, num_categories: usize) -> Vec<f32> {
    let mut out = vec![0.0; num_categories];
    if let Some(slot) = out.get_mut(index) {
        *slot = 1.0;
    }
    out
}

/// Turns cards into labels against a frozen vocabulary.
///
/// Each encoder defines:
/// - How a known card is labelled
/// - The label used for names missing from the dataset
/// - The width of the label space
pub trait LabelEncoder: Send + Sync {
    /// Encode one card.
    fn encode(&self, card: &Card) -> Label;

    /// Label for cards that cannot be matched.
    fn fallback(&self) -> Label;

    /// Number of output categories.
    fn num_categories(&self) -> usize;

    /// Human-readable name of a category.
    fn label_of(&self, index: usize) -> Option<&str>;

    /// Encode the card called `name`, falling back when it is unknown.
    fn encode_name(&self, registry: &CardRegistry, name: &str) -> Label {
        registry
            .get(name)
            .map_or_else(|| self.fallback(), |card| self.encode(card))
    }

    /// Encode every card in registry order.
    fn encode_all(&self, registry: &CardRegistry) -> Vec<Label> {
        registry.iter().map(|card| self.encode(card)).collect()
    }
}
