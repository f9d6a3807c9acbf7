//! Card definitions - static card data from the attribute dataset.
//!
//! A `Card` holds the fields the pipeline reads: types, subtypes, rules
//! text and layout. Everything else in the dataset is ignored.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered list of type or subtype labels. Most cards carry one or two.
pub type LabelList = SmallVec<[String; 2]>;

/// Card layout tag.
///
/// Only `Token` and `Split` change pipeline behaviour; every other layout
/// in the dataset deserializes to `Other`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Regular single-faced card.
    #[default]
    Normal,
    /// Token card (not a real printed card).
    Token,
    /// Split card with two halves printed on one scan.
    Split,
    /// Any other layout (flip, double-faced, leveler, ...).
    #[serde(other)]
    Other,
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_dataprep::cards::{Card, Layout};
///
/// let bolt = Card::new("Lightning Bolt")
///     .with_types(["Instant"])
///     .with_text("Lightning Bolt deals 3 damage to any target.");
///
/// assert_eq!(bolt.primary_type(), Some("Instant"));
/// assert_eq!(bolt.layout, Layout::Normal);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Card name (the dataset key).
    pub name: String,

    /// Ordered card types; the first is the primary type.
    #[serde(default)]
    pub types: LabelList,

    /// Ordered subtypes.
    #[serde(default)]
    pub subtypes: LabelList,

    /// Rules text.
    #[serde(default)]
    pub text: Option<String>,

    /// Layout tag.
    #[serde(default)]
    pub layout: Layout,

    /// Names of both halves, for split cards.
    #[serde(default)]
    pub names: Vec<String>,
}

impl Card {
    /// Create a card with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: LabelList::new(),
            subtypes: LabelList::new(),
            text: None,
            layout: Layout::Normal,
            names: Vec::new(),
        }
    }

    /// Set the types (builder pattern).
    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the subtypes (builder pattern).
    #[must_use]
    pub fn with_subtypes<I, S>(mut self, subtypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtypes = subtypes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rules text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the half names of a split card.
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// The first listed type, if any.
    #[must_use]
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Name as printed on the scan filename.
    ///
    /// Split cards are scanned under `"Left - Right"`; everything else uses
    /// the card name.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.layout == Layout::Split && !self.names.is_empty() {
            self.names.join(" - ")
        } else {
            self.name.clone()
        }
    }

    /// Iterate over types followed by subtypes.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.types
            .iter()
            .chain(self.subtypes.iter())
            .map(String::as_str)
    }
}
