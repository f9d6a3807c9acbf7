//! Card registry loaded from the attribute dataset.
//!
//! The dataset is a JSON object keyed by card name. `CardRegistry` keeps the
//! cards in name order so every pass over it visits cards in the same
//! sequence, whatever order the file used.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::definition::{Card, LabelList, Layout};
use crate::core::{PrepError, PrepResult};

/// One dataset value. The name comes from the object key.
#[derive(Deserialize)]
struct CardRecord {
    #[serde(default)]
    types: LabelList,
    #[serde(default)]
    subtypes: LabelList,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    layout: Layout,
    #[serde(default)]
    names: Vec<String>,
}

impl CardRecord {
    fn into_card(self, name: String) -> Card {
        Card {
            name,
            types: self.types,
            subtypes: self.subtypes,
            text: self.text,
            layout: self.layout,
            names: self.names,
        }
    }
}

/// Read-only collection of cards, ordered by name.
///
/// ## Example
///
/// ```
/// use ccg_dataprep::cards::CardRegistry;
///
/// let registry = CardRegistry::from_json_str(
///     r#"{"Bolt": {"types": ["Instant"]}, "Bear": {"types": ["Creature"]}}"#,
/// ).unwrap();
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.get("Bolt").unwrap().primary_type(), Some("Instant"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: BTreeMap<String, Card>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> PrepResult<Self> {
        let records: BTreeMap<String, CardRecord> = serde_json::from_str(json)?;
        let cards = records
            .into_iter()
            .map(|(name, record)| (name.clone(), record.into_card(name)))
            .collect();
        Ok(Self { cards })
    }

    /// Load a dataset file.
    pub fn load(path: impl AsRef<Path>) -> PrepResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        let registry = Self::from_json_str(&json)?;
        debug!("Loaded {} cards from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Register a card.
    ///
    /// Panics if a card with the same name already exists.
    pub fn register(&mut self, card: Card) {
        if self.cards.contains_key(&card.name) {
            panic!("Card {:?} already registered", card.name);
        }
        self.cards.insert(card.name.clone(), card);
    }

    /// Get a card by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.get(name)
    }

    /// Check if a card name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }

    /// Names under which token scans are filed.
    ///
    /// Tokens named like `"Elemental card"` are scanned as `"Elemental"`.
    #[must_use]
    pub fn token_names(&self) -> Vec<String> {
        self.find(|c| c.layout == Layout::Token)
            .map(|c| {
                let mut words = c.name.split(' ');
                match (words.next(), c.name.rsplit(' ').next()) {
                    (Some(first), Some("card")) => first.to_string(),
                    _ => c.name.clone(),
                }
            })
            .collect()
    }

    /// Composite `"Left - Right"` names of split cards.
    #[must_use]
    pub fn split_names(&self) -> Vec<String> {
        self.find(|c| c.layout == Layout::Split)
            .map(Card::display_name)
            .collect()
    }
}

impl FromIterator<Card> for CardRegistry {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut registry = Self::new();
        for card in iter {
            registry.register(card);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"{
        "Lightning Bolt": {"types": ["Instant"], "text": "Deal 3.", "layout": "normal"},
        "Grizzly Bears": {"types": ["Creature"], "subtypes": ["Bear"]},
        "Elemental card": {"types": ["Creature"], "layout": "token"},
        "Soldier": {"types": ["Creature"], "layout": "token"},
        "Fire": {"types": ["Instant"], "layout": "split", "names": ["Fire", "Ice"]},
        "Delver of Secrets": {"types": ["Creature"], "layout": "double-faced", "power": "1"}
    }"#;

    #[test]
    fn test_parse_dataset() {
        let registry = CardRegistry::from_json_str(DATASET).unwrap();

        assert_eq!(registry.len(), 6);
        let bears = registry.get("Grizzly Bears").unwrap();
        assert_eq!(bears.name, "Grizzly Bears");
        assert_eq!(bears.subtypes.as_slice(), ["Bear".to_string()]);
        assert_eq!(bears.layout, Layout::Normal);
        assert_eq!(
            registry.get("Delver of Secrets").unwrap().layout,
            Layout::Other
        );
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let registry = CardRegistry::from_json_str(DATASET).unwrap();
        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_token_names() {
        let registry = CardRegistry::from_json_str(DATASET).unwrap();
        let tokens = registry.token_names();

        assert_eq!(tokens, vec!["Elemental".to_string(), "Soldier".to_string()]);
    }

    #[test]
    fn test_split_names() {
        let registry = CardRegistry::from_json_str(DATASET).unwrap();
        assert_eq!(registry.split_names(), vec!["Fire - Ice".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result = CardRegistry::from_json_str("{not json");
        assert!(matches!(result, Err(PrepError::Json(_))));
    }

    #[test]
    fn test_from_iterator() {
        let registry: CardRegistry = vec![Card::new("A"), Card::new("B")].into_iter().collect();
        assert!(registry.contains("A"));
        assert!(!registry.contains("C"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_name_panics() {
        let mut registry = CardRegistry::new();
        registry.register(Card::new("A"));
        registry.register(Card::new("A"));
    }
}
