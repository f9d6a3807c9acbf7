//! Dataset summaries used to inspect a card collection before encoding.

use std::collections::{BTreeMap, BTreeSet};

use super::registry::CardRegistry;

/// Placeholder listed first in [`subtype_list`] for cards without subtypes.
pub const NO_SUBTYPE: &str = "none";

/// Map every type to the distinct subtypes seen alongside it.
///
/// Subtypes keep first-seen order over the name-ordered registry. Cards
/// without types contribute nothing.
#[must_use]
pub fn types_to_subtypes(registry: &CardRegistry) -> BTreeMap<String, Vec<String>> {
    let mut table: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for card in registry.iter() {
        for card_type in &card.types {
            let subtypes = table.entry(card_type.clone()).or_default();
            for subtype in &card.subtypes {
                if !subtypes.contains(subtype) {
                    subtypes.push(subtype.clone());
                }
            }
        }
    }
    table
}

/// `"none"` followed by every distinct subtype in sorted order.
#[must_use]
pub fn subtype_list(registry: &CardRegistry) -> Vec<String> {
    let distinct: BTreeSet<&str> = registry
        .iter()
        .flat_map(|c| c.subtypes.iter().map(String::as_str))
        .collect();

    std::iter::once(NO_SUBTYPE)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}
