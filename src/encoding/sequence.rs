//! Character-level sequence encoding.
//!
//! Each card becomes one corpus line, `types;subtypes;name`, with list
//! fields comma-joined. Separators are always written so an empty field
//! stays visible (`";;Name"`).
//!
//! Index 0 is reserved for padding; corpus characters get `1..=n` in sorted
//! order.
//!
//! ```
//! use ccg_dataprep::encoding::{pad, CharVocabulary};
//!
//! let vocab = CharVocabulary::build("ab");
//! let encoded = vocab.encode("ab").unwrap();
//! assert_eq!(pad(&encoded, 5), vec![1, 2, 0, 0, 0]);
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{read_snapshot, write_snapshot};
use crate::cards::{Card, CardRegistry};
use crate::core::{PrepError, PrepResult, PrepRng, SequenceConfig};

/// Integer code of one character.
pub type CharIndex = u32;

/// Padding index.
pub const PAD_INDEX: CharIndex = 0;

/// Separates the fields of a corpus line.
pub const FIELD_SEPARATOR: &str = ";";

/// Separates entries of a list field.
pub const LIST_SEPARATOR: &str = ",";

fn join_fields(card: &Card, last: &str) -> String {
    [
        card.types.join(LIST_SEPARATOR),
        card.subtypes.join(LIST_SEPARATOR),
        last.to_string(),
    ]
    .join(FIELD_SEPARATOR)
}

/// Corpus line of a card: `types;subtypes;name`.
#[must_use]
pub fn corpus_line(card: &Card) -> String {
    join_fields(card, &card.name)
}

/// Rules-text line of a card: `types;subtypes;text`.
///
/// Cards without rules text have no line.
#[must_use]
pub fn text_corpus_line(card: &Card) -> Option<String> {
    card.text.as_deref().map(|text| join_fields(card, text))
}

/// Name corpus of the whole dataset, one line per card.
#[must_use]
pub fn build_corpus(registry: &CardRegistry) -> String {
    let lines: Vec<String> = registry.iter().map(corpus_line).collect();
    lines.join("\n")
}

/// Rules-text corpus of the dataset, one line per card with text.
#[must_use]
pub fn build_text_corpus(registry: &CardRegistry) -> String {
    let lines: Vec<String> = registry.iter().filter_map(text_corpus_line).collect();
    lines.join("\n")
}

/// Pad with zeros or truncate to exactly `len` entries.
#[must_use]
pub fn pad(seq: &[CharIndex], len: usize) -> Vec<CharIndex> {
    let mut out: Vec<CharIndex> = seq.iter().take(len).copied().collect();
    out.resize(len, PAD_INDEX);
    out
}

/// Frozen character → index mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharVocabulary {
    /// Sorted distinct characters; `chars[i]` has index `i + 1`.
    chars: Vec<char>,
}

impl CharVocabulary {
    /// Collect the distinct characters of `corpus`.
    #[must_use]
    pub fn build(corpus: &str) -> Self {
        let chars: BTreeSet<char> = corpus.chars().collect();
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    /// Index of a character, never `PAD_INDEX`.
    #[must_use]
    pub fn index_of(&self, c: char) -> Option<CharIndex> {
        let position = self.chars.binary_search(&c).ok()?;
        CharIndex::try_from(position + 1).ok()
    }

    /// Character at `index`; `None` for padding and out-of-range indices.
    #[must_use]
    pub fn char_of(&self, index: CharIndex) -> Option<char> {
        let position = usize::try_from(index).ok()?.checked_sub(1)?;
        self.chars.get(position).copied()
    }

    /// Characters in index order.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of distinct characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the corpus was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Width of the index space, padding included.
    #[must_use]
    pub fn num_indices(&self) -> usize {
        self.chars.len() + 1
    }

    /// Map every character of `text`.
    pub fn encode(&self, text: &str) -> PrepResult<Vec<CharIndex>> {
        text.chars()
            .map(|c| self.index_of(c).ok_or(PrepError::VocabularyMiss(c)))
            .collect()
    }

    /// Map indices back to text. Padding and unknown indices are dropped.
    #[must_use]
    pub fn decode(&self, indices: &[CharIndex]) -> String {
        indices.iter().filter_map(|&i| self.char_of(i)).collect()
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

/// Next-character training pairs cut from a corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NextCharWindows {
    /// Input windows, each `max_len` long.
    pub inputs: Vec<Vec<CharIndex>>,
    /// Character following each window.
    pub targets: Vec<CharIndex>,
}

impl NextCharWindows {
    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the corpus was too short for a single window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Every `step`-th window of `max_len` characters and the character after it.
pub fn next_char_windows(
    vocab: &CharVocabulary,
    corpus: &str,
    max_len: usize,
    step: usize,
) -> PrepResult<NextCharWindows> {
    if max_len == 0 || step == 0 {
        return Err(PrepError::InvalidConfig(format!(
            "window length and step must be positive (got {max_len} and {step})"
        )));
    }

    let encoded = vocab.encode(corpus)?;
    let mut windows = NextCharWindows::default();
    for start in (0..encoded.len().saturating_sub(max_len)).step_by(step) {
        windows
            .inputs
            .push(encoded[start..start + max_len].to_vec());
        windows.targets.push(encoded[start + max_len]);
    }
    debug!(
        "Cut {} windows of {} from {} characters",
        windows.len(),
        max_len,
        encoded.len()
    );
    Ok(windows)
}

/// A random `max_len`-character slice of the corpus to prime a generator.
///
/// `None` when the corpus is not longer than `max_len`.
pub fn generation_seed(corpus: &str, max_len: usize, rng: &mut PrepRng) -> Option<String> {
    let chars: Vec<char> = corpus.chars().collect();
    if chars.len() <= max_len {
        return None;
    }
    let start = rng.gen_range_usize(0..chars.len() - max_len);
    Some(chars[start..start + max_len].iter().collect())
}

/// Character vocabulary plus the padding policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceEncoder {
    vocab: CharVocabulary,
    config: SequenceConfig,
}

impl SequenceEncoder {
    /// Wrap a frozen vocabulary.
    pub fn new(vocab: CharVocabulary, config: SequenceConfig) -> PrepResult<Self> {
        config.validate()?;
        Ok(Self { vocab, config })
    }

    /// Build the vocabulary from the registry's name corpus.
    pub fn fit(registry: &CardRegistry, config: SequenceConfig) -> PrepResult<Self> {
        let vocab = CharVocabulary::build(&build_corpus(registry));
        info!(
            "Character vocabulary: {} characters from {} cards",
            vocab.len(),
            registry.len()
        );
        Self::new(vocab, config)
    }

    /// The frozen vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &CharVocabulary {
        &self.vocab
    }

    /// The padding policy.
    #[must_use]
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Encode one card's corpus line, unpadded.
    pub fn encode_card(&self, card: &Card) -> PrepResult<Vec<CharIndex>> {
        self.vocab.encode(&corpus_line(card))
    }

    /// Encode every card, padded to `max_len` or to the longest line.
    pub fn encode_all(&self, registry: &CardRegistry) -> PrepResult<Vec<Vec<CharIndex>>> {
        let raw = registry
            .iter()
            .map(|card| self.encode_card(card))
            .collect::<PrepResult<Vec<_>>>()?;
        let len = self
            .config
            .max_len
            .unwrap_or_else(|| raw.iter().map(Vec::len).max().unwrap_or(0));
        Ok(raw.iter().map(|seq| pad(seq, len)).collect())
    }

    /// Next-character windows over `corpus` with the configured length and stride.
    pub fn windows(&self, corpus: &str) -> PrepResult<NextCharWindows> {
        let max_len = self.config.max_len.ok_or_else(|| {
            PrepError::InvalidConfig("next-character windows need a max_len".to_string())
        })?;
        next_char_windows(&self.vocab, corpus, max_len, self.config.window_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CardRegistry {
        [
            Card::new("Bear")
                .with_types(["Creature"])
                .with_subtypes(["Bear"]),
            Card::new("Bolt")
                .with_types(["Instant"])
                .with_text("Deal 3."),
            Card::new("Fire"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_corpus_line_keeps_separators() {
        let registry = registry();
        assert_eq!(corpus_line(registry.get("Bear").unwrap()), "Creature;Bear;Bear");
        assert_eq!(corpus_line(registry.get("Bolt").unwrap()), "Instant;;Bolt");
        assert_eq!(corpus_line(registry.get("Fire").unwrap()), ";;Fire");
    }

    #[test]
    fn test_corpus_line_joins_lists() {
        let card = Card::new("Elf Lord")
            .with_types(["Tribal", "Creature"])
            .with_subtypes(["Elf", "Lord"]);
        assert_eq!(corpus_line(&card), "Tribal,Creature;Elf,Lord;Elf Lord");
    }

    #[test]
    fn test_build_corpora() {
        let registry = registry();
        assert_eq!(
            build_corpus(&registry),
            "Creature;Bear;Bear\nInstant;;Bolt\n;;Fire"
        );
        assert_eq!(build_text_corpus(&registry), "Instant;;Deal 3.");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad(&[1, 2], 5), vec![1, 2, 0, 0, 0]);
        assert_eq!(pad(&[1, 2, 3], 2), vec![1, 2]);
        assert!(pad(&[1], 0).is_empty());
    }

    #[test]
    fn test_vocabulary_indices() {
        let vocab = CharVocabulary::build("cab");
        assert_eq!(vocab.chars(), ['a', 'b', 'c']);
        assert_eq!(vocab.index_of('a'), Some(1));
        assert_eq!(vocab.index_of('c'), Some(3));
        assert_eq!(vocab.index_of('z'), None);
        assert_eq!(vocab.char_of(PAD_INDEX), None);
        assert_eq!(vocab.char_of(2), Some('b'));
        assert_eq!(vocab.num_indices(), 4);
    }

    #[test]
    fn test_encode_unknown_char() {
        let vocab = CharVocabulary::build("ab");
        assert!(matches!(
            vocab.encode("abc"),
            Err(PrepError::VocabularyMiss('c'))
        ));
    }

    #[test]
    fn test_decode_drops_padding() {
        let vocab = CharVocabulary::build("ab");
        assert_eq!(vocab.decode(&[2, 1, 0, 0, 9]), "ba");
    }

    #[test]
    fn test_next_char_windows() {
        let vocab = CharVocabulary::build("abcdef");
        let windows = next_char_windows(&vocab, "abcdef", 2, 3).unwrap();

        // Starts 0 and 3
        assert_eq!(windows.inputs, vec![vec![1, 2], vec![4, 5]]);
        assert_eq!(windows.targets, vec![3, 6]);

        let none = next_char_windows(&vocab, "ab", 2, 1).unwrap();
        assert!(none.is_empty());
        assert!(next_char_windows(&vocab, "abc", 2, 0).is_err());
    }

    #[test]
    fn test_generation_seed() {
        let corpus = "abcdefgh";
        let mut rng = PrepRng::new(7);
        let seed = generation_seed(corpus, 3, &mut rng).unwrap();

        assert_eq!(seed.chars().count(), 3);
        assert!(corpus.contains(&seed));
        assert!(!corpus.ends_with(&seed));
        assert_eq!(generation_seed("abc", 3, &mut rng), None);
    }

    #[test]
    fn test_encode_all_pads_to_longest() {
        let registry = registry();
        let encoder =
            SequenceEncoder::fit(&registry, SequenceConfig::default().with_max_len(None)).unwrap();
        let encoded = encoder.encode_all(&registry).unwrap();

        assert!(encoded.iter().all(|s| s.len() == "Creature;Bear;Bear".len()));
        assert_eq!(
            encoder.vocabulary().decode(&encoded[2]),
            ";;Fire".to_string()
        );
    }

    #[test]
    fn test_encode_all_fixed_length() {
        let registry = registry();
        let encoder =
            SequenceEncoder::fit(&registry, SequenceConfig::default().with_max_len(Some(4)))
                .unwrap();
        let encoded = encoder.encode_all(&registry).unwrap();

        assert!(encoded.iter().all(|s| s.len() == 4));
        assert_eq!(encoder.vocabulary().decode(&encoded[1]), "Inst");
    }

    #[test]
    fn test_vocabulary_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chars.bin");
        let vocab = CharVocabulary::build("hello world");

        vocab.save(&path).unwrap();
        assert_eq!(CharVocabulary::load(&path).unwrap(), vocab);
    }
}
