//! Label and sequence encoding.
//!
//! Vocabularies are built once from the card dataset and then frozen; every
//! encode call takes the vocabulary explicitly.
//!
//! - `category`: primary-type and multi-hot label vocabularies
//! - `sequence`: character vocabulary, padding, training windows
//! - `label`: the encoded label type and the `LabelEncoder` trait

pub mod category;
pub mod label;
pub mod sequence;

pub use category::{
    CategoryEncoder, CategoryVocabulary, MultiHotEncoder, PrimaryTypeEncoder, OTHER_LABEL,
};
pub use label::{to_categorical, Label, LabelEncoder};
pub use sequence::{
    build_corpus, build_text_corpus, corpus_line, generation_seed, next_char_windows, pad,
    text_corpus_line, CharIndex, CharVocabulary, NextCharWindows, SequenceEncoder, PAD_INDEX,
};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{PrepError, PrepResult};

/// Write a bincode snapshot of `value` to `path`.
pub(crate) fn write_snapshot<T: Serialize>(path: &Path, value: &T) -> PrepResult<()> {
    let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
    bincode::serialize_into(BufWriter::new(file), value)?;
    Ok(())
}

/// Read a bincode snapshot written by `write_snapshot`.
pub(crate) fn read_snapshot<T: DeserializeOwned>(path: &Path) -> PrepResult<T> {
    let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
    Ok(bincode::deserialize_from(BufReader::new(file))?)
}
