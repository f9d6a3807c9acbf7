//! # ccg-dataprep
//!
//! Data preparation for trading-card classifiers and name generators.
//!
//! Turns a directory of card scans and a JSON card dataset into labelled
//! arrays for an external training library. Nothing here trains a model.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Directory listings are sorted, vocabularies are
//!    built over sorted labels, and every random draw comes from a seeded
//!    `PrepRng`. Same inputs and seed give the same dataset.
//!
//! 2. **Frozen Vocabularies**: Encoders are fitted once and passed
//!    explicitly to every encode call. They persist to disk with bincode.
//!
//! 3. **Fail Loudly**: An undecodable scan or a character outside the
//!    vocabulary is an error, not a skipped entry.
//!
//! ## Modules
//!
//! - `core`: Configuration, errors, seeded RNG
//! - `cards`: Card definitions, the dataset registry, summaries
//! - `art`: Art cropping and augmentation
//! - `encoding`: Category and character-sequence encoders
//! - `dataset`: Example assembly, partitioning, scan cleanup, demos
//! - `nn`: Traits a trained model implements

pub mod art;
pub mod cards;
pub mod core;
pub mod dataset;
pub mod encoding;
pub mod nn;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    CropConfig, LabelMode, LabelSource, PipelineConfig, PrepError, PrepResult, PrepRng,
    ResampleFilter, SequenceConfig, SplitConfig, VocabConfig,
};

pub use crate::cards::{Card, CardRegistry, Layout};

pub use crate::art::{ArtCropper, ArtGeometry, ArtVariant, CropReport};

pub use crate::encoding::{
    CategoryEncoder, CategoryVocabulary, CharVocabulary, Label, LabelEncoder, MultiHotEncoder,
    PrimaryTypeEncoder, SequenceEncoder,
};

pub use crate::dataset::{
    DatasetAssembler, Example, ImageBatch, LiveDemo, Partition, ScanPruner, SequenceBatch,
};

pub use crate::nn::{Classifier, EncodedArray, SequenceGenerator};
