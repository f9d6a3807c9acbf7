//! Joins encoded inputs with labels and partitions them.
//!
//! Art examples come from a directory of cropped art; each file is matched
//! to a card through its filename. Sequence examples come straight from the
//! registry. Both go through the same seeded Bernoulli split, drawn from the
//! `"split"` context of the configured seed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::example::{image_to_array, Example, Partition};
use super::filename::{card_name, file_name_of, list_files};
use crate::cards::CardRegistry;
use crate::core::{PipelineConfig, PrepError, PrepResult, PrepRng, SplitConfig};
use crate::encoding::{CharIndex, Label, LabelEncoder, SequenceEncoder};
use crate::nn::EncodedArray;

/// Art example: `height × width × channels` pixels and a label.
pub type ArtExample = Example<EncodedArray>;

/// Sequence example: padded character indices and a label.
pub type SequenceExample = Example<Vec<CharIndex>>;

/// Art file matched to a card, before decoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledFile {
    /// File name inside the art directory.
    pub file: String,
    /// Card name parsed from the file name.
    pub name: String,
    /// Encoded label.
    pub label: Label,
}

/// RNG context used for partitioning.
pub const SPLIT_CONTEXT: &str = "split";

/// Builds labelled, partitioned datasets.
#[derive(Clone, Debug)]
pub struct DatasetAssembler<'a> {
    registry: &'a CardRegistry,
    split: SplitConfig,
    seed: u64,
}

impl<'a> DatasetAssembler<'a> {
    /// Create an assembler over a loaded registry.
    pub fn new(registry: &'a CardRegistry, split: SplitConfig, seed: u64) -> PrepResult<Self> {
        split.validate()?;
        Ok(Self {
            registry,
            split,
            seed,
        })
    }

    /// Create an assembler from the pipeline config.
    pub fn from_config(registry: &'a CardRegistry, config: &PipelineConfig) -> PrepResult<Self> {
        Self::new(registry, config.split.clone(), config.seed)
    }

    /// The registry labels are looked up in.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        self.registry
    }

    /// Fresh partition RNG; every call replays the same draws.
    fn split_rng(&self) -> PrepRng {
        PrepRng::new(self.seed).for_context(SPLIT_CONTEXT)
    }

    /// Partition items with the configured test proportion.
    pub fn partition<T>(&self, items: Vec<T>) -> Partition<T> {
        let mut rng = self.split_rng();
        Partition::bernoulli(items, self.split.test_proportion, &mut rng)
    }

    /// Label of an art or scan file.
    ///
    /// Files naming no known card get the encoder's fallback label.
    pub fn label_file(&self, file_name: &str, encoder: &dyn LabelEncoder) -> Label {
        encoder.encode_name(self.registry, card_name(file_name))
    }

    /// Match every art file in `art_dir` to its card and label, in sorted
    /// order. Nothing is decoded.
    pub fn label_files(
        &self,
        art_dir: &Path,
        encoder: &dyn LabelEncoder,
    ) -> PrepResult<Vec<LabelledFile>> {
        let mut unmatched = 0;
        let files: Vec<_> = list_files(art_dir)?
            .iter()
            .map(|path| {
                let file_name = file_name_of(path);
                let name = card_name(file_name);
                if !self.registry.contains(name) {
                    debug!("No card named {:?} for {}", name, file_name);
                    unmatched += 1;
                }
                LabelledFile {
                    file: file_name.to_owned(),
                    name: name.to_owned(),
                    label: self.label_file(file_name, encoder),
                }
            })
            .collect();

        info!(
            "Labelled {} art files, {} with fallback labels",
            files.len(),
            unmatched
        );
        Ok(files)
    }

    /// Decode and label every art file in `art_dir`, in sorted order.
    pub fn art_examples(
        &self,
        art_dir: &Path,
        encoder: &dyn LabelEncoder,
        grayscale: bool,
    ) -> PrepResult<Vec<ArtExample>> {
        let files = self.label_files(art_dir, encoder)?;
        info!("Generating art inputs from {} files", files.len());

        let mut examples = Vec::with_capacity(files.len());
        for file in files {
            let path = art_dir.join(&file.file);
            let image = image::open(&path).map_err(|e| PrepError::image(&path, e))?;
            examples.push(Example::new(
                file.name,
                image_to_array(&image, grayscale),
                file.label,
            ));
        }

        info!("Done: {} art examples", examples.len());
        Ok(examples)
    }

    /// Labelled art files from `art_dir`, partitioned without decoding.
    ///
    /// Assigns each file to the same side as [`Self::art_dataset`].
    pub fn art_listing(
        &self,
        art_dir: &Path,
        encoder: &dyn LabelEncoder,
    ) -> PrepResult<Partition<LabelledFile>> {
        let files = self.label_files(art_dir, encoder)?;
        if files.is_empty() {
            return Err(PrepError::EmptyDataset("art directory has no images"));
        }
        Ok(self.partition(files))
    }

    /// Labelled art from `art_dir`, partitioned.
    pub fn art_dataset(
        &self,
        art_dir: &Path,
        encoder: &dyn LabelEncoder,
        grayscale: bool,
    ) -> PrepResult<Partition<ArtExample>> {
        let examples = self.art_examples(art_dir, encoder, grayscale)?;
        if examples.is_empty() {
            return Err(PrepError::EmptyDataset("art directory has no images"));
        }
        Ok(self.partition(examples))
    }

    /// Every card's padded corpus line, labelled by `labels`.
    pub fn sequence_examples(
        &self,
        sequences: &SequenceEncoder,
        labels: &dyn LabelEncoder,
    ) -> PrepResult<Vec<SequenceExample>> {
        let encoded = sequences.encode_all(self.registry)?;
        Ok(self
            .registry
            .iter()
            .zip(encoded)
            .map(|(card, input)| Example::new(card.name.as_str(), input, labels.encode(card)))
            .collect())
    }

    /// Labelled sequences, partitioned.
    pub fn sequence_dataset(
        &self,
        sequences: &SequenceEncoder,
        labels: &dyn LabelEncoder,
    ) -> PrepResult<Partition<SequenceExample>> {
        let examples = self.sequence_examples(sequences, labels)?;
        if examples.is_empty() {
            return Err(PrepError::EmptyDataset("card dataset has no cards"));
        }
        Ok(self.partition(examples))
    }

    /// Next-character windows over `corpus`, each labelled with the
    /// character that follows it. Not partitioned.
    pub fn window_examples(
        &self,
        sequences: &SequenceEncoder,
        corpus: &str,
    ) -> PrepResult<Vec<SequenceExample>> {
        let windows = sequences.windows(corpus)?;
        if windows.is_empty() {
            return Err(PrepError::EmptyDataset("corpus shorter than one window"));
        }
        Ok(windows
            .inputs
            .into_iter()
            .zip(windows.targets)
            .enumerate()
            .map(|(index, (input, target))| {
                Example::new(format!("window {index}"), input, Label::Class(target as usize))
            })
            .collect())
    }
}
