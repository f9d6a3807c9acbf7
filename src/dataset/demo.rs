//! Small seeded demos of a trained model.
//!
//! `LiveDemo` classifies a random handful of art files and reports the
//! prediction next to the card's actual label. `sample_generation` primes a
//! generator with a random corpus slice.

use std::path::Path;

use tracing::{info, warn};

use super::assembler::DatasetAssembler;
use super::example::image_to_array;
use super::filename::{card_name, file_name_of, list_files};
use crate::core::{PrepError, PrepResult, PrepRng};
use crate::encoding::{generation_seed, Label, LabelEncoder};
use crate::nn::{argmax, Classifier, SequenceGenerator};

/// Label used when an index has no name.
const UNKNOWN: &str = "?";

/// One classified art file.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoPrediction {
    /// Art filename.
    pub file: String,
    /// Card name parsed from the filename.
    pub name: String,
    /// Highest-probability label.
    pub predicted: String,
    /// Probability of the predicted label.
    pub confidence: f32,
    /// The card's encoded label, as text.
    pub actual: String,
    /// Whether the prediction matches.
    pub correct: bool,
    /// The model returned no usable probabilities for this file.
    pub failed: bool,
}

/// All predictions of one demo run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemoReport {
    /// Predictions in sample order.
    pub predictions: Vec<DemoPrediction>,
}

impl DemoReport {
    /// Number of correct predictions.
    #[must_use]
    pub fn correct(&self) -> usize {
        self.predictions.iter().filter(|p| p.correct).count()
    }

    /// Number of files the model failed to classify.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.predictions.iter().filter(|p| p.failed).count()
    }

    /// Fraction of correct predictions; 0 for an empty report.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        self.correct() as f64 / self.predictions.len() as f64
    }
}

fn describe(label: &Label, encoder: &dyn LabelEncoder) -> String {
    match label {
        Label::Class(index) => encoder.label_of(*index).unwrap_or(UNKNOWN).to_string(),
        Label::MultiHot(bits) => bits
            .iter()
            .enumerate()
            .filter(|&(_, &bit)| bit == 1)
            .map(|(index, _)| encoder.label_of(index).unwrap_or(UNKNOWN))
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn is_hit(label: &Label, predicted: usize) -> bool {
    match label {
        Label::Class(index) => *index == predicted,
        Label::MultiHot(bits) => bits.get(predicted) == Some(&1),
    }
}

/// Classifies a seeded sample of art files.
pub struct LiveDemo<'a> {
    assembler: &'a DatasetAssembler<'a>,
    encoder: &'a dyn LabelEncoder,
    grayscale: bool,
    normalize: Option<(f32, f32)>,
}

impl<'a> LiveDemo<'a> {
    /// Create a demo over the assembler's registry.
    pub fn new(assembler: &'a DatasetAssembler<'a>, encoder: &'a dyn LabelEncoder) -> Self {
        Self {
            assembler,
            encoder,
            grayscale: false,
            normalize: None,
        }
    }

    /// Decode art as single-channel.
    #[must_use]
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Normalize inputs with `(x - mean) / std` before prediction.
    #[must_use]
    pub fn with_normalization(mut self, mean: f32, std: f32) -> Self {
        self.normalize = Some((mean, std));
        self
    }

    /// Classify `count` art files drawn without replacement from `art_dir`.
    pub fn run(
        &self,
        art_dir: &Path,
        model: &dyn Classifier,
        count: usize,
        rng: &mut PrepRng,
    ) -> PrepResult<DemoReport> {
        let files = list_files(art_dir)?;
        if files.is_empty() {
            return Err(PrepError::EmptyDataset("art directory has no images"));
        }
        let subset = rng.sample(&files, count);
        info!("Generating live demo subset of {}", subset.len());

        let mut inputs = Vec::with_capacity(subset.len());
        for path in &subset {
            let image = image::open(path).map_err(|e| PrepError::image(path, e))?;
            let mut input = image_to_array(&image, self.grayscale);
            if let Some((mean, std)) = self.normalize {
                for value in &mut input.data {
                    *value = (*value - mean) / std;
                }
            }
            inputs.push(input);
        }

        let mut report = DemoReport::default();
        for (path, probabilities) in subset.iter().zip(model.predict_batch(&inputs)) {
            let file = file_name_of(path);
            let actual = self.assembler.label_file(file, self.encoder);
            let failed = probabilities.len() != self.encoder.num_categories();
            let predicted = if failed {
                None
            } else {
                argmax(&probabilities)
            };

            report.predictions.push(DemoPrediction {
                file: file.to_string(),
                name: card_name(file).to_string(),
                predicted: predicted
                    .and_then(|i| self.encoder.label_of(i))
                    .unwrap_or(UNKNOWN)
                    .to_string(),
                confidence: predicted
                    .and_then(|i| probabilities.get(i).copied())
                    .unwrap_or(0.0),
                actual: describe(&actual, self.encoder),
                correct: predicted.is_some_and(|i| is_hit(&actual, i)),
                failed,
            });
        }

        let failures = report.failures();
        if failures > 0 {
            warn!(
                "Model returned no usable prediction for {}/{} files",
                failures,
                report.predictions.len()
            );
        }

        info!(
            "Demo accuracy: {}/{}",
            report.correct(),
            report.predictions.len()
        );
        Ok(report)
    }
}

/// Generate `length` characters from a random `max_len` slice of `corpus`.
///
/// Returns the seed and the generated text, or `None` when the corpus is
/// too short to seed from.
pub fn sample_generation(
    generator: &dyn SequenceGenerator,
    corpus: &str,
    max_len: usize,
    length: usize,
    rng: &mut PrepRng,
) -> Option<(String, String)> {
    let seed = generation_seed(corpus, max_len, rng)?;
    let generated = generator.generate(length, &seed);
    Some((seed, generated))
}
