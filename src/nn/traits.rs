//! Interface to the external training library.
//!
//! The pipeline never trains anything itself. These traits describe what a
//! trained model must offer so the demo and tests can drive one:
//! `Classifier` for art-to-type models and `SequenceGenerator` for
//! character-level name generators.

use serde::{Deserialize, Serialize};

/// Encoded model input as a flat array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedArray {
    /// Flattened data (row-major order).
    pub data: Vec<f32>,

    /// Shape of the array (e.g., [height, width, channels] or [length]).
    pub shape: Vec<usize>,
}

impl EncodedArray {
    /// Create a new encoded array.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            data.len(),
            shape.iter().product::<usize>(),
            "Data length must match shape product"
        );
        Self { data, shape }
    }

    /// Create a zero-filled array with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            data: vec![0.0; size],
            shape,
        }
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }
}

/// A trained classifier.
///
/// Returns a probability vector over the label vocabulary. A vector of any
/// other length (empty, say, when the backend errors) marks a failed
/// prediction.
pub trait Classifier: Send + Sync {
    /// Predict category probabilities for one input.
    fn predict(&self, input: &EncodedArray) -> Vec<f32>;

    /// Batch prediction for multiple inputs (optional optimization).
    fn predict_batch(&self, inputs: &[EncodedArray]) -> Vec<Vec<f32>> {
        inputs.iter().map(|i| self.predict(i)).collect()
    }
}

/// A trained character-level generator.
pub trait SequenceGenerator: Send + Sync {
    /// Generate `length` characters continuing from `seed`.
    fn generate(&self, length: usize, seed: &str) -> String;
}

/// Index of the largest probability. Ties go to the lowest index.
#[must_use]
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &p) in probabilities.iter().enumerate() {
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((index, p)),
        }
    }
    best.map(|(index, _)| index)
}

/// Uniform classifier (baseline for testing).
#[derive(Clone, Debug, Default)]
pub struct UniformClassifier {
    num_categories: usize,
}

impl UniformClassifier {
    /// Create a new uniform classifier.
    pub fn new(num_categories: usize) -> Self {
        Self { num_categories }
    }
}

impl Classifier for UniformClassifier {
    fn predict(&self, _input: &EncodedArray) -> Vec<f32> {
        if self.num_categories == 0 {
            return vec![];
        }
        let prob = 1.0 / self.num_categories as f32;
        vec![prob; self.num_categories]
    }
}

/// Generator that cycles through its seed (baseline for testing).
#[derive(Clone, Copy, Debug, Default)]
pub struct RepeatGenerator;

impl SequenceGenerator for RepeatGenerator {
    fn generate(&self, length: usize, seed: &str) -> String {
        seed.chars().cycle().take(length).collect()
    }
}
