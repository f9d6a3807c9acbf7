//! Examples, train/test partitions and dense batches.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{PrepError, PrepResult, PrepRng};
use crate::encoding::{CharIndex, Label};
use crate::nn::EncodedArray;

/// Featurewise mean of card-art pixels.
pub const DEFAULT_PIXEL_MEAN: f32 = 102.597;

/// Featurewise standard deviation of card-art pixels.
pub const DEFAULT_PIXEL_STD: f32 = 65.908;

/// One encoded input with its label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example<I> {
    /// Card name the example was derived from.
    pub name: String,
    /// Encoded input.
    pub input: I,
    /// Encoded label.
    pub label: Label,
}

impl<I> Example<I> {
    /// Create an example.
    pub fn new(name: impl Into<String>, input: I, label: Label) -> Self {
        Self {
            name: name.into(),
            input,
            label,
        }
    }
}

/// Train and test sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partition<T> {
    /// Training examples.
    pub train: Vec<T>,
    /// Held-out examples.
    pub test: Vec<T>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            train: Vec::new(),
            test: Vec::new(),
        }
    }
}

impl<T> Partition<T> {
    /// Send each item to the test set with probability `test_proportion`.
    ///
    /// One draw per item, in input order. Set sizes follow the proportion
    /// only in expectation.
    pub fn bernoulli(items: Vec<T>, test_proportion: f64, rng: &mut PrepRng) -> Self {
        let mut partition = Self::default();
        for item in items {
            if rng.gen_bool(test_proportion) {
                partition.test.push(item);
            } else {
                partition.train.push(item);
            }
        }
        debug!(
            "Partitioned into {} train / {} test",
            partition.train.len(),
            partition.test.len()
        );
        partition
    }

    /// Shuffle the training set in place.
    pub fn shuffle_train(&mut self, rng: &mut PrepRng) {
        rng.shuffle(&mut self.train);
    }

    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Whether both sets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Pixel values of an image as `height × width × channels` floats.
#[must_use]
pub fn image_to_array(image: &DynamicImage, grayscale: bool) -> EncodedArray {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if grayscale {
        let pixels = image.to_luma8();
        let data = pixels.as_raw().iter().map(|&v| f32::from(v)).collect();
        EncodedArray::new(data, vec![height, width, 1])
    } else {
        let pixels = image.to_rgb8();
        let data = pixels.as_raw().iter().map(|&v| f32::from(v)).collect();
        EncodedArray::new(data, vec![height, width, 3])
    }
}

/// Stacked images, `count × height × width × channels`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch {
    /// Flattened pixel data.
    pub data: Vec<f32>,
    /// `[count, height, width, channels]`.
    pub shape: [usize; 4],
}

impl ImageBatch {
    /// Stack the inputs of `examples`; every image must share one shape.
    pub fn from_examples(examples: &[Example<EncodedArray>]) -> PrepResult<Self> {
        let first = examples
            .first()
            .ok_or(PrepError::EmptyDataset("no images to batch"))?;
        let [height, width, channels] = match first.input.shape[..] {
            [h, w, c] => [h, w, c],
            _ => {
                return Err(PrepError::InvalidConfig(format!(
                    "expected a 3-d image array, got shape {:?}",
                    first.input.shape
                )))
            }
        };

        let mut data = Vec::with_capacity(examples.len() * first.input.len());
        for example in examples {
            if example.input.shape != first.input.shape {
                return Err(PrepError::InvalidConfig(format!(
                    "{} has shape {:?}, expected {:?}",
                    example.name, example.input.shape, first.input.shape
                )));
            }
            data.extend_from_slice(&example.input.data);
        }

        Ok(Self {
            data,
            shape: [examples.len(), height, width, channels],
        })
    }

    /// Number of images.
    #[must_use]
    pub fn count(&self) -> usize {
        self.shape[0]
    }

    /// Featurewise normalization, `(x - mean) / std`.
    pub fn normalize(&mut self, mean: f32, std: f32) {
        for value in &mut self.data {
            *value = (*value - mean) / std;
        }
    }
}

/// Stacked sequences, `count × len`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceBatch {
    /// Flattened indices.
    pub data: Vec<CharIndex>,
    /// `[count, len]`.
    pub shape: [usize; 2],
}

impl SequenceBatch {
    /// Stack equally long sequences.
    pub fn from_examples(examples: &[Example<Vec<CharIndex>>]) -> PrepResult<Self> {
        let len = examples
            .first()
            .ok_or(PrepError::EmptyDataset("no sequences to batch"))?
            .input
            .len();
        let mut data = Vec::with_capacity(examples.len() * len);
        for example in examples {
            if example.input.len() != len {
                return Err(PrepError::InvalidConfig(format!(
                    "{} has length {}, expected {}",
                    example.name,
                    example.input.len(),
                    len
                )));
            }
            data.extend_from_slice(&example.input);
        }
        Ok(Self {
            data,
            shape: [examples.len(), len],
        })
    }
}

/// Labels as a dense `count × num_categories` matrix.
#[must_use]
pub fn label_matrix<I>(examples: &[Example<I>], num_categories: usize) -> Vec<f32> {
    examples
        .iter()
        .flat_map(|e| e.label.to_vector(num_categories))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_partition_extremes() {
        let mut rng = PrepRng::new(1);
        let all_train = Partition::bernoulli((0..20).collect::<Vec<u32>>(), 0.0, &mut rng);
        assert_eq!(all_train.train.len(), 20);
        assert!(all_train.test.is_empty());

        let all_test = Partition::bernoulli((0..20).collect::<Vec<u32>>(), 1.0, &mut rng);
        assert_eq!(all_test.test.len(), 20);
    }

    #[test]
    fn test_partition_keeps_order_and_items() {
        let mut rng = PrepRng::new(9);
        let partition = Partition::bernoulli((0..100).collect::<Vec<u32>>(), 0.3, &mut rng);

        assert_eq!(partition.len(), 100);
        assert!(partition.train.windows(2).all(|w| w[0] < w[1]));
        assert!(partition.test.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_shuffle_train_is_permutation() {
        let mut rng = PrepRng::new(3);
        let mut partition = Partition::bernoulli((0..30).collect::<Vec<u32>>(), 0.0, &mut rng);
        partition.shuffle_train(&mut rng);

        let mut sorted = partition.train.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_image_to_array_rgb() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb([1, 2, 3]));
        let array = image_to_array(&DynamicImage::ImageRgb8(image), false);

        assert_eq!(array.shape, vec![1, 2, 3]);
        assert_eq!(array.data, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_image_to_array_gray() {
        let image = GrayImage::from_pixel(3, 2, Luma([7]));
        let array = image_to_array(&DynamicImage::ImageLuma8(image), true);

        assert_eq!(array.shape, vec![2, 3, 1]);
        assert!(array.data.iter().all(|&v| v == 7.0));
    }

    #[test]
    fn test_image_batch_and_normalize() {
        let examples = vec![
            Example::new("a", EncodedArray::new(vec![10.0; 4], vec![2, 2, 1]), Label::Class(0)),
            Example::new("b", EncodedArray::new(vec![30.0; 4], vec![2, 2, 1]), Label::Class(1)),
        ];
        let mut batch = ImageBatch::from_examples(&examples).unwrap();
        assert_eq!(batch.shape, [2, 2, 2, 1]);
        assert_eq!(batch.count(), 2);

        batch.normalize(20.0, 10.0);
        assert_eq!(&batch.data[..4], &[-1.0; 4]);
        assert_eq!(&batch.data[4..], &[1.0; 4]);
    }

    #[test]
    fn test_image_batch_rejects_mixed_shapes() {
        let examples = vec![
            Example::new("a", EncodedArray::zeros(vec![2, 2, 1]), Label::Class(0)),
            Example::new("b", EncodedArray::zeros(vec![2, 2, 3]), Label::Class(0)),
        ];
        assert!(ImageBatch::from_examples(&examples).is_err());
        assert!(matches!(
            ImageBatch::from_examples(&[]),
            Err(PrepError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_sequence_batch() {
        let examples = vec![
            Example::new("a", vec![1, 2, 0], Label::Class(0)),
            Example::new("b", vec![3, 0, 0], Label::Class(1)),
        ];
        let batch = SequenceBatch::from_examples(&examples).unwrap();
        assert_eq!(batch.shape, [2, 3]);
        assert_eq!(batch.data, vec![1, 2, 0, 3, 0, 0]);

        assert_eq!(
            label_matrix(&examples, 2),
            vec![1.0, 0.0, 0.0, 1.0]
        );
    }
}
