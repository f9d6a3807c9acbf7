//! Dataset bindings for Python.
//!
//! Arrays are handed over flat and reshaped on the numpy side:
//! - art: `[N, H, W, C]` float32 images, `[N, categories]` float32 labels
//! - names: `[N, max_len]` uint32 windows, `[N]` uint32 next characters

use std::path::Path;

use numpy::{PyArray1, PyArray2, PyArray4, PyArrayMethods};
use pyo3::prelude::*;

use crate::cards::CardRegistry;
use crate::core::{PrepRng, SequenceConfig, SplitConfig};
use crate::dataset::{
    label_matrix, ArtExample, DatasetAssembler, ImageBatch, LiveDemo, DEFAULT_PIXEL_MEAN,
    DEFAULT_PIXEL_STD,
};
use crate::encoding::{build_corpus, CharIndex, LabelEncoder, SequenceEncoder};

use super::py_encoding::{PyCategoryEncoder, PyCharVocabulary};
use super::py_nn::PyClassifier;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

type ArtArrays<'py> = (Bound<'py, PyArray4<f32>>, Bound<'py, PyArray2<f32>>);

fn art_arrays<'py>(
    py: Python<'py>,
    examples: &[ArtExample],
    num_categories: usize,
    normalize: bool,
) -> PyResult<ArtArrays<'py>> {
    if examples.is_empty() {
        return Ok((
            PyArray4::zeros_bound(py, [0, 0, 0, 0], false),
            PyArray2::zeros_bound(py, [0, num_categories], false),
        ));
    }

    let mut batch = ImageBatch::from_examples(examples)?;
    if normalize {
        batch.normalize(DEFAULT_PIXEL_MEAN, DEFAULT_PIXEL_STD);
    }
    let images = PyArray1::from_vec_bound(py, batch.data)
        .reshape(batch.shape)
        .map_err(value_error)?;
    let labels = PyArray1::from_vec_bound(py, label_matrix(examples, num_categories))
        .reshape([examples.len(), num_categories])
        .map_err(value_error)?;
    Ok((images, labels))
}

/// Load cropped art with labels, split into train and test sets.
///
/// Returns `((x, y), (x_test, y_test))`.
#[pyfunction]
#[pyo3(signature = (art_dir, encoder, test_proportion = 0.2, seed = 42, grayscale = false, normalize = false))]
pub fn load_art_dataset<'py>(
    py: Python<'py>,
    art_dir: &str,
    encoder: &PyCategoryEncoder,
    test_proportion: f64,
    seed: u64,
    grayscale: bool,
    normalize: bool,
) -> PyResult<(ArtArrays<'py>, ArtArrays<'py>)> {
    let split = SplitConfig::default().with_test_proportion(test_proportion);
    let assembler = DatasetAssembler::new(&encoder.registry, split, seed)?;
    let partition = assembler.art_dataset(Path::new(art_dir), &encoder.inner, grayscale)?;

    let num_categories = encoder.inner.num_categories();
    Ok((
        art_arrays(py, &partition.train, num_categories, normalize)?,
        art_arrays(py, &partition.test, num_categories, normalize)?,
    ))
}

/// Next-character training windows over a dataset's name corpus.
///
/// Returns `(x, y, vocabulary)`.
#[pyfunction]
#[pyo3(signature = (json_path, max_len = 75, step = 3))]
pub fn load_name_windows<'py>(
    py: Python<'py>,
    json_path: &str,
    max_len: usize,
    step: usize,
) -> PyResult<(
    Bound<'py, PyArray2<CharIndex>>,
    Bound<'py, PyArray1<CharIndex>>,
    PyCharVocabulary,
)> {
    let registry = CardRegistry::load(json_path)?;
    let config = SequenceConfig {
        max_len: Some(max_len),
        window_step: step,
    };
    let encoder = SequenceEncoder::fit(&registry, config)?;
    let windows = encoder.windows(&build_corpus(&registry))?;

    let count = windows.len();
    let inputs: Vec<CharIndex> = windows.inputs.into_iter().flatten().collect();
    let x = PyArray1::from_vec_bound(py, inputs)
        .reshape([count, max_len])
        .map_err(value_error)?;
    let y = PyArray1::from_vec_bound(py, windows.targets);
    Ok((x, y, PyCharVocabulary(encoder.vocabulary().clone())))
}

/// Classify a seeded sample of art with a Python model.
///
/// Returns `[(name, predicted, actual, failed), ...]`; `failed` is set when
/// the classifier raised or returned the wrong number of probabilities.
#[pyfunction]
#[pyo3(signature = (art_dir, encoder, classifier, count = 10, seed = 42, normalize = true))]
pub fn live_demo(
    art_dir: &str,
    encoder: &PyCategoryEncoder,
    classifier: &PyClassifier,
    count: usize,
    seed: u64,
    normalize: bool,
) -> PyResult<Vec<(String, String, String, bool)>> {
    let assembler = DatasetAssembler::new(&encoder.registry, SplitConfig::default(), seed)?;
    let mut demo = LiveDemo::new(&assembler, &encoder.inner);
    if normalize {
        demo = demo.with_normalization(DEFAULT_PIXEL_MEAN, DEFAULT_PIXEL_STD);
    }

    let mut rng = PrepRng::new(seed).for_context("demo");
    let report = demo.run(Path::new(art_dir), classifier, count, &mut rng)?;
    Ok(report
        .predictions
        .into_iter()
        .map(|p| (p.name, p.predicted, p.actual, p.failed))
        .collect())
}
