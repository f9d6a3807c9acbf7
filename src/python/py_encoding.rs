//! Vocabulary bindings for Python.

use pyo3::prelude::*;

use crate::cards::CardRegistry;
use crate::core::{LabelSource, VocabConfig};
use crate::encoding::{build_corpus, pad, CategoryEncoder, CharIndex, CharVocabulary, LabelEncoder};

/// Python wrapper for CharVocabulary.
#[pyclass(name = "CharVocabulary")]
#[derive(Clone)]
pub struct PyCharVocabulary(pub CharVocabulary);

#[pymethods]
impl PyCharVocabulary {
    /// Build from a corpus string.
    #[new]
    fn new(corpus: &str) -> Self {
        Self(CharVocabulary::build(corpus))
    }

    /// Build from the name corpus of a card dataset.
    #[staticmethod]
    fn from_dataset(json_path: &str) -> PyResult<Self> {
        let registry = CardRegistry::load(json_path)?;
        Ok(Self(CharVocabulary::build(&build_corpus(&registry))))
    }

    /// Restore a saved vocabulary.
    #[staticmethod]
    fn load(path: &str) -> PyResult<Self> {
        Ok(Self(CharVocabulary::load(path)?))
    }

    /// Save to a bincode file.
    fn save(&self, path: &str) -> PyResult<()> {
        Ok(self.0.save(path)?)
    }

    /// Encode text, optionally padded/truncated to `length`.
    #[pyo3(signature = (text, length = None))]
    fn encode(&self, text: &str, length: Option<usize>) -> PyResult<Vec<CharIndex>> {
        let encoded = self.0.encode(text)?;
        Ok(match length {
            Some(length) => pad(&encoded, length),
            None => encoded,
        })
    }

    /// Decode indices, dropping padding.
    fn decode(&self, indices: Vec<CharIndex>) -> String {
        self.0.decode(&indices)
    }

    /// Characters in index order (index = position + 1).
    #[getter]
    fn chars(&self) -> Vec<char> {
        self.0.chars().to_vec()
    }

    /// Width of the index space, padding included.
    #[getter]
    fn num_indices(&self) -> usize {
        self.0.num_indices()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!("CharVocabulary(len={})", self.0.len())
    }
}

/// Python wrapper for a fitted CategoryEncoder.
#[pyclass(name = "CategoryEncoder")]
pub struct PyCategoryEncoder {
    pub(crate) inner: CategoryEncoder,
    pub(crate) registry: CardRegistry,
}

#[pymethods]
impl PyCategoryEncoder {
    /// Fit on a card dataset.
    ///
    /// `mode` is `"primary_type"` or `"multi_hot"`; `subtypes` adds subtypes
    /// to the multi-hot label space.
    #[new]
    #[pyo3(signature = (json_path, mode = "primary_type", cutoff = 500, subtypes = true))]
    fn new(json_path: &str, mode: &str, cutoff: usize, subtypes: bool) -> PyResult<Self> {
        let config = match mode {
            "primary_type" => VocabConfig::primary_type(cutoff),
            "multi_hot" => {
                let source = if subtypes {
                    LabelSource::TypesAndSubtypes
                } else {
                    LabelSource::Types
                };
                VocabConfig::multi_hot(source).with_cutoff(cutoff)
            }
            other => {
                return Err(pyo3::exceptions::PyValueError::new_err(format!(
                    "unknown label mode {other:?}"
                )))
            }
        };
        let registry = CardRegistry::load(json_path)?;
        let inner = CategoryEncoder::fit(&registry, &config);
        Ok(Self { inner, registry })
    }

    /// Label vector of the card called `name` (fallback when unknown).
    fn encode(&self, name: &str) -> Vec<f32> {
        self.inner
            .encode_name(&self.registry, name)
            .to_vector(self.inner.num_categories())
    }

    /// Name of a category index.
    fn label_of(&self, index: usize) -> Option<String> {
        self.inner.label_of(index).map(str::to_string)
    }

    /// Index of a label, if it kept its own slot.
    fn index_of(&self, label: &str) -> Option<usize> {
        self.inner.vocabulary().index_of(label)
    }

    /// Save the vocabulary to a bincode file.
    fn save_vocabulary(&self, path: &str) -> PyResult<()> {
        Ok(self.inner.vocabulary().save(path)?)
    }

    #[getter]
    fn num_categories(&self) -> usize {
        self.inner.num_categories()
    }

    fn __repr__(&self) -> String {
        format!(
            "CategoryEncoder(categories={})",
            self.inner.num_categories()
        )
    }
}
