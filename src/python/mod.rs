//! Python bindings for ccg-dataprep.
//!
//! Hands the prepared arrays to a Python training library as numpy arrays.
//!
//! # Quick Start
//!
//! ```python
//! import ccg_dataprep as prep
//!
//! encoder = prep.CategoryEncoder("cards.json", mode="primary_type", cutoff=500)
//! (x, y), (x_test, y_test) = prep.load_art_dataset("art/", encoder, seed=42)
//!
//! x_names, y_names, chars = prep.load_name_windows("cards.json", max_len=75)
//! ```

use pyo3::prelude::*;

use crate::core::PrepError;

mod py_dataset;
mod py_encoding;
mod py_nn;

pub use py_dataset::*;
pub use py_encoding::*;
pub use py_nn::*;

impl From<PrepError> for PyErr {
    fn from(e: PrepError) -> Self {
        match e {
            PrepError::Io { .. } => pyo3::exceptions::PyIOError::new_err(e.to_string()),
            _ => pyo3::exceptions::PyValueError::new_err(e.to_string()),
        }
    }
}

/// ccg_dataprep: card-art and card-text datasets for training.
#[pymodule]
fn ccg_dataprep(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Encoding
    m.add_class::<PyCharVocabulary>()?;
    m.add_class::<PyCategoryEncoder>()?;

    // Model seam
    m.add_class::<PyEncodedArray>()?;
    m.add_class::<PyClassifier>()?;

    // Datasets
    m.add_function(wrap_pyfunction!(load_art_dataset, m)?)?;
    m.add_function(wrap_pyfunction!(load_name_windows, m)?)?;
    m.add_function(wrap_pyfunction!(live_demo, m)?)?;

    Ok(())
}
