//! Model seam bindings for Python.

use numpy::{PyArray1, PyArrayMethods};
use pyo3::prelude::*;
use tracing::warn;

use crate::nn::{Classifier, EncodedArray};

/// Python wrapper for EncodedArray.
#[pyclass(name = "EncodedArray")]
#[derive(Clone, Debug)]
pub struct PyEncodedArray(pub EncodedArray);

#[pymethods]
impl PyEncodedArray {
    /// Create an array from flat data and a shape.
    #[new]
    fn new(data: Vec<f32>, shape: Vec<usize>) -> PyResult<Self> {
        if data.len() != shape.iter().product::<usize>() {
            return Err(pyo3::exceptions::PyValueError::new_err(format!(
                "data length {} does not match shape {:?}",
                data.len(),
                shape
            )));
        }
        Ok(Self(EncodedArray::new(data, shape)))
    }

    /// Get the shape.
    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.0.shape.clone()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Convert to a numpy array with the stored shape.
    fn to_numpy<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let array = PyArray1::from_slice_bound(py, &self.0.data)
            .reshape(self.0.shape.clone())
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        Ok(array.into_any())
    }

    fn __repr__(&self) -> String {
        format!("EncodedArray(shape={:?})", self.0.shape)
    }
}

/// Python-implemented classifier.
///
/// Wraps a callable taking an `EncodedArray` and returning a list of
/// category probabilities, so a model trained in Python can drive the demo.
#[pyclass(name = "Classifier")]
pub struct PyClassifier {
    callback: PyObject,
    num_categories: usize,
}

#[pymethods]
impl PyClassifier {
    /// Wrap a Python callable.
    #[new]
    fn new(callback: PyObject, num_categories: usize) -> Self {
        Self {
            callback,
            num_categories,
        }
    }

    /// Call the model on one input.
    fn predict(&self, py: Python<'_>, input: &PyEncodedArray) -> PyResult<Vec<f32>> {
        self.callback.call1(py, (input.clone(),))?.extract(py)
    }

    #[getter]
    fn num_categories(&self) -> usize {
        self.num_categories
    }
}

impl Classifier for PyClassifier {
    fn predict(&self, input: &EncodedArray) -> Vec<f32> {
        Python::with_gil(|py| {
            let wrapped = PyEncodedArray(input.clone());
            match self
                .callback
                .call1(py, (wrapped,))
                .and_then(|result| result.extract::<Vec<f32>>(py))
            {
                Ok(probabilities) => probabilities,
                // An empty result marks the prediction as failed downstream
                Err(e) => {
                    warn!("Classifier callback failed: {}", e);
                    Vec::new()
                }
            }
        })
    }
}

// SAFETY: every access to `callback` goes through `Python::with_gil`, and
// `PyObject` reference counting is sound under the GIL. `num_categories` is
// plain data.
unsafe impl Send for PyClassifier {}
unsafe impl Sync for PyClassifier {}
