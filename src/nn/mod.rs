//! Model seam between the pipeline and an external training library.
//!
//! ## Overview
//!
//! - **Input**: `EncodedArray`, a flat array plus its shape
//! - **Traits**: `Classifier`, `SequenceGenerator`
//! - **Baselines**: `UniformClassifier`, `RepeatGenerator` for testing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ccg_dataprep::nn::{argmax, Classifier};
//!
//! let probabilities = model.predict(&example.input);
//! let category = argmax(&probabilities);
//! ```

pub mod traits;

pub use traits::{
    argmax, Classifier, EncodedArray, RepeatGenerator, SequenceGenerator, UniformClassifier,
};
