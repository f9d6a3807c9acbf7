//! Core types shared by every pipeline stage: errors, RNG, configuration.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{
    CropConfig, LabelMode, LabelSource, PipelineConfig, ResampleFilter, SequenceConfig,
    SplitConfig, VocabConfig,
};
pub use error::{PrepError, PrepResult};
pub use rng::{PrepRng, PrepRngState};
