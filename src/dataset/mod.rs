//! Dataset assembly.
//!
//! - `filename`: scan/art filename parsing and sorted directory listings
//! - `assembler`: labelled examples and the seeded train/test split
//! - `example`: example, partition and batch types
//! - `cleanup`: token and split scan removal
//! - `demo`: seeded model demos

pub mod assembler;
pub mod cleanup;
pub mod demo;
pub mod example;
pub mod filename;

pub use assembler::{
    ArtExample, DatasetAssembler, LabelledFile, SequenceExample, SPLIT_CONTEXT,
};
pub use cleanup::{PruneReport, ScanPruner};
pub use demo::{sample_generation, DemoPrediction, DemoReport, LiveDemo};
pub use example::{
    image_to_array, label_matrix, Example, ImageBatch, Partition, SequenceBatch,
    DEFAULT_PIXEL_MEAN, DEFAULT_PIXEL_STD,
};
pub use filename::{card_name, list_files, represents_int, SENTINEL_FILE};
