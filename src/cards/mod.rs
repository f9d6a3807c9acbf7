//! Card dataset: definitions, registry, and summaries.
//!
//! ## Key Types
//!
//! - `Card`: Types, subtypes, rules text and layout of one card
//! - `Layout`: Layout tag; tokens and split cards get special handling
//! - `CardRegistry`: Name-ordered, read-only card collection
//!
//! The dataset is loaded once per run and never mutated afterwards.

pub mod definition;
pub mod registry;
pub mod summary;

pub use definition::{Card, LabelList, Layout};
pub use registry::CardRegistry;
pub use summary::{subtype_list, types_to_subtypes};
