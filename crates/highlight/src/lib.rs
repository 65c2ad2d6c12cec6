//! Highlight Crate - Synchronized emphasis of repeated expression ids
//!
//! This crate provides:
//! - An occurrence registry filled while a document is rendered
//! - Highlight modes and the reader context they depend on
//! - A coordinator selecting in-scope occurrences for an id
//! - Configurable keyboard bindings

pub mod coordinator;
pub mod error;
pub mod keys;
pub mod mode;
pub mod registry;

pub use coordinator::{HighlightCoordinator, HighlightSet};
pub use error::*;
pub use keys::{KeyAction, KeyBindings};
pub use mode::{HighlightContext, HighlightMode};
pub use registry::{HandleId, HighlightRegistry, Occurrence, OccurrenceScope, ProofNodeRef};
