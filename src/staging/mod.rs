//! Edit session state for the deferred settings group

pub mod buffer;
pub mod resolution;
pub mod tracked;

pub use buffer::StagedEditBuffer;
pub use resolution::{Resolution, ResolutionSelector};
pub use tracked::TrackedField;
