//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and a
//! generation backend. Implementations live in `src/adapters/`.

pub mod describer;
pub mod image_provider;

pub use describer::SketchDescriber;
pub use image_provider::{ImageProvider, SubmitRequest};
