//! Sketch description port.
//!
//! A single stateless vision call used to pre-fill the scene text from an
//! uploaded sketch. External collaborator of the generation core.

use std::future::Future;
use std::pin::Pin;

use crate::codec::EncodedImage;
use crate::error::BoardError;

/// Boxed future type returned by [`SketchDescriber::describe`].
pub type DescribeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, BoardError>> + Send + 'a>>;

/// Produces a short text description of a sketch.
pub trait SketchDescriber: Send + Sync {
    /// Describe the given sketch.
    fn describe(&self, image: &EncodedImage) -> DescribeFuture<'_>;
}
