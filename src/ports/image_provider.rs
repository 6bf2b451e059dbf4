//! Image provider port for sketch-to-frame generation backends.

use std::future::Future;
use std::pin::Pin;

use crate::codec::EncodedImage;
use crate::error::BoardError;

/// One generation or edit submission: the fully composed instruction text
/// plus the source image it applies to.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Composed instruction text (template + style block + content).
    pub prompt: String,
    /// The sketch or prior frame driving the composition.
    pub image: EncodedImage,
}

/// Boxed future type returned by [`ImageProvider::submit`].
pub type SubmitFuture<'a> =
    Pin<Box<dyn Future<Output = Result<EncodedImage, BoardError>> + Send + 'a>>;

/// Submits one generation/edit request to a backend and normalizes its
/// result into a single encoded image.
///
/// The two implementations differ in control flow (one blocking call vs.
/// submit-then-poll) but present the same contract; which one a deployment
/// uses is decided once at configuration time.
pub trait ImageProvider: Send + Sync {
    /// Submit the request and drive it to a single normalized image.
    fn submit(&self, request: &SubmitRequest) -> SubmitFuture<'_>;
}
