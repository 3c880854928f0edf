//! Trait for the external object detection collaborator.

use crate::tracker::Detection;

/// Source of per-frame vehicle detections.
///
/// Implement this to connect any detection model to the pipeline. The
/// pipeline imposes nothing beyond the output shape: an empty list is a
/// perfectly valid frame, and a failed call degrades to an empty frame
/// rather than aborting the session.
///
/// # Example
///
/// ```ignore
/// use speedtrack_rs::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Placeholder type for a perception component that failed to initialize.
///
/// Useful as the concrete type behind `Option<...>` when a pipeline runs
/// without a detector or plate reader: `Option::<Disabled>::None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl DetectionSource for Disabled {
    type Error = std::convert::Infallible;

    fn detect(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<Detection>, Self::Error> {
        Ok(vec![])
    }
}
