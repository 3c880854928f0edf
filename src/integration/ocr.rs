//! Trait for the external plate recognition collaborator.

use crate::integration::detector::Disabled;
use crate::tracker::Rect;
use crate::violation::PlateCandidate;

/// Reads a license plate out of a vehicle's image region.
///
/// The pipeline applies its own acceptance floor to whatever this returns,
/// independent of any thresholding the OCR engine does internally. A
/// failed call is logged and counts as an attempt with no read; the
/// vehicle simply retries next frame within its budget.
pub trait PlateReader {
    /// Error type for read failures.
    type Error;

    /// Attempt to read a plate from the vehicle's region of the frame.
    ///
    /// Returns `Ok(None)` when no plausible plate text was found.
    fn read_plate(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
        vehicle_bbox: Rect,
    ) -> Result<Option<PlateCandidate>, Self::Error>;
}

impl PlateReader for Disabled {
    type Error = std::convert::Infallible;

    fn read_plate(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
        _vehicle_bbox: Rect,
    ) -> Result<Option<PlateCandidate>, Self::Error> {
        Ok(None)
    }
}
