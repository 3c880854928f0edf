/// Bounding box representation in TLWH format.
///
/// Detector output and everything downstream share one convention:
/// top-left corner plus width/height, all in pixels.
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Geometric center of the box, the tracker's matching feature.
    #[inline]
    pub fn centroid(&self) -> Point2<f32> {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the box has positive extent in both dimensions.
    #[inline]
    pub fn has_positive_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Whether the box lies fully inside a frame of the given dimensions.
    pub fn within_frame(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= frame_width as f32
            && self.y + self.height <= frame_height as f32
    }
}
