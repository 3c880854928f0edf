//! Builder for creating Detection objects from model-specific output.

use crate::tracker::{Detection, Rect, VehicleClass};

/// Builder bridging detector output formats to [`Detection`].
///
/// Detection models disagree on box conventions (YOLO emits corner pairs,
/// others center+size); this normalizes them to TLWH and maps raw class
/// ids onto the vehicle classes the pipeline tracks.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    bbox: Rect,
    class: Option<VehicleClass>,
    confidence: f32,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in TLWH format (top-left x, top-left y, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    /// Set bounding box in XYWH format (center x, center y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(cx - w / 2.0, cy - h / 2.0, w, h);
        self
    }

    pub fn class(mut self, class: VehicleClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the class from a raw COCO class id; non-vehicle ids leave the
    /// class unset and `build` will reject the detection.
    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class = VehicleClass::from_class_id(class_id);
        self
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Build the final [`Detection`], or `None` for non-vehicle classes.
    pub fn build(self) -> Option<Detection> {
        Some(Detection::new(self.bbox, self.class?, self.confidence))
    }
}
