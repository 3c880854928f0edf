//! Detector output consumed by the tracker.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::tracker::rect::Rect;

/// Vehicle classes the enforcement pipeline cares about.
///
/// The numeric ids follow the COCO class indices the upstream detector
/// reports (car=2, motorcycle=3, bus=5, truck=7); everything else is
/// discarded before reaching the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleClass {
    Car,
    Motorcycle,
    Bus,
    Truck,
}

impl VehicleClass {
    /// Map a COCO class id to a vehicle class, if it is one we track.
    pub fn from_class_id(class_id: u32) -> Option<Self> {
        match class_id {
            2 => Some(VehicleClass::Car),
            3 => Some(VehicleClass::Motorcycle),
            5 => Some(VehicleClass::Bus),
            7 => Some(VehicleClass::Truck),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Motorcycle => "motorcycle",
            VehicleClass::Bus => "bus",
            VehicleClass::Truck => "truck",
        }
    }
}

/// One detection from the external model, valid for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLWH format
    pub bbox: Rect,
    /// Detected vehicle class
    pub class: VehicleClass,
    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: Rect, class: VehicleClass, confidence: f32) -> Self {
        Self {
            bbox,
            class,
            confidence,
        }
    }

    /// Whether the detection is usable: positive extent, inside the frame.
    pub fn is_well_formed(&self, frame_width: u32, frame_height: u32) -> bool {
        self.validate(frame_width, frame_height).is_ok()
    }

    /// Check the detection against the frame it supposedly came from.
    pub fn validate(&self, frame_width: u32, frame_height: u32) -> Result<(), Error> {
        if !self.bbox.has_positive_size() {
            return Err(Error::MalformedDetection {
                reason: format!(
                    "non-positive bbox size {}x{}",
                    self.bbox.width, self.bbox.height
                ),
            });
        }
        if !self.bbox.within_frame(frame_width, frame_height) {
            return Err(Error::MalformedDetection {
                reason: format!(
                    "bbox ({}, {}, {}, {}) outside {}x{} frame",
                    self.bbox.x,
                    self.bbox.y,
                    self.bbox.width,
                    self.bbox.height,
                    frame_width,
                    frame_height
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_mapping() {
        assert_eq!(VehicleClass::from_class_id(2), Some(VehicleClass::Car));
        assert_eq!(
            VehicleClass::from_class_id(3),
            Some(VehicleClass::Motorcycle)
        );
        assert_eq!(VehicleClass::from_class_id(5), Some(VehicleClass::Bus));
        assert_eq!(VehicleClass::from_class_id(7), Some(VehicleClass::Truck));
        assert_eq!(VehicleClass::from_class_id(0), None);
        assert_eq!(VehicleClass::from_class_id(4), None);
    }

    #[test]
    fn test_well_formed() {
        let det = Detection::new(Rect::new(10.0, 10.0, 40.0, 40.0), VehicleClass::Car, 0.9);
        assert!(det.is_well_formed(640, 480));

        let outside = Detection::new(Rect::new(620.0, 10.0, 40.0, 40.0), VehicleClass::Car, 0.9);
        assert!(!outside.is_well_formed(640, 480));

        let empty = Detection::new(Rect::new(10.0, 10.0, 0.0, 40.0), VehicleClass::Car, 0.9);
        assert!(!empty.is_well_formed(640, 480));
    }
}
