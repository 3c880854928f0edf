//! Trait for the downstream violation consumer.

use serde::Serialize;

use crate::violation::ViolationRecord;

/// A captured violation plus the camera context the downstream side needs.
///
/// This is the full field set a consumer forwards (screenshot capture and
/// the actual transport are the sink's concern); no wire format is
/// mandated, but the notice serializes directly for JSON transports.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationNotice<'a> {
    pub camera_id: &'a str,
    pub location: &'a str,
    pub record: &'a ViolationRecord,
}

/// Consumes emitted violations: screenshot capture, persistence, the
/// downstream enforcement notification.
///
/// Failures here are logged at the call boundary and never propagate into
/// pipeline state; a lost notification costs that one record, nothing else.
pub trait ViolationSink {
    /// Error type for publish failures.
    type Error;

    fn publish(&mut self, notice: &ViolationNotice<'_>) -> Result<(), Self::Error>;
}

/// Sink that drops every notice; handy for dry runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ViolationSink for NullSink {
    type Error = std::convert::Infallible;

    fn publish(&mut self, _notice: &ViolationNotice<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;
    use crate::violation::{pick_violation_code, Plate};

    #[test]
    fn test_notice_serializes_with_tagged_plate() {
        let code = pick_violation_code(12.0);
        let record = ViolationRecord {
            track_id: 3,
            plate: Plate::Recognized {
                text: "ABC1234".into(),
                confidence: 0.82,
            },
            speed_mph: 42.0,
            speed_limit_mph: 30.0,
            mph_over: 12.0,
            code,
            points: code.points(),
            bbox: Rect::new(100.0, 120.0, 60.0, 40.0),
            timestamp: 4.2,
        };
        let notice = ViolationNotice {
            camera_id: "CAM-1",
            location: "Times Square, Manhattan",
            record: &record,
        };

        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["camera_id"], "CAM-1");
        assert_eq!(json["record"]["plate"]["source"], "recognized");
        assert_eq!(json["record"]["plate"]["text"], "ABC1234");
        assert_eq!(json["record"]["code"], "B");
        assert_eq!(json["record"]["points"], 3);

        let fallback = ViolationRecord {
            plate: Plate::Synthesized {
                text: "NY00003".into(),
            },
            ..record
        };
        let json = serde_json::to_value(&fallback).unwrap();
        assert_eq!(json["plate"]["source"], "synthesized");
        assert!(json["plate"].get("confidence").is_none());
    }
}
