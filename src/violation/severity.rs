//! Tiered severity mapping for speeding violations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tier of a speeding violation, following the NY VTL 1180
/// subsection codes the enforcement backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationCode {
    /// 1-10 mph over the limit (2 points)
    A,
    /// 11-20 mph over (3 points)
    B,
    /// 21-30 mph over (5 points)
    C,
    /// 31+ mph over (8 points)
    D,
}

impl ViolationCode {
    /// License points attached to this tier.
    pub fn points(&self) -> u8 {
        match self {
            ViolationCode::A => 2,
            ViolationCode::B => 3,
            ViolationCode::C => 5,
            ViolationCode::D => 8,
        }
    }

    /// Statute code string, e.g. "1180A".
    pub fn statute(&self) -> &'static str {
        match self {
            ViolationCode::A => "1180A",
            ViolationCode::B => "1180B",
            ViolationCode::C => "1180C",
            ViolationCode::D => "1180D",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.statute())
    }
}

/// Map mph over the limit to a severity tier. Monotonic in the overage.
pub fn pick_violation_code(mph_over: f32) -> ViolationCode {
    if mph_over <= 10.0 {
        ViolationCode::A
    } else if mph_over <= 20.0 {
        ViolationCode::B
    } else if mph_over <= 30.0 {
        ViolationCode::C
    } else {
        ViolationCode::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(pick_violation_code(6.0), ViolationCode::A);
        assert_eq!(pick_violation_code(10.0), ViolationCode::A);
        assert_eq!(pick_violation_code(10.1), ViolationCode::B);
        assert_eq!(pick_violation_code(20.0), ViolationCode::B);
        assert_eq!(pick_violation_code(25.0), ViolationCode::C);
        assert_eq!(pick_violation_code(30.0), ViolationCode::C);
        assert_eq!(pick_violation_code(30.1), ViolationCode::D);
        assert_eq!(pick_violation_code(80.0), ViolationCode::D);
    }

    #[test]
    fn test_points_monotonic_in_overage() {
        let mut last = 0;
        for tenths in 0..=500 {
            let over = tenths as f32 / 10.0;
            let points = pick_violation_code(over).points();
            assert!(points >= last, "points dropped at over={over}");
            last = points;
        }
    }

    #[test]
    fn test_statute_strings() {
        assert_eq!(ViolationCode::A.statute(), "1180A");
        assert_eq!(ViolationCode::D.to_string(), "1180D");
        assert_eq!(ViolationCode::B.points(), 3);
        assert_eq!(ViolationCode::C.points(), 5);
    }
}
