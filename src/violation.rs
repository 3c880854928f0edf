mod engine;
mod severity;
mod state;

pub use engine::{
    EngineConfig, PlateCandidate, PlateObservation, VehicleObservation, ViolationEngine,
    ViolationRecord,
};
pub use severity::{pick_violation_code, ViolationCode};
pub use state::{Band, Plate, VehicleState};
