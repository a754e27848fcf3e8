//! Data models for LabTrack

pub mod advisor;
pub mod enums;
pub mod instrument;
pub mod maintenance;

// Re-export commonly used types
pub use advisor::{Prediction, PredictionInput};
pub use enums::{InstrumentStatus, MaintenanceEventType, MaintenanceType};
pub use instrument::Instrument;
pub use maintenance::{CompletedMaintenance, MaintenanceEvent};
