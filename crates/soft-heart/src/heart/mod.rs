//! The cardiac oscillator and its coupling to the vertices of a soft body.

mod drive;
mod oscillator;
mod zones;

pub use drive::{update_heart_zones, HeartConfig, HeartDrive, NodeAdvance, ZoneRouting};
pub use oscillator::{Derivatives, EcgWeights, HeartOscillatorSystem, NodeKind, NodeParams, NodeState};
pub use zones::{Zone, ZoneClassifier, ZoneMap};
