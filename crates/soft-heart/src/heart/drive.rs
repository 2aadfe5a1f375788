//! Routing oscillator output to the zones of a soft body.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{Derivatives, EcgWeights, HeartOscillatorSystem, NodeKind, NodeParams, NodeState, Zone, ZoneClassifier, ZoneMap};
use crate::{PointMass, Vertex};

/// Which oscillator node drives each zone, along which axes and how strongly.
///
/// The default routes `Sa`, `Av` and `Hpc` to their own nodes and the catch-all zone to the His-Purkinje node, with the same value on all three axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRouting {
    /// The node driving each zone, in `Zone` storage order. `None` leaves the zone undriven.
    pub routes: [Option<NodeKind>; 4],
    /// A per-axis mask applied to the node output.
    pub axes: Vec3,
    /// A scale applied to the node output.
    pub gain: f32,
}

impl Default for ZoneRouting {
    fn default() -> Self {
        Self {
            routes: [Some(NodeKind::Sa), Some(NodeKind::Av), Some(NodeKind::Hp), Some(NodeKind::Hp)],
            axes: Vec3::ONE,
            gain: 1.0,
        }
    }
}

impl ZoneRouting {
    /// The routing with the catch-all zone undriven.
    #[must_use]
    pub const fn without_fallback(self) -> Self {
        self.with_route(Zone::Other, None)
    }

    /// The routing with `zone` driven by `node`.
    #[must_use]
    pub const fn with_route(mut self, zone: Zone, node: Option<NodeKind>) -> Self {
        self.routes[zone.index()] = node;
        self
    }

    /// The routing with a new axis mask.
    #[must_use]
    pub const fn with_axes(mut self, axes: Vec3) -> Self {
        self.axes = axes;
        self
    }

    /// The routing with a new gain.
    #[must_use]
    pub const fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// The node driving a zone.
    #[must_use]
    pub const fn route(&self, zone: Zone) -> Option<NodeKind> {
        self.routes[zone.index()]
    }
}

/// Who advances the node states of the oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeAdvance {
    /// The drive only evaluates derivatives. Node states change only when the caller sets them.
    #[default]
    External,
    /// The drive advances the node states with fourth-order Runge-Kutta after each step.
    Rk4,
}

/// Everything needed to attach a heart to a soft body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartConfig {
    /// The coefficients of the SA, AV and HP nodes.
    pub params: [NodeParams; 3],
    /// The initial states of the SA, AV and HP nodes.
    pub initial: [NodeState; 3],
    /// The ECG readout weights.
    pub ecg: EcgWeights,
    /// How point masses are assigned to zones.
    pub classifier: ZoneClassifier,
    /// How node output reaches the zones.
    pub routing: ZoneRouting,
    /// Who advances the node states.
    pub advance: NodeAdvance,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            params: NodeParams::normal_rhythm(),
            initial: NodeState::NORMAL_RHYTHM,
            ecg: EcgWeights::default(),
            classifier: ZoneClassifier::default(),
            routing: ZoneRouting::default(),
            advance: NodeAdvance::default(),
        }
    }
}

impl HeartConfig {
    /// Returns the config with a new routing.
    #[must_use]
    pub const fn with_routing(mut self, routing: ZoneRouting) -> Self {
        self.routing = routing;
        self
    }

    /// Returns the config with a new classifier.
    #[must_use]
    pub const fn with_classifier(mut self, classifier: ZoneClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Returns the config with a new node advance.
    #[must_use]
    pub const fn with_advance(mut self, advance: NodeAdvance) -> Self {
        self.advance = advance;
        self
    }

    /// Returns the config with new initial node states.
    #[must_use]
    pub const fn with_initial(mut self, initial: [NodeState; 3]) -> Self {
        self.initial = initial;
        self
    }

    /// Returns the config with new node coefficients.
    #[must_use]
    pub const fn with_params(mut self, params: [NodeParams; 3]) -> Self {
        self.params = params;
        self
    }

    /// The oscillator this config describes.
    #[must_use]
    pub const fn oscillator(&self) -> HeartOscillatorSystem {
        HeartOscillatorSystem::new(self.params, self.initial, self.ecg)
    }
}

/// An oscillator attached to the point masses of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartDrive {
    /// The oscillator.
    oscillator: HeartOscillatorSystem,
    /// The classifier used to build `zones`.
    classifier: ZoneClassifier,
    /// How node output reaches the zones.
    routing: ZoneRouting,
    /// Who advances the node states.
    advance: NodeAdvance,
    /// The point masses of each zone.
    zones: ZoneMap,
    /// The derivatives evaluated in the last step.
    last: Derivatives,
}

impl HeartDrive {
    /// Creates a drive and classifies the given point masses into zones.
    #[must_use]
    pub fn new(config: &HeartConfig, masses: &[PointMass], vertices: &[Vertex]) -> Self {
        Self {
            oscillator: config.oscillator(),
            classifier: config.classifier,
            routing: config.routing,
            advance: config.advance,
            zones: config.classifier.classify(masses, vertices),
            last: Derivatives::default(),
        }
    }

    /// The oscillator.
    #[must_use]
    pub const fn oscillator(&self) -> &HeartOscillatorSystem {
        &self.oscillator
    }

    /// The oscillator, for callers that advance node states themselves.
    pub fn oscillator_mut(&mut self) -> &mut HeartOscillatorSystem {
        &mut self.oscillator
    }

    /// The zones of the point masses.
    #[must_use]
    pub const fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    /// The routing.
    #[must_use]
    pub const fn routing(&self) -> &ZoneRouting {
        &self.routing
    }

    /// Replaces the routing.
    pub fn set_routing(&mut self, routing: ZoneRouting) {
        self.routing = routing;
    }

    /// The derivatives evaluated in the last step.
    #[must_use]
    pub const fn last_derivatives(&self) -> &Derivatives {
        &self.last
    }

    /// The ECG-like readout of the oscillator.
    #[must_use]
    pub fn ecg(&self) -> f64 {
        self.oscillator.ecg()
    }

    /// Rebuilds the zones after the point masses changed.
    pub fn reclassify(&mut self, masses: &[PointMass], vertices: &[Vertex]) {
        self.zones = self.classifier.classify(masses, vertices);
    }

    /// Restores the initial node states.
    pub fn reset(&mut self) {
        self.oscillator.reset();
        self.last = Derivatives::default();
    }

    /// Evaluates the oscillator at `t` and drives every routed zone for one time-step.
    ///
    /// Non-finite derivatives are reported and skipped, leaving the point masses untouched for this step.
    pub fn step(&mut self, t: f64, dt: f32, masses: &mut [PointMass], vertices: &mut [Vertex]) {
        let derivatives = self.oscillator.evaluate(t);
        if derivatives.is_finite() {
            for zone in Zone::ALL {
                if let Some(node) = self.routing.route(zone) {
                    update_heart_zones(self.zones.members(zone), masses, vertices, derivatives.node(node), &self.routing, dt);
                }
            }
            self.last = derivatives;
        } else {
            ftlog::warn!("Skipping heart drive at t = {t}: non-finite derivatives {:?}", derivatives.0);
        }

        if self.advance == NodeAdvance::Rk4 && self.oscillator.is_finite() {
            self.oscillator.advance_rk4(t, f64::from(dt));
            if !self.oscillator.is_finite() {
                ftlog::warn!("Oscillator state became non-finite at t = {t}");
            }
        }
    }
}

/// Advances the point masses of one zone by a single node's output.
///
/// Every member gets the same value on every axis, masked by `routing.axes` and scaled by `routing.gain`: the velocity grows by the node's second
/// derivative and the position moves by its first derivative.
///
/// # Arguments
///
/// - `members`: The indices of the point masses in the zone.
/// - `masses`: All point masses of the body.
/// - `vertices`: All vertices of the body.
/// - `(rate, acceleration)`: The first and second derivative of the node's principal value.
/// - `routing`: The axis mask and gain.
/// - `dt`: The time-step.
#[allow(clippy::cast_possible_truncation)]
pub fn update_heart_zones(
    members: &[usize],
    masses: &mut [PointMass],
    vertices: &mut [Vertex],
    (rate, acceleration): (f64, f64),
    routing: &ZoneRouting,
    dt: f32,
) {
    let scale = routing.axes * routing.gain;
    let rate = Vec3::splat(rate as f32) * scale;
    let acceleration = Vec3::splat(acceleration as f32) * scale;

    for &i in members {
        let pm = &mut masses[i];
        pm.drive(&mut vertices[pm.vertex()], rate, acceleration, dt);
    }
}
