//! Three coupled nonlinear oscillators modelling cardiac conduction.

use serde::{Deserialize, Serialize};

/// One of the three pacemaker nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// The sinoatrial node.
    Sa,
    /// The atrioventricular node.
    Av,
    /// The His-Purkinje complex.
    Hp,
}

impl NodeKind {
    /// All nodes, in state order.
    pub const ALL: [Self; 3] = [Self::Sa, Self::Av, Self::Hp];

    /// The position of the node in the state vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Sa => 0,
            Self::Av => 1,
            Self::Hp => 2,
        }
    }

    /// The two other nodes, in the order of `NodeParams::coupling`.
    #[must_use]
    pub const fn others(self) -> [Self; 2] {
        match self {
            Self::Sa => [Self::Av, Self::Hp],
            Self::Av => [Self::Sa, Self::Hp],
            Self::Hp => [Self::Sa, Self::Av],
        }
    }

    /// A short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sa => "sa",
            Self::Av => "av",
            Self::Hp => "hp",
        }
    }
}

/// The nine coefficients of one node.
///
/// For a node with principal value `x` and derivative `ẋ`, coupled to the other two nodes `x_j` and `x_k`:
///
/// ```text
/// ẍ = -a·ẋ·(x - w1)·(x - w2) - x·(x + d)·(x + e) + q·sin(ω·t) + k_j·(x - x_j) + k_k·(x - x_k)
/// ```
///
/// The first term is the Liénard-type damping that turns into an energy source between `w2` and `w1`, the second is the cubic restoring force, the third
/// is the periodic forcing and the last two are the couplings to the other nodes.
///
/// With `0 < d < e` the origin is surrounded by a limit cycle, `-d` is a saddle and `-e` a stable well. A node started between the saddle and the origin
/// with little energy stays on the cycle. Negative coupling strengths pull a node towards the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeParams {
    /// Damping strength.
    pub a: f64,
    /// First root offset of the restoring force.
    pub d: f64,
    /// Second root offset of the restoring force.
    pub e: f64,
    /// Upper bound of the energy-injecting band.
    pub w1: f64,
    /// Lower bound of the energy-injecting band.
    pub w2: f64,
    /// Forcing amplitude.
    pub q: f64,
    /// Forcing angular frequency.
    pub omega: f64,
    /// Coupling strengths to the other two nodes, in the order of `NodeKind::others`.
    pub coupling: [f64; 2],
}

impl NodeParams {
    /// Sinoatrial node in a normal rhythm.
    #[must_use]
    pub const fn sa() -> Self {
        Self {
            a: 3.0,
            d: 3.0,
            e: 4.9,
            w1: 0.5,
            w2: -0.5,
            q: 0.0,
            omega: 0.0,
            coupling: [0.0, 0.0],
        }
    }

    /// Atrioventricular node in a normal rhythm, driven by the sinoatrial node.
    #[must_use]
    pub const fn av() -> Self {
        Self {
            a: 3.0,
            d: 4.0,
            e: 6.0,
            w1: 0.5,
            w2: -0.5,
            q: 0.0,
            omega: 0.0,
            coupling: [-3.0, 0.0],
        }
    }

    /// His-Purkinje complex in a normal rhythm, driven by the atrioventricular node.
    #[must_use]
    pub const fn hp() -> Self {
        Self {
            a: 7.0,
            d: 5.0,
            e: 8.0,
            w1: 0.5,
            w2: -0.5,
            q: 0.0,
            omega: 0.0,
            coupling: [0.0, -5.0],
        }
    }

    /// The SA, AV and HP nodes in a normal rhythm, in state order.
    #[must_use]
    pub const fn normal_rhythm() -> [Self; 3] {
        [Self::sa(), Self::av(), Self::hp()]
    }

    /// Returns the parameters with periodic forcing.
    #[must_use]
    pub const fn with_forcing(mut self, q: f64, omega: f64) -> Self {
        self.q = q;
        self.omega = omega;
        self
    }

    /// Returns the parameters with new coupling strengths.
    #[must_use]
    pub const fn with_coupling(mut self, coupling: [f64; 2]) -> Self {
        self.coupling = coupling;
        self
    }
}

/// The state of one node: its principal value and that value's derivative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeState {
    /// The principal value.
    pub x: f64,
    /// The derivative of the principal value.
    pub dx: f64,
}

impl NodeState {
    /// Where the SA, AV and HP nodes start in a normal rhythm, in state order.
    pub const NORMAL_RHYTHM: [Self; 3] = [Self::new(-0.1, 0.025), Self::new(-0.6, 0.1), Self::new(-3.3, 2.0 / 3.0)];

    /// Creates a new `NodeState`.
    #[must_use]
    pub const fn new(x: f64, dx: f64) -> Self {
        Self { x, dx }
    }
}

/// The six derivatives `(ẋ1, ẍ1, ẋ3, ẍ3, ẋ5, ẍ5)` of the three nodes, in state order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Derivatives(pub [f64; 6]);

impl Derivatives {
    /// The derivative of the principal value and the derivative of the derivative of one node.
    #[must_use]
    pub const fn node(&self, kind: NodeKind) -> (f64, f64) {
        let i = 2 * kind.index();
        (self.0[i], self.0[i + 1])
    }

    /// Whether every derivative is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// The weights of the ECG-like readout: `offset + sa·x1 + av·x3 + hp·x5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcgWeights {
    /// The constant offset.
    pub offset: f64,
    /// The weight of the sinoatrial node.
    pub sa: f64,
    /// The weight of the atrioventricular node.
    pub av: f64,
    /// The weight of the His-Purkinje complex.
    pub hp: f64,
}

impl Default for EcgWeights {
    fn default() -> Self {
        Self {
            offset: 1.0,
            sa: 0.1,
            av: 0.05,
            hp: 0.4,
        }
    }
}

/// The three coupled oscillators.
///
/// `evaluate` computes the derivatives of the whole system at a time `t` without changing it. Advancing the node states is left to the caller, either by
/// setting states directly or with `advance_rk4`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartOscillatorSystem {
    /// The coefficients of each node, in state order.
    params: [NodeParams; 3],
    /// The current state of each node, in state order.
    state: [NodeState; 3],
    /// The state restored by `reset`.
    initial: [NodeState; 3],
    /// The ECG readout weights.
    ecg: EcgWeights,
}

impl Default for HeartOscillatorSystem {
    fn default() -> Self {
        Self::new(NodeParams::normal_rhythm(), NodeState::NORMAL_RHYTHM, EcgWeights::default())
    }
}

impl HeartOscillatorSystem {
    /// Creates a new system with the given coefficients, initial states and readout weights.
    #[must_use]
    pub const fn new(params: [NodeParams; 3], initial: [NodeState; 3], ecg: EcgWeights) -> Self {
        Self {
            params,
            state: initial,
            initial,
            ecg,
        }
    }

    /// Creates a system with every node at the origin.
    #[must_use]
    pub fn at_rest(params: [NodeParams; 3]) -> Self {
        Self::new(params, [NodeState::default(); 3], EcgWeights::default())
    }

    /// The coefficients of one node.
    #[must_use]
    pub const fn params(&self, kind: NodeKind) -> &NodeParams {
        &self.params[kind.index()]
    }

    /// The current state of one node.
    #[must_use]
    pub const fn state(&self, kind: NodeKind) -> NodeState {
        self.state[kind.index()]
    }

    /// Overwrites the state of one node.
    pub fn set_state(&mut self, kind: NodeKind, state: NodeState) {
        self.state[kind.index()] = state;
    }

    /// The ECG readout weights.
    #[must_use]
    pub const fn ecg_weights(&self) -> &EcgWeights {
        &self.ecg
    }

    /// Restores the initial node states.
    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    /// Whether every node state is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.state.iter().all(|s| s.x.is_finite() && s.dx.is_finite())
    }

    /// The state as a flat vector `(x1, x2, x3, x4, x5, x6)`.
    fn flat(&self) -> [f64; 6] {
        let [sa, av, hp] = self.state;
        [sa.x, sa.dx, av.x, av.dx, hp.x, hp.dx]
    }

    /// The right-hand side of the system for an arbitrary flat state.
    fn field(&self, s: &[f64; 6], t: f64) -> [f64; 6] {
        let mut out = [0.0; 6];
        for kind in NodeKind::ALL {
            let i = 2 * kind.index();
            let (x, dx) = (s[i], s[i + 1]);
            let p = &self.params[kind.index()];
            let [j, k] = kind.others();
            let (xj, xk) = (s[2 * j.index()], s[2 * k.index()]);

            out[i] = dx;
            out[i + 1] = -p.a * dx * (x - p.w1) * (x - p.w2) - x * (x + p.d) * (x + p.e)
                + p.q * (p.omega * t).sin()
                + p.coupling[0] * (x - xj)
                + p.coupling[1] * (x - xk);
        }
        out
    }

    /// Evaluates the six derivatives of the system at time `t`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Derivatives {
        Derivatives(self.field(&self.flat(), t))
    }

    /// Advances the node states from `t` to `t + dt` with the classic fourth-order Runge-Kutta method.
    pub fn advance_rk4(&mut self, t: f64, dt: f64) {
        let s = self.flat();
        let shifted = |k: &[f64; 6], h: f64| -> [f64; 6] { std::array::from_fn(|i| s[i] + k[i] * h) };

        let k1 = self.field(&s, t);
        let k2 = self.field(&shifted(&k1, dt / 2.0), t + dt / 2.0);
        let k3 = self.field(&shifted(&k2, dt / 2.0), t + dt / 2.0);
        let k4 = self.field(&shifted(&k3, dt), t + dt);

        let next: [f64; 6] = std::array::from_fn(|i| s[i] + dt / 6.0 * (k1[i] + 2.0 * (k2[i] + k3[i]) + k4[i]));
        for kind in NodeKind::ALL {
            let i = 2 * kind.index();
            self.state[kind.index()] = NodeState::new(next[i], next[i + 1]);
        }
    }

    /// The ECG-like readout: a weighted sum of the three principal values plus an offset.
    #[must_use]
    pub fn ecg(&self) -> f64 {
        let [sa, av, hp] = self.state;
        self.ecg.offset + self.ecg.sa * sa.x + self.ecg.av * av.x + self.ecg.hp * hp.x
    }
}
