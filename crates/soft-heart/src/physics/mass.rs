//! Point masses in the mass-spring system.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Frame, SoftBodyError, Vertex};

/// The material of a soft body, copied into each of its `PointMass`es.
///
/// - `restitution`: The fraction of the normal velocity kept after hitting a boundary.
/// - `mass`: The mass of every `PointMass`.
/// - `stiffness`: The spring constant of every `Spring`.
/// - `damping`: The damping factor applied along every `Spring`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// The fraction of the normal velocity kept after hitting a boundary.
    pub restitution: f32,
    /// The mass of every `PointMass`.
    pub mass: f32,
    /// The spring constant of every `Spring`.
    pub stiffness: f32,
    /// The damping factor applied along every `Spring`.
    pub damping: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(0.2, 100.0, 20_000.0, 0.9)
    }
}

impl Material {
    /// Creates a new `Material`.
    #[must_use]
    pub const fn new(restitution: f32, mass: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            restitution,
            mass,
            stiffness,
            damping,
        }
    }

    /// Checks that the material describes a physical body.
    ///
    /// # Errors
    ///
    /// - If `mass` is not strictly positive and finite.
    /// - If `stiffness` or `damping` is negative or not finite.
    /// - If `restitution` is outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), SoftBodyError> {
        let invalid = |field, value| Err(SoftBodyError::InvalidMaterial { field, value });

        if !(self.mass.is_finite() && self.mass > 0.0) {
            return invalid("mass", self.mass);
        }
        if !(self.stiffness.is_finite() && self.stiffness >= 0.0) {
            return invalid("stiffness", self.stiffness);
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return invalid("damping", self.damping);
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return invalid("restitution", self.restitution);
        }
        Ok(())
    }
}

/// How a `PointMass` advances its position each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Integrator {
    /// `v += a·dt`, then `x += v·dt`.
    #[default]
    SemiImplicitEuler,
    /// Störmer-Verlet: `x' = 2x - x_prev + a·dt²`, with the velocity recovered from the positions.
    Verlet,
}

/// The axis-aligned box that keeps point masses in the world.
///
/// Each limit is checked independently in world space. A point on or past a limit has the offending velocity component reflected and scaled by the
/// restitution, and is clamped back onto the limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// The floor height.
    pub floor: f32,
    /// The wall at the smallest `x`.
    pub min_x: f32,
    /// The wall at the largest `z`.
    pub max_z: f32,
    /// The wall at the smallest `z`.
    pub min_z: f32,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            floor: 0.1,
            min_x: -10.0,
            max_z: 10.0,
            min_z: -10.0,
        }
    }
}

impl Boundary {
    /// A boundary that never triggers.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            floor: f32::NEG_INFINITY,
            min_x: f32::NEG_INFINITY,
            max_z: f32::INFINITY,
            min_z: f32::NEG_INFINITY,
        }
    }

    /// Resolves a world-space position and velocity against the boundary.
    ///
    /// Returns the clamped position and the reflected velocity, or `None` if no limit was touched.
    #[must_use]
    pub fn resolve(&self, world: Vec3, velocity: Vec3, restitution: f32) -> Option<(Vec3, Vec3)> {
        let (mut world, mut velocity) = (world, velocity);
        let mut hit = false;

        if world.y <= self.floor {
            velocity.y = -velocity.y * restitution;
            world.y = self.floor;
            hit = true;
        }
        if world.x <= self.min_x {
            velocity.x = -velocity.x * restitution;
            world.x = self.min_x;
            hit = true;
        }
        if world.z >= self.max_z {
            velocity.z = -velocity.z * restitution;
            world.z = self.max_z;
            hit = true;
        }
        if world.z <= self.min_z {
            velocity.z = -velocity.z * restitution;
            world.z = self.min_z;
            hit = true;
        }

        hit.then_some((world, velocity))
    }
}

/// A `PointMass` in the mass-spring system.
///
/// A `PointMass` is bound to one `Vertex` of its body by index, and owns the dynamic state of that vertex:
///
/// - `velocity`: The velocity in the body's local space.
/// - `acceleration`: The acceleration computed in the last integration.
/// - `force`: The force accumulated since the last integration.
///
/// The material parameters are copied from the body when the `PointMass` is created.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMass {
    /// The index of the `Vertex` this `PointMass` moves.
    vertex: usize,
    /// The velocity of the `PointMass`.
    velocity: Vec3,
    /// The acceleration computed in the last integration.
    acceleration: Vec3,
    /// The force accumulated since the last integration.
    force: Vec3,
    /// The position before the last integration, used by `Integrator::Verlet`.
    previous: Vec3,
    /// The fraction of the normal velocity kept after hitting a boundary.
    restitution: f32,
    /// The mass of the `PointMass`.
    mass: f32,
    /// The stiffness of the body.
    stiffness: f32,
    /// The damping of the body.
    damping: f32,
}

impl PointMass {
    /// Creates a `PointMass` at rest, bound to the vertex at `vertex` whose current position is `position`.
    #[must_use]
    pub const fn new(vertex: usize, position: Vec3, material: &Material) -> Self {
        Self {
            vertex,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            previous: position,
            restitution: material.restitution,
            mass: material.mass,
            stiffness: material.stiffness,
            damping: material.damping,
        }
    }

    /// Returns the index of the `Vertex` this `PointMass` moves.
    #[must_use]
    pub const fn vertex(&self) -> usize {
        self.vertex
    }

    /// Returns the velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Returns the acceleration computed in the last integration.
    #[must_use]
    pub const fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Returns the force accumulated since the last integration.
    #[must_use]
    pub const fn force(&self) -> Vec3 {
        self.force
    }

    /// Returns the mass.
    #[must_use]
    pub const fn mass(&self) -> f32 {
        self.mass
    }

    /// Returns the restitution.
    #[must_use]
    pub const fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Returns the stiffness of the body.
    #[must_use]
    pub const fn stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Returns the damping of the body.
    #[must_use]
    pub const fn damping(&self) -> f32 {
        self.damping
    }

    /// Adds the given force to the accumulated force.
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Subtracts the given force from the accumulated force.
    pub fn sub_force(&mut self, force: Vec3) {
        self.force -= force;
    }

    /// Zeroes the velocity, acceleration and force, and forgets the previous position.
    pub fn reset(&mut self, position: Vec3) {
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.force = Vec3::ZERO;
        self.previous = position;
    }

    /// Integrates the accumulated force for one time-step.
    ///
    /// The vertex is first checked against the `Boundary` in world space. Then the acceleration is computed from the accumulated force, the velocity and
    /// position are advanced with the chosen `Integrator`, and the force is reset to the zero vector.
    ///
    /// The mass must be strictly positive. `SoftBody` checks this when it is built.
    ///
    /// # Arguments
    ///
    /// - `vertex`: The `Vertex` bound to this `PointMass`.
    /// - `frame`: The world transform of the body and its inverse.
    /// - `boundary`: The world boundary.
    /// - `integrator`: How to advance the position.
    /// - `dt`: The time-step.
    pub fn integrate(&mut self, vertex: &mut Vertex, frame: &Frame, boundary: &Boundary, integrator: Integrator, dt: f32) {
        let world = frame.to_world(vertex.position());
        if let Some((clamped, velocity)) = boundary.resolve(world, self.velocity, self.restitution) {
            self.velocity = velocity;
            vertex.set_position(frame.to_local(clamped));
            // Verlet reads its velocity from the previous position, so re-seed it with the reflected velocity.
            self.previous = vertex.position() - self.velocity * dt;
        }

        self.acceleration = self.force / self.mass;
        match integrator {
            Integrator::SemiImplicitEuler => {
                self.velocity += self.acceleration * dt;
                vertex.translate(self.velocity * dt);
            }
            Integrator::Verlet => {
                let current = vertex.position();
                let next = current + (current - self.previous) + self.acceleration * (dt * dt);
                self.previous = current;
                vertex.set_position(next);
                if dt > 0.0 {
                    self.velocity = (next - current) / dt;
                }
            }
        }
        self.force = Vec3::ZERO;
    }

    /// Advances the velocity and position by externally supplied rates, bypassing the accumulated force.
    ///
    /// This is how oscillator output reaches the vertices of a zone. The previous position moves with the vertex and absorbs the velocity change, so
    /// both channels reach `Integrator::Verlet` too and the displacement is not counted again as momentum.
    pub fn drive(&mut self, vertex: &mut Vertex, rate: Vec3, acceleration: Vec3, dt: f32) {
        self.velocity += acceleration * dt;
        vertex.translate(rate * dt);
        self.previous += rate * dt - acceleration * (dt * dt);
    }

    /// Sets the velocity to the zero vector.
    pub fn reset_velocity(&mut self, position: Vec3) {
        self.velocity = Vec3::ZERO;
        self.previous = position;
    }

    /// Returns the kinetic energy.
    #[must_use]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
