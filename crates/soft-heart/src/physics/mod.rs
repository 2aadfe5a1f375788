//! The physics of the mass-spring soft body.

mod body;
mod mass;
mod placement;
mod spring;

pub use body::{SoftBody, SoftBodyConfig};
pub use mass::{Boundary, Integrator, Material, PointMass};
pub use placement::{Frame, Placement};
pub use spring::{Spring, SpringForce, SpringNetwork};
