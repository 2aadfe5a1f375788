//! Soft bodies driven by mass-spring mechanics and a three-node cardiac oscillator.
//!
//! A [`SoftBody`] binds one [`PointMass`] to every vertex of a single [`Mesh`], connects them with Hookean [`Spring`]s built from the mesh's triangle or
//! tetrahedron index buffer, and integrates them once per frame. A [`HeartDrive`] can be attached to a body: it evaluates a
//! [`HeartOscillatorSystem`] (sinoatrial, atrioventricular and His-Purkinje analogues) and routes each node's output to the vertices of a color-classified
//! [`Zone`].
//!
//! ## Modules
//!
//! - [`mesh`]: Vertices, meshes, models and the vertex layout handed to a renderer.
//! - [`physics`]: Point masses, springs, the spring network builder, body placement and the soft body itself.
//! - [`heart`]: The coupled oscillator, the zone classifier and the zone drive.
//! - [`scene`]: The control surface (reset, jump, move, model swap) over a single active body.
//! - [`primitives`]: Procedural meshes and an in-memory [`MeshSource`].
//!
//! Mesh file parsing, rendering, cameras and input mapping live outside this crate. They talk to it through [`MeshSource`], [`SoftBody::render_vertices`]
//! and [`Scene::apply`].

mod error;
pub mod heart;
pub mod mesh;
pub mod physics;
pub mod primitives;
pub mod scene;

pub use error::SoftBodyError;
pub use heart::{
    Derivatives, EcgWeights, HeartConfig, HeartDrive, HeartOscillatorSystem, NodeAdvance, NodeKind, NodeParams, NodeState, Zone, ZoneClassifier, ZoneMap,
    ZoneRouting,
};
pub use mesh::{Mesh, Model, RenderVertex, Topology, Vertex};
pub use physics::{Boundary, Frame, Integrator, Material, Placement, PointMass, SoftBody, SoftBodyConfig, Spring, SpringForce, SpringNetwork};
pub use scene::{Control, Controls, Direction, MeshSource, ModelPreset, Scene};
