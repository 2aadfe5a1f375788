//! Errors raised while building bodies, networks and scenes.

use glam::Vec3;
use thiserror::Error;

use crate::Topology;

/// Everything that can go wrong while constructing simulation objects.
///
/// Stepping a simulation never fails. Numeric edge cases during a step (coincident point masses, zero time-steps) are guarded locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SoftBodyError {
    /// A soft body needs a model with exactly one mesh.
    #[error("a soft body needs exactly one mesh, but the model has {0}")]
    MeshCount(usize),

    /// The mesh has no vertices to bind point masses to.
    #[error("cannot build a soft body from a mesh without vertices")]
    EmptyMesh,

    /// A material parameter is outside its valid range.
    #[error("invalid material {field}: {value}")]
    InvalidMaterial {
        /// The name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A placement component is not finite, or the scale collapses an axis.
    #[error("invalid placement {field}: {value}")]
    InvalidPlacement {
        /// The name of the offending component.
        field: &'static str,
        /// The rejected value.
        value: Vec3,
    },

    /// The index buffer length is not a multiple of the element arity.
    #[error("a {topology} index buffer of length {len} is not a multiple of {arity}")]
    TopologyMismatch {
        /// How the buffer was interpreted.
        topology: Topology,
        /// The length of the buffer.
        len: usize,
        /// The number of indices per element.
        arity: usize,
    },

    /// An index refers past the end of the vertex list.
    #[error("index {index} is out of bounds for {vertices} vertices")]
    IndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// The number of vertices.
        vertices: usize,
    },

    /// An element lists the same vertex more than once, which would connect a point mass to itself.
    #[error("element {element} repeats vertex {index}")]
    DegenerateElement {
        /// The position of the element in the index buffer.
        element: usize,
        /// The repeated vertex index.
        index: u32,
    },

    /// The body has no springs and free particles were not allowed.
    #[error("the mesh produced no springs; allow free particles to simulate unconnected point masses")]
    NoSprings,

    /// The mesh source does not know the requested model.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// A scene needs at least one preset.
    #[error("a scene needs at least one model preset")]
    NoPresets,
}
