//! Vertices, meshes and the vertex layout handed to a renderer.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A mesh vertex.
///
/// The rest position is fixed when the vertex is created. The current position starts at the rest position and is only moved by the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Where the vertex was loaded.
    rest: Vec3,
    /// Where the simulation has moved the vertex.
    position: Vec3,
    /// The vertex color, used to classify zones.
    color: Vec3,
    /// The vertex normal.
    normal: Vec3,
}

impl Vertex {
    /// Creates a vertex at rest at `position`.
    #[must_use]
    pub const fn new(position: Vec3, color: Vec3, normal: Vec3) -> Self {
        Self {
            rest: position,
            position,
            color,
            normal,
        }
    }

    /// Creates a white vertex with a zero normal, as produced by tetrahedral mesh loaders.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ONE, Vec3::ZERO)
    }

    /// Returns the vertex with its color replaced.
    #[must_use]
    pub const fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// The position the vertex was loaded at.
    #[must_use]
    pub const fn rest_position(&self) -> Vec3 {
        self.rest
    }

    /// The current, simulated position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// The vertex color.
    #[must_use]
    pub const fn color(&self) -> Vec3 {
        self.color
    }

    /// The vertex normal.
    #[must_use]
    pub const fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Moves the current position.
    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Displaces the current position.
    pub(crate) fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

/// How an index buffer is grouped into elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Topology {
    /// Three indices per face. Each face contributes its three edges.
    #[default]
    Triangles,
    /// Four indices per cell. Each cell contributes all six edges between its corners.
    Tetrahedra,
}

impl Topology {
    /// Edges of a triangle, as positions within the element.
    const TRIANGLE_EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

    /// Edges of a tetrahedron (the complete graph on four corners), as positions within the element.
    const TETRAHEDRON_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

    /// Picks the topology from the file name of a model source.
    ///
    /// Gmsh `.msh` files hold tetrahedra, everything else is triangulated on import.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("msh") => Self::Tetrahedra,
            _ => Self::Triangles,
        }
    }

    /// The number of indices per element.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Triangles => 3,
            Self::Tetrahedra => 4,
        }
    }

    /// The edges of one element, as pairs of positions within the element.
    #[must_use]
    pub const fn element_edges(self) -> &'static [(usize, usize)] {
        match self {
            Self::Triangles => &Self::TRIANGLE_EDGES,
            Self::Tetrahedra => &Self::TETRAHEDRON_EDGES,
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Triangles => write!(f, "triangle"),
            Self::Tetrahedra => write!(f, "tetrahedron"),
        }
    }
}

/// A single mesh: an ordered vertex list and an index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// The vertices, in index order.
    vertices: Vec<Vertex>,
    /// The index buffer.
    indices: Vec<u32>,
    /// How the index buffer is grouped.
    topology: Topology,
}

impl Mesh {
    /// Creates a mesh. The index buffer is validated when springs are built from it.
    #[must_use]
    pub const fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: Topology) -> Self {
        Self {
            vertices,
            indices,
            topology,
        }
    }

    /// The vertices, in index order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The index buffer.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// How the index buffer is grouped.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Recolors every vertex.
    pub fn paint<F: Fn(&Vertex) -> Vec3>(&mut self, color_of: F) {
        for v in &mut self.vertices {
            v.color = color_of(v);
        }
    }
}

/// What a model loader hands over: every mesh found in one source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    /// The meshes, in load order.
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Wraps a single mesh.
    #[must_use]
    pub fn single(mesh: Mesh) -> Self {
        Self { meshes: vec![mesh] }
    }
}

impl From<Mesh> for Model {
    fn from(mesh: Mesh) -> Self {
        Self::single(mesh)
    }
}

/// The per-vertex layout uploaded to a renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
    /// The current position.
    pub position: [f32; 3],
    /// The vertex normal.
    pub normal: [f32; 3],
    /// The vertex color.
    pub color: [f32; 3],
}

impl From<&Vertex> for RenderVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            color: v.color.to_array(),
        }
    }
}
