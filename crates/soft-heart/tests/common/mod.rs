//! Mesh fixtures shared by the integration tests.

#![allow(dead_code)]

use glam::Vec3;
use rand::prelude::*;
use soft_heart::{primitives, Material, Mesh, PointMass, Topology, Vertex};

/// Two point masses `distance` apart along x, and their vertices.
pub fn pair(distance: f32, material: &Material) -> (Vec<PointMass>, Vec<Vertex>) {
    let vertices = vec![Vertex::at(Vec3::new(0.0, 5.0, 0.0)), Vertex::at(Vec3::new(distance, 5.0, 0.0))];
    let masses = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| PointMass::new(i, v.position(), material))
        .collect();
    (masses, vertices)
}

/// A tetrahedral block floating above the floor.
pub fn block(cells: usize) -> Mesh {
    let mesh = primitives::lattice([cells; 3], Vec3::ONE);
    raise(&mesh, 3.0)
}

/// The same mesh, moved up by `height`.
pub fn raise(mesh: &Mesh, height: f32) -> Mesh {
    let vertices = mesh
        .vertices()
        .iter()
        .map(|v| Vertex::new(v.position() + Vec3::Y * height, v.color(), v.normal()))
        .collect();
    Mesh::new(vertices, mesh.indices().to_vec(), mesh.topology())
}

/// Unconnected points, one per position.
pub fn points(positions: &[Vec3]) -> Mesh {
    Mesh::new(positions.iter().copied().map(Vertex::at).collect(), Vec::new(), Topology::Triangles)
}

/// A seeded random vector with every component in `[-max, max)`.
pub fn random_vec(rng: &mut StdRng, max: f32) -> Vec3 {
    Vec3::new(rng.random_range(-max..max), rng.random_range(-max..max), rng.random_range(-max..max))
}
