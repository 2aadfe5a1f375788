//! Procedural meshes and an in-memory `MeshSource` serving them by name.

use std::path::Path;

use glam::Vec3;

use crate::{Mesh, MeshSource, Model, SoftBodyError, Topology, Vertex};

/// The color of vertices painted like the sinoatrial node.
const SA_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// The color of vertices painted like the atrioventricular node.
const AV_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// The color of vertices painted like the His-Purkinje complex.
const HPC_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// A white vertex at `position` whose normal points away from the origin.
fn radial(position: Vec3) -> Vertex {
    Vertex::new(position, Vec3::ONE, position.normalize_or_zero())
}

/// A single regular tetrahedron, as one tetrahedral cell.
#[must_use]
pub fn tetrahedron() -> Mesh {
    let vertices = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ]
    .map(|p| radial(p * 0.5))
    .to_vec();
    Mesh::new(vertices, vec![0, 1, 2, 3], Topology::Tetrahedra)
}

/// The triangulated surface of an axis-aligned box centered at the origin.
///
/// Each face is split into two triangles, so the surface has 12 box edges and 6 face diagonals.
#[must_use]
pub fn box_surface(size: Vec3) -> Mesh {
    let h = size / 2.0;
    let vertices = (0..8)
        .map(|i| {
            let sign = |bit: u32| if i & (1 << bit) == 0 { -1.0 } else { 1.0 };
            radial(Vec3::new(sign(0), sign(1), sign(2)) * h)
        })
        .collect();

    // Corner `i` has x from bit 0, y from bit 1 and z from bit 2.
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 3, 0, 3, 1, // -z
        4, 5, 7, 4, 7, 6, // +z
        0, 4, 6, 0, 6, 2, // -x
        1, 3, 7, 1, 7, 5, // +x
        0, 1, 5, 0, 5, 4, // -y
        2, 6, 7, 2, 7, 3, // +y
    ];
    Mesh::new(vertices, indices, Topology::Triangles)
}

/// The surface of a regular octahedron with its corners at distance `radius` from the origin.
#[must_use]
pub fn octahedron(radius: f32) -> Mesh {
    let vertices = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z]
        .map(|p| radial(p * radius))
        .to_vec();

    #[rustfmt::skip]
    let indices = vec![
        0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0,
        0, 4, 3, 4, 1, 3, 1, 5, 3, 5, 0, 3,
    ];
    Mesh::new(vertices, indices, Topology::Triangles)
}

/// A five-pointed star extruded into a double pyramid.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn star(outer: f32, inner: f32, depth: f32) -> Mesh {
    let mut vertices = vec![radial(Vec3::new(0.0, 0.0, depth)), radial(Vec3::new(0.0, 0.0, -depth))];
    vertices.extend((0..10).map(|i| {
        let angle = std::f32::consts::PI * i as f32 / 5.0;
        let r = if i % 2 == 0 { outer } else { inner };
        radial(Vec3::new(r * angle.sin(), r * angle.cos(), 0.0))
    }));

    let indices = (0..10_u32)
        .flat_map(|i| {
            let (a, b) = (2 + i, 2 + (i + 1) % 10);
            [0, a, b, 1, b, a]
        })
        .collect();
    Mesh::new(vertices, indices, Topology::Triangles)
}

/// The surface of a torus around the y axis.
///
/// # Arguments
///
/// - `segments`: The number of segments around the y axis.
/// - `sides`: The number of segments around the tube.
/// - `radius`: The distance from the y axis to the center of the tube.
/// - `tube`: The radius of the tube.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn torus(segments: usize, sides: usize, radius: f32, tube: f32) -> Mesh {
    let tau = std::f32::consts::TAU;
    let mut vertices = Vec::with_capacity(segments * sides);
    for i in 0..segments {
        let u = tau * i as f32 / segments as f32;
        let center = Vec3::new(u.cos(), 0.0, u.sin()) * radius;
        for j in 0..sides {
            let v = tau * j as f32 / sides as f32;
            let normal = Vec3::new(u.cos() * v.cos(), v.sin(), u.sin() * v.cos());
            vertices.push(Vertex::new(center + normal * tube, Vec3::ONE, normal));
        }
    }

    let at = |i: usize, j: usize| ((i % segments) * sides + j % sides) as u32;
    let mut indices = Vec::with_capacity(segments * sides * 6);
    for i in 0..segments {
        for j in 0..sides {
            let (a, b, c, d) = (at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
            indices.extend([a, b, c, a, c, d]);
        }
    }
    Mesh::new(vertices, indices, Topology::Triangles)
}

/// A standing figure, as the triangulated surface of a tall slab six units high.
#[must_use]
pub fn acrobat() -> Mesh {
    box_surface(Vec3::new(2.0, 6.0, 1.0))
}

/// A solid box centered at the origin, filled with tetrahedra.
///
/// The box is divided into `cells` cubes along each axis and every cube is split into six tetrahedra around its main diagonal, so neighbouring cubes
/// share their faces.
///
/// # Arguments
///
/// - `cells`: The number of cubes along x, y and z. Each must be at least 1.
/// - `size`: The extent of the box.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn lattice(cells: [usize; 3], size: Vec3) -> Mesh {
    let [nx, ny, nz] = cells.map(|n| n.max(1));
    let step = size / Vec3::new(nx as f32, ny as f32, nz as f32);
    let origin = -size / 2.0;

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                vertices.push(radial(origin + step * Vec3::new(i as f32, j as f32, k as f32)));
            }
        }
    }

    let at = |i: usize, j: usize, k: usize| (i + (nx + 1) * (j + (ny + 1) * k)) as u32;

    // Every path from corner (0, 0, 0) to corner (1, 1, 1) along the three axes, in each of the six orders, bounds one tetrahedron.
    let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    let mut indices = Vec::with_capacity(nx * ny * nz * 24);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                for order in orders {
                    let mut corner = [i, j, k];
                    indices.push(at(corner[0], corner[1], corner[2]));
                    for axis in order {
                        corner[axis] += 1;
                        indices.push(at(corner[0], corner[1], corner[2]));
                    }
                }
            }
        }
    }
    Mesh::new(vertices, indices, Topology::Tetrahedra)
}

/// A tetrahedral block painted in horizontal bands for the three pacemaker zones.
///
/// From the top: sinoatrial, unpainted, atrioventricular, unpainted, His-Purkinje.
#[must_use]
pub fn heart() -> Mesh {
    let mut mesh = lattice([6, 6, 6], Vec3::ONE);
    mesh.paint(|v| {
        let h = v.rest_position().y + 0.5;
        if h >= 0.75 {
            SA_COLOR
        } else if (0.45..0.6).contains(&h) {
            AV_COLOR
        } else if h < 0.3 {
            HPC_COLOR
        } else {
            Vec3::ONE
        }
    });
    mesh
}

/// Serves the procedural meshes of this module by name.
///
/// A source is looked up by its file stem, so `"cube.obj"` and `"cube"` name the same mesh. Known stems: `tetrahedron`, `cube`, `diamond`, `star`,
/// `donut`, `acrobat`, `ball` and `heart`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveLibrary;

impl PrimitiveLibrary {
    /// The stems this library can load.
    pub const NAMES: [&'static str; 8] = ["tetrahedron", "cube", "diamond", "star", "donut", "acrobat", "ball", "heart"];
}

impl MeshSource for PrimitiveLibrary {
    fn load(&self, source: &str) -> Result<Model, SoftBodyError> {
        let stem = Path::new(source).file_stem().and_then(|s| s.to_str()).unwrap_or(source);
        let mesh = match stem {
            "tetrahedron" => tetrahedron(),
            "cube" => box_surface(Vec3::ONE),
            "diamond" => octahedron(0.5),
            "star" => star(0.5, 0.2, 0.15),
            "donut" => torus(16, 8, 0.35, 0.15),
            "acrobat" => acrobat(),
            "ball" => lattice([4, 4, 4], Vec3::ONE),
            "heart" => heart(),
            _ => return Err(SoftBodyError::UnknownModel(source.to_string())),
        };
        Ok(Model::single(mesh))
    }
}
