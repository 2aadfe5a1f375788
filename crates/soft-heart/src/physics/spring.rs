//! Springs and the spring network builder.

use std::collections::HashSet;

use glam::Vec3;

use crate::{PointMass, SoftBodyError, Topology, Vertex};

/// A Hookean spring between two `PointMass`es.
///
/// The spring is defined by:
///
/// - the indices `a < b` of the two `PointMass`es it connects,
/// - its rest length, i.e. the distance between the two masses when the spring was created.
///
/// The rest length never changes. The current length is recomputed from the vertex positions every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// The index of the first `PointMass`.
    a: usize,
    /// The index of the second `PointMass`.
    b: usize,
    /// The natural length of the `Spring`.
    rest_length: f32,
}

/// The forces a `Spring` exerts on its two ends during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringForce {
    /// The force on the first `PointMass`.
    pub on_a: Vec3,
    /// The force on the second `PointMass`.
    pub on_b: Vec3,
}

impl Spring {
    /// Creates a new `Spring`. The two indices are stored in ascending order.
    #[must_use]
    pub const fn new(a: usize, b: usize, rest_length: f32) -> Self {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        Self { a, b, rest_length }
    }

    /// The index of the first `PointMass`.
    #[must_use]
    pub const fn a(&self) -> usize {
        self.a
    }

    /// The index of the second `PointMass`.
    #[must_use]
    pub const fn b(&self) -> usize {
        self.b
    }

    /// The natural length of the `Spring`.
    #[must_use]
    pub const fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// The current length of the `Spring`.
    #[must_use]
    pub fn current_length(&self, masses: &[PointMass], vertices: &[Vertex]) -> f32 {
        let (pa, pb) = self.positions(masses, vertices);
        pa.distance(pb)
    }

    /// The positions of both ends.
    fn positions(&self, masses: &[PointMass], vertices: &[Vertex]) -> (Vec3, Vec3) {
        (vertices[masses[self.a].vertex()].position(), vertices[masses[self.b].vertex()].position())
    }

    /// Computes the Hookean and damping forces on both ends.
    ///
    /// With `d` the unit vector from `a` to `b` and `x` the extension beyond the rest length:
    ///
    /// - `a` receives `k·x·d + c·m_a·((v_b - v_a)·d)·d`,
    /// - `b` receives the negation, with its own mass `m_b` in the damping term.
    ///
    /// The stiffness `k` and damping `c` are read from the first `PointMass`. When both ends share a mass (as every body's `PointMass`es do) the two forces
    /// are exact negations of each other. Coincident ends have no direction and exert no force.
    #[must_use]
    pub fn force(&self, masses: &[PointMass], vertices: &[Vertex]) -> SpringForce {
        let (ma, mb) = (&masses[self.a], &masses[self.b]);
        let (pa, pb) = self.positions(masses, vertices);

        let direction = (pb - pa).normalize_or_zero();
        let extension = pa.distance(pb) - self.rest_length;
        let hooke = direction * (ma.stiffness() * extension);

        let relative_velocity = direction.dot(mb.velocity() - ma.velocity());
        let damping = direction * (relative_velocity * ma.damping());

        SpringForce {
            on_a: hooke + damping * ma.mass(),
            on_b: -(hooke + damping * mb.mass()),
        }
    }

    /// The potential energy stored in the `Spring`.
    #[must_use]
    pub fn potential_energy(&self, masses: &[PointMass], vertices: &[Vertex]) -> f32 {
        let extension = self.current_length(masses, vertices) - self.rest_length;
        0.5 * masses[self.a].stiffness() * extension * extension
    }
}

/// The springs of one body, with at most one `Spring` per unordered pair of `PointMass`es.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpringNetwork {
    /// The springs, in the order their edges were first seen.
    springs: Vec<Spring>,
}

impl SpringNetwork {
    /// Builds one `Spring` per unique edge of the elements in `indices`.
    ///
    /// Triangles contribute their three edges. Tetrahedra contribute all six edges between their corners. An edge is identified by its index pair in
    /// ascending order, and repeated edges (shared faces, shared cells) are skipped. The rest length of each `Spring` is the distance between its two
    /// `positions` at build time.
    ///
    /// # Arguments
    ///
    /// - `indices`: The index buffer.
    /// - `topology`: How to group the index buffer into elements.
    /// - `positions`: The positions of the vertices the indices refer to.
    ///
    /// # Errors
    ///
    /// - If the length of `indices` is not a multiple of the element arity.
    /// - If an index is out of bounds for `positions`.
    /// - If an element repeats a vertex.
    pub fn build(indices: &[u32], topology: Topology, positions: &[Vec3]) -> Result<Self, SoftBodyError> {
        let arity = topology.arity();
        if indices.len() % arity != 0 {
            return Err(SoftBodyError::TopologyMismatch {
                topology,
                len: indices.len(),
                arity,
            });
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(SoftBodyError::IndexOutOfBounds {
                index,
                vertices: positions.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut springs = Vec::new();
        for (element, corners) in indices.chunks_exact(arity).enumerate() {
            for &(i, j) in topology.element_edges() {
                let (i, j) = (corners[i], corners[j]);
                if i == j {
                    return Err(SoftBodyError::DegenerateElement { element, index: i });
                }
                let key = if i < j { (i, j) } else { (j, i) };
                if seen.insert(key) {
                    let (a, b) = (key.0 as usize, key.1 as usize);
                    springs.push(Spring::new(a, b, positions[a].distance(positions[b])));
                }
            }
        }

        ftlog::debug!(
            "Built {} springs from {} {topology} elements",
            springs.len(),
            indices.len() / arity
        );

        Ok(Self { springs })
    }

    /// The number of springs built.
    #[must_use]
    pub fn len(&self) -> usize {
        self.springs.len()
    }

    /// Whether no springs were built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// The springs.
    #[must_use]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Iterates over the springs.
    pub fn iter(&self) -> impl Iterator<Item = &Spring> {
        self.springs.iter()
    }

    /// Finds the `Spring` connecting two `PointMass`es, in either order.
    #[must_use]
    pub fn find(&self, a: usize, b: usize) -> Option<&Spring> {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.springs.iter().find(|s| s.a == a && s.b == b)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{Spring, SpringNetwork};
    use crate::{Material, PointMass, SoftBodyError, Topology, Vertex};

    fn pair(distance: f32, material: &Material) -> (Vec<PointMass>, Vec<Vertex>) {
        let vertices = vec![Vertex::at(Vec3::ZERO), Vertex::at(Vec3::new(distance, 0.0, 0.0))];
        let masses = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| PointMass::new(i, v.position(), material))
            .collect();
        (masses, vertices)
    }

    #[test]
    fn ordered_ends() {
        let s = Spring::new(5, 2, 1.0);
        assert_eq!((s.a(), s.b()), (2, 5));
    }

    #[test]
    fn coincident_ends_exert_no_force() {
        let material = Material::new(0.0, 1.0, 10.0, 0.5);
        let (masses, vertices) = pair(0.0, &material);
        let f = Spring::new(0, 1, 1.0).force(&masses, &vertices);
        assert_eq!(f.on_a, Vec3::ZERO);
        assert_eq!(f.on_b, Vec3::ZERO);
        assert!(f.on_a.is_finite() && f.on_b.is_finite());
    }

    #[test]
    fn stretched_spring_pulls_ends_together() {
        let material = Material::new(0.0, 1.0, 10.0, 0.0);
        let (masses, vertices) = pair(2.0, &material);
        let f = Spring::new(0, 1, 1.0).force(&masses, &vertices);
        assert_eq!(f.on_a, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(f.on_b, Vec3::new(-10.0, 0.0, 0.0));
    }

    #[test]
    fn triangle_edges() -> Result<(), SoftBodyError> {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        // Two triangles sharing the edge (1, 2).
        let network = SpringNetwork::build(&[0, 1, 2, 2, 1, 3], Topology::Triangles, &positions)?;
        assert_eq!(network.len(), 5);
        assert!(network.find(2, 1).is_some());
        // No diagonal across the two faces.
        assert!(network.find(0, 3).is_none());
        Ok(())
    }

    #[test]
    fn rejects_bad_buffers() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        assert!(matches!(
            SpringNetwork::build(&[0, 1, 2, 3, 0], Topology::Tetrahedra, &positions),
            Err(SoftBodyError::TopologyMismatch { len: 5, arity: 4, .. })
        ));
        assert!(matches!(
            SpringNetwork::build(&[0, 1, 7], Topology::Triangles, &positions),
            Err(SoftBodyError::IndexOutOfBounds { index: 7, vertices: 4 })
        ));
        assert!(matches!(
            SpringNetwork::build(&[0, 1, 2, 3, 3, 1, 3, 2], Topology::Tetrahedra, &positions),
            Err(SoftBodyError::DegenerateElement { element: 1, index: 3 })
        ));
    }
}
