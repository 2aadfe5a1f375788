//! The soft body: point masses, springs and an optional heart, stepped once per frame.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{HeartConfig, HeartDrive, Mesh, Model, RenderVertex, SoftBodyError, Topology, Vertex, Zone};

use super::{Boundary, Integrator, Material, Placement, PointMass, SpringNetwork};

/// How to build a `SoftBody`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftBodyConfig {
    /// The material shared by every `PointMass`.
    pub material: Material,
    /// How point masses advance.
    pub integrator: Integrator,
    /// The world boundary.
    pub boundary: Boundary,
    /// Where the body sits in the world.
    pub placement: Placement,
    /// Whether a mesh that yields no springs may be simulated as unconnected point masses.
    pub allow_free_particles: bool,
}

impl SoftBodyConfig {
    /// Returns the config with a new material.
    #[must_use]
    pub const fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Returns the config with a new integrator.
    #[must_use]
    pub const fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Returns the config with a new boundary.
    #[must_use]
    pub const fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Returns the config with a new placement.
    #[must_use]
    pub const fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Returns the config with free particles allowed or not.
    #[must_use]
    pub const fn with_free_particles(mut self, allow: bool) -> Self {
        self.allow_free_particles = allow;
        self
    }
}

/// A deformable body made of `PointMass`es connected by `Spring`s.
///
/// The body owns its vertices, one `PointMass` per vertex in the same order, and the `SpringNetwork` built from the mesh's index buffer. Point masses
/// and springs refer to vertices and point masses by index only.
///
/// A step (`update`) runs to completion before anything is published: the `RenderVertex` snapshot returned by `render_vertices` always describes a
/// whole step.
#[derive(Debug, Clone)]
pub struct SoftBody {
    /// The simulated vertices.
    vertices: Vec<Vertex>,
    /// One `PointMass` per vertex.
    point_masses: Vec<PointMass>,
    /// The springs between the point masses.
    springs: SpringNetwork,
    /// How the mesh's index buffer was read.
    topology: Topology,
    /// The material every `PointMass` was built with.
    material: Material,
    /// How point masses advance.
    integrator: Integrator,
    /// The world boundary.
    boundary: Boundary,
    /// Where the body sits in the world.
    placement: Placement,
    /// The oscillator driving the body, if any.
    heart: Option<HeartDrive>,
    /// The snapshot published after the last step.
    render: Vec<RenderVertex>,
    /// The simulation time.
    time: f64,
    /// The kinetic, potential and total energy after each step.
    logs: Vec<[f32; 3]>,
}

impl SoftBody {
    /// Builds a body from the only mesh of a model.
    ///
    /// # Errors
    ///
    /// - If the model does not hold exactly one mesh.
    /// - See `SoftBody::new`.
    pub fn from_model(model: Model, config: &SoftBodyConfig) -> Result<Self, SoftBodyError> {
        let count = model.meshes.len();
        match <[Mesh; 1]>::try_from(model.meshes) {
            Ok([mesh]) => Self::new(&mesh, config),
            Err(_) => Err(SoftBodyError::MeshCount(count)),
        }
    }

    /// Builds a body from a mesh.
    ///
    /// One `PointMass` is created per vertex with the config's material, and one `Spring` per unique edge of the mesh's elements.
    ///
    /// # Arguments
    ///
    /// - `mesh`: The mesh to simulate. Its vertices are copied.
    /// - `config`: The material, integrator, boundary and placement of the body.
    ///
    /// # Errors
    ///
    /// - If the material is invalid.
    /// - If the placement has no invertible transform.
    /// - If the mesh has no vertices.
    /// - If the index buffer is malformed (see `SpringNetwork::build`).
    /// - If no springs were built and free particles are not allowed.
    pub fn new(mesh: &Mesh, config: &SoftBodyConfig) -> Result<Self, SoftBodyError> {
        config.material.validate()?;
        config.placement.validate()?;
        if mesh.vertices().is_empty() {
            return Err(SoftBodyError::EmptyMesh);
        }

        let vertices = mesh.vertices().to_vec();
        let positions = vertices.iter().map(Vertex::position).collect::<Vec<_>>();
        let springs = SpringNetwork::build(mesh.indices(), mesh.topology(), &positions)?;
        if springs.is_empty() && !config.allow_free_particles {
            return Err(SoftBodyError::NoSprings);
        }

        let point_masses = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| PointMass::new(i, p, &config.material))
            .collect();

        ftlog::info!(
            "Built a soft body with {} vertices, {} {} elements and {} springs",
            vertices.len(),
            mesh.indices().len() / mesh.topology().arity(),
            mesh.topology(),
            springs.len()
        );

        let mut body = Self {
            vertices,
            point_masses,
            springs,
            topology: mesh.topology(),
            material: config.material,
            integrator: config.integrator,
            boundary: config.boundary,
            placement: config.placement,
            heart: None,
            render: Vec::new(),
            time: 0.0,
            logs: Vec::new(),
        };
        body.publish();
        Ok(body)
    }

    /// Returns the body with a heart attached.
    #[must_use]
    pub fn with_heart(mut self, config: &HeartConfig) -> Self {
        self.attach_heart(config);
        self
    }

    /// Attaches a heart, classifying every `PointMass` into a zone. Replaces any heart already attached.
    pub fn attach_heart(&mut self, config: &HeartConfig) {
        let heart = HeartDrive::new(config, &self.point_masses, &self.vertices);
        let zones = heart.zones();
        ftlog::info!(
            "Attached a heart to {} point masses ({} driven)",
            zones.total(),
            Zone::ALL
                .into_iter()
                .filter(|&z| heart.routing().route(z).is_some())
                .map(|z| zones.len(z))
                .sum::<usize>()
        );
        self.heart = Some(heart);
    }

    /// Detaches the heart, if any.
    pub fn detach_heart(&mut self) -> Option<HeartDrive> {
        self.heart.take()
    }

    /// The heart, if attached.
    #[must_use]
    pub const fn heart(&self) -> Option<&HeartDrive> {
        self.heart.as_ref()
    }

    /// The heart, if attached, as mutable.
    pub fn heart_mut(&mut self) -> Option<&mut HeartDrive> {
        self.heart.as_mut()
    }

    /// Adds a force to every `PointMass`. Forces accumulate until the next `update`.
    pub fn add_force(&mut self, force: Vec3) {
        self.point_masses.iter_mut().for_each(|pm| pm.add_force(force));
    }

    /// Adds the force of every `Spring` to its two ends.
    fn accumulate_spring_forces(&mut self) {
        let forces = self
            .springs
            .springs()
            .par_iter()
            .map(|s| (s.a(), s.b(), s.force(&self.point_masses, &self.vertices)))
            .collect::<Vec<_>>();

        for (a, b, f) in forces {
            self.point_masses[a].add_force(f.on_a);
            self.point_masses[b].add_force(f.on_b);
        }
    }

    /// Advances the body by one time-step.
    ///
    /// 1. Every `Spring` adds its Hookean and damping forces to its ends.
    /// 2. The heart, if attached, drives the point masses of its zones.
    /// 3. Every `PointMass` is checked against the boundary and integrated, and its force is reset.
    /// 4. The render snapshot and the energy logs are updated.
    ///
    /// # Arguments
    ///
    /// - `dt`: The time-step.
    pub fn update(&mut self, dt: f32) {
        self.accumulate_spring_forces();

        if let Some(heart) = self.heart.as_mut() {
            heart.step(self.time, dt, &mut self.point_masses, &mut self.vertices);
        }

        let frame = self.placement.frame();
        let (boundary, integrator) = (self.boundary, self.integrator);
        self.point_masses
            .par_iter_mut()
            .zip(self.vertices.par_iter_mut())
            .for_each(|(pm, v)| pm.integrate(v, &frame, &boundary, integrator, dt));

        self.publish();
        self.time += f64::from(dt);
        self.update_logs();
    }

    /// Restores every vertex to its rest position and stops every `PointMass`.
    ///
    /// The springs are kept, so rest lengths are those measured when the body was built. The simulation time and the heart's node states are reset too.
    pub fn reset(&mut self) {
        for (pm, v) in self.point_masses.iter_mut().zip(self.vertices.iter_mut()) {
            v.set_position(v.rest_position());
            pm.reset(v.position());
        }
        if let Some(heart) = self.heart.as_mut() {
            heart.reset();
        }
        self.time = 0.0;
        self.publish();
    }

    /// Moves one vertex and stops its `PointMass`, e.g. while it is dragged.
    ///
    /// Returns `false` if there is no vertex at `index`.
    pub fn set_position(&mut self, index: usize, position: Vec3) -> bool {
        let Some(v) = self.vertices.get_mut(index) else {
            return false;
        };
        v.set_position(position);
        self.point_masses[index].reset_velocity(position);
        self.render[index] = RenderVertex::from(&*v);
        true
    }

    /// Copies the vertices into the render snapshot.
    fn publish(&mut self) {
        self.render.clear();
        self.render.extend(self.vertices.iter().map(RenderVertex::from));
    }

    /// The snapshot published after the last step.
    #[must_use]
    pub fn render_vertices(&self) -> &[RenderVertex] {
        &self.render
    }

    /// The snapshot published after the last step, as bytes ready for upload.
    #[must_use]
    pub fn render_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.render)
    }

    /// The simulated vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The point masses, in vertex order.
    #[must_use]
    pub fn point_masses(&self) -> &[PointMass] {
        &self.point_masses
    }

    /// The springs.
    #[must_use]
    pub const fn springs(&self) -> &SpringNetwork {
        &self.springs
    }

    /// How the mesh's index buffer was read.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// The number of springs built for the body.
    #[must_use]
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// The material every `PointMass` was built with.
    #[must_use]
    pub const fn material(&self) -> &Material {
        &self.material
    }

    /// The integrator.
    #[must_use]
    pub const fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// The world boundary.
    #[must_use]
    pub const fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Where the body sits in the world.
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Moves the body in the world.
    ///
    /// # Errors
    ///
    /// - If the placement has no invertible transform. The old placement is kept.
    pub fn set_placement(&mut self, placement: Placement) -> Result<(), SoftBodyError> {
        placement.validate()?;
        self.placement = placement;
        Ok(())
    }

    /// The mean of the vertex positions, in world space.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Vec3 {
        let sum = self.vertices.iter().map(Vertex::position).sum::<Vec3>();
        self.placement.frame().to_world(sum / self.vertices.len() as f32)
    }

    /// The simulation time.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Appends the current energies to the logs.
    fn update_logs(&mut self) {
        let kinetic_energy = self.kinetic_energy();
        let potential_energy = self.potential_energy();
        let total_energy = kinetic_energy + potential_energy;
        self.logs.push([kinetic_energy, potential_energy, total_energy]);
    }

    /// The kinetic, potential and total energy after each step.
    #[must_use]
    pub fn logs(&self) -> &[[f32; 3]] {
        &self.logs
    }

    /// Clears the energy logs.
    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    /// The total kinetic energy of the point masses.
    #[must_use]
    pub fn kinetic_energy(&self) -> f32 {
        self.point_masses.par_iter().map(PointMass::kinetic_energy).sum()
    }

    /// The total potential energy of the springs.
    #[must_use]
    pub fn potential_energy(&self) -> f32 {
        self.springs
            .springs()
            .par_iter()
            .map(|s| s.potential_energy(&self.point_masses, &self.vertices))
            .sum()
    }

    /// The total energy of the body.
    #[must_use]
    pub fn total_energy(&self) -> f32 {
        self.kinetic_energy() + self.potential_energy()
    }
}
