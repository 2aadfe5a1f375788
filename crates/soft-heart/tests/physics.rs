//! Tests for point masses, springs and soft bodies.

use float_eq::assert_float_eq;
use glam::Vec3;
use rand::prelude::*;
use soft_heart::{
    heart::update_heart_zones, Boundary, Frame, HeartConfig, Integrator, Material, NodeAdvance, Placement, PointMass, SoftBody, SoftBodyConfig,
    SoftBodyError, Spring, SpringNetwork, Topology, Vertex, ZoneRouting,
};
use test_case::test_case;

mod common;

#[test_case(0.0 ; "coincident")]
#[test_case(0.5 ; "compressed")]
#[test_case(1.0 ; "at rest")]
#[test_case(2.0 ; "stretched")]
fn newtons_third_law(distance: f32) {
    let material = Material::new(0.0, 2.0, 10.0, 0.3);
    let (mut masses, mut vertices) = common::pair(distance, &material);

    // Give the second mass a velocity so that the damping term is exercised.
    masses[1].add_force(Vec3::new(-4.0, 2.0, 1.0));
    let position = vertices[1].position();
    masses[1].integrate(&mut vertices[1], &Frame::IDENTITY, &Boundary::unbounded(), Integrator::SemiImplicitEuler, 0.5);
    vertices[1] = Vertex::at(position);
    assert_ne!(masses[1].velocity(), Vec3::ZERO);

    let f = Spring::new(0, 1, 1.0).force(&masses, &vertices);
    assert_eq!(f.on_a, -f.on_b, "{f:?}");
    assert!(f.on_a.is_finite());
}

#[test]
fn two_mass_scenario() {
    let material = Material::new(0.0, 1.0, 10.0, 0.0);
    let (mut masses, mut vertices) = common::pair(2.0, &material);
    let spring = Spring::new(0, 1, 1.0);

    let f = spring.force(&masses, &vertices);
    masses[0].add_force(f.on_a);
    masses[1].add_force(f.on_b);
    assert_eq!(masses[0].force(), Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(masses[1].force(), Vec3::new(-10.0, 0.0, 0.0));

    for (pm, v) in masses.iter_mut().zip(vertices.iter_mut()) {
        pm.integrate(v, &Frame::IDENTITY, &Boundary::default(), Integrator::SemiImplicitEuler, 0.01);
    }
    assert_eq!(masses[0].force(), Vec3::ZERO);
    assert_eq!(masses[1].force(), Vec3::ZERO);
    assert_eq!(masses[0].acceleration(), Vec3::new(10.0, 0.0, 0.0));
    assert!(vertices[1].position().x - vertices[0].position().x < 2.0);
}

#[test]
fn network_is_duplicate_free_and_idempotent() -> Result<(), SoftBodyError> {
    let mesh = common::block(3);
    let positions = mesh.vertices().iter().map(Vertex::position).collect::<Vec<_>>();

    let once = SpringNetwork::build(mesh.indices(), Topology::Tetrahedra, &positions)?;
    let again = SpringNetwork::build(mesh.indices(), Topology::Tetrahedra, &positions)?;
    assert_eq!(once, again);

    // Listing every cell twice adds nothing.
    let doubled = [mesh.indices(), mesh.indices()].concat();
    let twice = SpringNetwork::build(&doubled, Topology::Tetrahedra, &positions)?;
    assert_eq!(once, twice);

    let mut pairs = once.iter().map(|s| (s.a(), s.b())).collect::<Vec<_>>();
    assert!(pairs.iter().all(|&(a, b)| a < b));
    let n = pairs.len();
    pairs.sort_unstable();
    pairs.dedup();
    assert_eq!(pairs.len(), n);

    for s in once.iter() {
        assert_float_eq!(s.rest_length(), positions[s.a()].distance(positions[s.b()]), abs <= 0.0);
    }
    Ok(())
}

#[test_case(Integrator::SemiImplicitEuler, false ; "euler")]
#[test_case(Integrator::Verlet, false ; "verlet")]
#[test_case(Integrator::SemiImplicitEuler, true ; "euler with heart")]
#[test_case(Integrator::Verlet, true ; "verlet with heart")]
fn reset_restores_rest_state(integrator: Integrator, with_heart: bool) -> Result<(), SoftBodyError> {
    let config = SoftBodyConfig::default()
        .with_integrator(integrator)
        .with_placement(Placement::at(Vec3::new(0.0, 1.0, 0.0), 2.0));
    let mut body = SoftBody::new(&common::block(2), &config)?;
    if with_heart {
        body.attach_heart(&HeartConfig::default().with_advance(NodeAdvance::Rk4));
    }
    let rest = body.vertices().iter().map(Vertex::rest_position).collect::<Vec<_>>();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        body.add_force(common::random_vec(&mut rng, 500.0));
        body.update(rng.random_range(0.001..0.01));
    }
    assert!(body.vertices().iter().any(|v| v.position() != v.rest_position()));

    body.reset();
    body.update(0.0);

    let positions = body.vertices().iter().map(Vertex::position).collect::<Vec<_>>();
    assert_eq!(positions, rest);
    assert!(body.point_masses().iter().all(|pm| pm.velocity() == Vec3::ZERO));
    assert_float_eq!(body.time(), 0.0, abs <= 0.0);
    Ok(())
}

#[test]
fn random_updates_stay_finite() -> Result<(), SoftBodyError> {
    let mut body = SoftBody::new(&common::block(2), &SoftBodyConfig::default())?;
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        body.add_force(Vec3::new(0.0, -2.0, 0.0));
        if rng.random_bool(0.1) {
            body.add_force(common::random_vec(&mut rng, 250.0));
        }
        body.update(1.0 / 60.0);
    }
    assert!(body.vertices().iter().all(|v| v.position().is_finite()));
    assert_eq!(body.logs().len(), 200);
    assert!(body.logs().iter().flatten().all(|e| e.is_finite()));
    Ok(())
}

#[test_case(Vec3::new(0.0, -5.0, 0.0) ; "falling")]
#[test_case(Vec3::new(1.0, -0.3, 2.0) ; "sliding")]
#[test_case(Vec3::new(0.0, 3.0, 0.0) ; "rising")]
#[test_case(Vec3::ZERO ; "resting")]
fn floor_collision(velocity: Vec3) {
    let material = Material::new(0.5, 1.0, 0.0, 0.0);
    let mut vertex = Vertex::at(Vec3::new(0.0, -0.5, 0.0));
    let mut pm = PointMass::new(0, vertex.position(), &material);

    // Reach the requested velocity with one force step that does not move the vertex.
    pm.add_force(velocity);
    pm.integrate(&mut vertex, &Frame::IDENTITY, &Boundary::unbounded(), Integrator::SemiImplicitEuler, 1.0);
    vertex = Vertex::at(Vec3::new(0.0, -0.5, 0.0));
    assert_eq!(pm.velocity(), velocity);

    pm.integrate(&mut vertex, &Frame::IDENTITY, &Boundary::default(), Integrator::SemiImplicitEuler, 0.0);
    assert_eq!(vertex.position().y, 0.1);
    assert_eq!(pm.velocity().y, -velocity.y * 0.5);
    assert_eq!(pm.velocity().x, velocity.x);
}

#[test]
fn floor_collision_in_world_space() {
    let material = Material::new(0.2, 1.0, 0.0, 0.0);
    let frame = Placement::at(Vec3::new(0.0, 6.0, 0.0), 5.0).frame();
    // Local y = -1.3 is world y = -0.5.
    let mut vertex = Vertex::at(Vec3::new(0.0, -1.3, 0.0));
    let mut pm = PointMass::new(0, vertex.position(), &material);

    pm.integrate(&mut vertex, &frame, &Boundary::default(), Integrator::SemiImplicitEuler, 0.0);
    let world = frame.to_world(vertex.position());
    assert_float_eq!(world.y, 0.1, abs <= 1e-5);
    assert_float_eq!(vertex.position().y, -1.18, abs <= 1e-5);
}

#[test]
fn verlet_matches_euler_under_constant_force() -> Result<(), SoftBodyError> {
    let mesh = common::points(&[Vec3::new(0.0, 50.0, 0.0)]);
    let config = SoftBodyConfig::default()
        .with_material(Material::new(0.0, 1.0, 0.0, 0.0))
        .with_free_particles(true);

    let mut euler = SoftBody::new(&mesh, &config)?;
    let mut verlet = SoftBody::new(&mesh, &config.with_integrator(Integrator::Verlet))?;
    for _ in 0..30 {
        euler.add_force(Vec3::new(0.0, -2.0, 0.0));
        verlet.add_force(Vec3::new(0.0, -2.0, 0.0));
        euler.update(0.05);
        verlet.update(0.05);
    }
    let (e, v) = (euler.vertices()[0].position(), verlet.vertices()[0].position());
    assert_float_eq!(e.to_array(), v.to_array(), abs_all <= 1e-3);
    assert_float_eq!(e.y, 50.0 - 2.0 * 0.05 * 0.05 * 30.0 * 31.0 / 2.0, abs <= 1e-3);
    Ok(())
}

#[test_case(Integrator::SemiImplicitEuler, 0.0, 4.0, [2.2, 7.2, 2.2], [4.0; 3] ; "euler acceleration")]
#[test_case(Integrator::Verlet, 0.0, 4.0, [2.2, 7.2, 2.2], [4.0; 3] ; "verlet acceleration")]
#[test_case(Integrator::SemiImplicitEuler, 1.0, 0.0, [1.0, 6.0, 1.0], [0.0; 3] ; "euler rate")]
#[test_case(Integrator::Verlet, 1.0, 0.0, [1.0, 6.0, 1.0], [0.0; 3] ; "verlet rate")]
fn heart_drive_reaches_every_integrator(integrator: Integrator, rate: f64, acceleration: f64, position: [f32; 3], velocity: [f32; 3]) {
    let material = Material::new(0.0, 1.0, 0.0, 0.0);
    let mut vertices = vec![Vertex::at(Vec3::new(0.0, 5.0, 0.0))];
    let mut masses = vec![PointMass::new(0, vertices[0].position(), &material)];
    let routing = ZoneRouting::default();

    for _ in 0..10 {
        update_heart_zones(&[0], &mut masses, &mut vertices, (rate, acceleration), &routing, 0.1);
        masses[0].integrate(&mut vertices[0], &Frame::IDENTITY, &Boundary::unbounded(), integrator, 0.1);
    }
    assert_float_eq!(vertices[0].position().to_array(), position, abs_all <= 1e-4);
    assert_float_eq!(masses[0].velocity().to_array(), velocity, abs_all <= 1e-4);
}

#[test]
fn verlet_bounce_carries_reflected_velocity() {
    let material = Material::new(0.5, 1.0, 0.0, 0.0);
    let mut vertex = Vertex::at(Vec3::new(0.0, 1.0, 0.0));
    let mut pm = PointMass::new(0, vertex.position(), &material);
    let boundary = Boundary::default();

    pm.add_force(Vec3::new(0.0, -100.0, 0.0));
    pm.integrate(&mut vertex, &Frame::IDENTITY, &boundary, Integrator::Verlet, 0.1);
    assert_float_eq!(vertex.position().y, 0.0, abs <= 1e-5);
    assert_float_eq!(pm.velocity().y, -10.0, abs <= 1e-4);

    pm.integrate(&mut vertex, &Frame::IDENTITY, &boundary, Integrator::Verlet, 0.1);
    assert_float_eq!(pm.velocity().y, 5.0, abs <= 1e-4);
    assert_float_eq!(vertex.position().y, 0.6, abs <= 1e-5);
}

#[test]
fn free_particles_fall_together() -> Result<(), SoftBodyError> {
    let positions = [Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 7.0, -2.0), Vec3::new(-3.0, 4.0, 1.0)];
    let mesh = common::points(&positions);
    assert_eq!(
        SoftBody::new(&mesh, &SoftBodyConfig::default()).err(),
        Some(SoftBodyError::NoSprings)
    );

    let mut body = SoftBody::new(&mesh, &SoftBodyConfig::default().with_free_particles(true))?;
    assert_eq!(body.spring_count(), 0);
    for _ in 0..10 {
        body.add_force(Vec3::new(0.0, -200.0, 0.0));
        body.update(0.01);
    }
    let drops = body
        .vertices()
        .iter()
        .map(|v| v.rest_position().y - v.position().y)
        .collect::<Vec<_>>();
    assert!(drops[0] > 0.0);
    assert_float_eq!(drops[0], drops[1], abs <= 1e-4);
    assert_float_eq!(drops[0], drops[2], abs <= 1e-4);
    assert_float_eq!(body.potential_energy(), 0.0, abs <= 0.0);
    Ok(())
}

#[test]
fn snapshot_matches_vertices_after_each_step() -> Result<(), SoftBodyError> {
    let mut body = SoftBody::new(&common::block(1), &SoftBodyConfig::default())?;
    for _ in 0..3 {
        body.add_force(Vec3::new(5.0, -2.0, 0.0));
        body.update(1.0 / 60.0);
        for (r, v) in body.render_vertices().iter().zip(body.vertices()) {
            assert_eq!(r.position, v.position().to_array());
            assert_eq!(r.color, v.color().to_array());
        }
    }
    Ok(())
}

#[test]
fn invalid_material_is_rejected() {
    let config = SoftBodyConfig::default().with_material(Material::new(0.2, 0.0, 10.0, 0.1));
    assert!(matches!(
        SoftBody::new(&common::block(1), &config),
        Err(SoftBodyError::InvalidMaterial { field: "mass", .. })
    ));
}
