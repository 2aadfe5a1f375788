//! Tests for the scene and its control surface.

use glam::Vec3;
use soft_heart::{primitives::PrimitiveLibrary, Control, Controls, Direction, MeshSource, Model, ModelPreset, Scene, SoftBodyConfig, SoftBodyError};

/// Gallery presets by name. `"teapot"` names a preset that no mesh source can load.
fn presets(names: &[&str]) -> Vec<ModelPreset> {
    let mut gallery = ModelPreset::gallery();
    gallery.push(ModelPreset::new("teapot", "teapot.obj", SoftBodyConfig::default()));
    names
        .iter()
        .filter_map(|name| gallery.iter().find(|p| p.name == *name).cloned())
        .collect()
}

#[test]
fn failed_swap_keeps_the_old_body() -> Result<(), SoftBodyError> {
    let mut scene = Scene::new(PrimitiveLibrary, presets(&["cube", "teapot", "diamond"]), Controls::default())?;
    scene.frame(1.0 / 60.0);
    let before = scene.body().vertices().to_vec();

    let err = scene.apply(Control::NextModel);
    assert_eq!(err, Err(SoftBodyError::UnknownModel("teapot.obj".to_string())));
    assert_eq!(scene.preset().name, "cube");
    assert_eq!(scene.body().vertices(), before.as_slice());

    // The next swap moves past the broken preset.
    scene.apply(Control::NextModel)?;
    assert_eq!(scene.preset().name, "diamond");
    assert_eq!(scene.body().spring_count(), 12);

    scene.apply(Control::NextModel)?;
    assert_eq!(scene.preset().name, "cube");
    Ok(())
}

#[test]
fn gallery_cycles_without_errors() -> Result<(), SoftBodyError> {
    let gallery = ModelPreset::gallery();
    let mut scene = Scene::new(PrimitiveLibrary, gallery.clone(), Controls::default())?;
    for lap in 0..2 {
        for preset in gallery.iter().skip(1).chain(gallery.first()) {
            scene.apply(Control::NextModel)?;
            assert_eq!(scene.preset().name, preset.name, "Lap {lap}");
            scene.frame(1.0 / 60.0);
            assert!(scene.body().vertices().iter().all(|v| v.position().is_finite()), "{}", preset.name);
        }
    }
    Ok(())
}

#[test]
fn swapped_body_uses_the_preset() -> Result<(), SoftBodyError> {
    let mut scene = Scene::new(PrimitiveLibrary, presets(&["ball", "heart"]), Controls::default())?;
    assert!(scene.body().heart().is_none());
    scene.apply(Control::NextModel)?;
    assert_eq!(scene.preset().name, "heart");
    assert!(scene.body().heart().is_some());
    assert_eq!(scene.body().material(), &scene.preset().config.material);
    assert_eq!(scene.body().time(), 0.0);
    Ok(())
}

#[test]
fn gravity_pulls_the_body_down() -> Result<(), SoftBodyError> {
    let mut scene = Scene::new(PrimitiveLibrary, presets(&["cube"]), Controls::default())?;
    let start = scene.body().centroid();
    for _ in 0..60 {
        scene.frame(1.0 / 60.0);
    }
    assert!(scene.body().centroid().y < start.y);
    Ok(())
}

#[test]
fn jump_and_move_then_reset() -> Result<(), SoftBodyError> {
    let mut scene = Scene::new(PrimitiveLibrary, presets(&["cube"]), Controls::default())?;
    let start = scene.body().centroid();

    scene.apply(Control::Jump)?;
    scene.apply(Control::Move(Direction::Forward))?;
    scene.frame(1.0 / 60.0);
    for pm in scene.body().point_masses() {
        assert!(pm.velocity().y > 0.0);
        assert!(pm.velocity().x < 0.0);
    }

    scene.apply(Control::Reset)?;
    assert_eq!(scene.body().centroid(), start);
    assert!(scene.body().point_masses().iter().all(|pm| pm.velocity() == Vec3::ZERO));
    Ok(())
}

/// A source that hands out two meshes for every model.
struct Doubled;

impl MeshSource for Doubled {
    fn load(&self, source: &str) -> Result<Model, SoftBodyError> {
        let mut model = PrimitiveLibrary.load(source)?;
        model.meshes.extend(model.meshes.clone());
        Ok(model)
    }
}

#[test]
fn multi_mesh_models_are_rejected() {
    let preset = ModelPreset::new("cube", "cube", SoftBodyConfig::default());
    let scene = Scene::new(Doubled, vec![preset], Controls::default());
    assert_eq!(scene.err(), Some(SoftBodyError::MeshCount(2)));
}

#[test]
fn reset_with_heart_restores_rest() -> Result<(), SoftBodyError> {
    let mut scene = Scene::new(PrimitiveLibrary, presets(&["heart"]), Controls::default())?;
    for _ in 0..30 {
        scene.frame(1.0 / 60.0);
    }
    scene.apply(Control::Reset)?;
    let body = scene.body();
    assert!(body.vertices().iter().all(|v| v.position() == v.rest_position()));
    let ecg = body.heart().map(soft_heart::HeartDrive::ecg);
    let fresh = scene.build(scene.preset())?;
    assert_eq!(ecg, fresh.heart().map(soft_heart::HeartDrive::ecg));
    Ok(())
}
