//! Statistics of a preset's body.

use std::{collections::BTreeMap, path::Path};

use serde::Serialize;
use soft_heart::{primitives::PrimitiveLibrary, Material, Placement, Scene, Topology, Zone};

use crate::{config::ShellConfig, utils};

/// What `inspect` saves about a body.
#[derive(Debug, Serialize)]
struct Summary {
    /// The preset name.
    model: String,
    /// The name handed to the mesh source.
    source: String,
    /// How the index buffer was read.
    topology: Topology,
    /// The number of vertices, and so of point masses.
    vertices: usize,
    /// The number of springs built.
    springs: usize,
    /// The shortest and longest rest length.
    rest_lengths: [f32; 2],
    /// The material of the point masses.
    material: Material,
    /// Where the body sits in the world.
    placement: Placement,
    /// The number of point masses in each zone, if a heart is attached.
    zones: Option<BTreeMap<&'static str, usize>>,
    /// The ECG readout before the first step, if a heart is attached.
    ecg: Option<f64>,
}

/// Builds the named preset's body and writes its statistics to `summary.json` in `out_dir`.
///
/// # Errors
///
/// - If the preset does not exist or its body cannot be built.
/// - If the file cannot be written.
pub fn inspect<P: AsRef<Path>>(config: &ShellConfig, model: &str, out_dir: P) -> Result<(), String> {
    let mut scene = Scene::new(PrimitiveLibrary, config.presets(Some(model)), config.controls).map_err(|e| e.to_string())?;
    scene.select(model).map_err(|e| e.to_string())?;

    let preset = scene.preset();
    let body = scene.body();

    let rest_lengths = body.springs().iter().map(soft_heart::Spring::rest_length).fold([f32::INFINITY, 0.0_f32], |[lo, hi], l| {
        [lo.min(l), hi.max(l)]
    });

    let zones = body
        .heart()
        .map(|h| Zone::ALL.into_iter().map(|z| (z.name(), h.zones().len(z))).collect());

    let summary = Summary {
        model: preset.name.clone(),
        source: preset.source.clone(),
        topology: body.topology(),
        vertices: body.vertices().len(),
        springs: body.spring_count(),
        rest_lengths,
        material: *body.material(),
        placement: *body.placement(),
        zones,
        ecg: body.heart().map(soft_heart::HeartDrive::ecg),
    };
    ftlog::info!("{summary:?}");

    utils::write_json(&summary, out_dir.as_ref().join("summary.json"))
}
