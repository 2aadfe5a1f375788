//! Running a scene and saving its trace.

use std::path::Path;

use ndarray::prelude::*;
use ndarray_npy::NpzWriter;
use rand::prelude::*;
use soft_heart::{primitives::PrimitiveLibrary, Control, Direction, HeartDrive, Scene};

use crate::config::ShellConfig;

/// Picks a random control event. Model swaps are left out so that every frame of a trace has the same vertices.
fn random_control<R: Rng>(rng: &mut R) -> Control {
    match rng.random_range(0..6) {
        0 => Control::Reset,
        1 => Control::Jump,
        i => Control::Move(Direction::ALL[i - 2]),
    }
}

/// Simulates the named preset and writes `trace.npz` to `out_dir`.
///
/// The archive holds, for every frame:
///
/// - `ecg`: The ECG readout of the heart, or NaN if the body has none.
/// - `centroid`: The world-space centroid of the body.
/// - `energy`: The kinetic, potential and total energy.
/// - `positions`: The local position of every vertex.
///
/// # Arguments
///
/// - `config`: The overrides for the presets and the control forces.
/// - `model`: The name of the preset to simulate.
/// - `steps`: The number of frames.
/// - `dt`: The time-step of each frame.
/// - `kick_every`: If given, a random control event is applied every this many frames.
/// - `rng`: The source of the random control events.
/// - `out_dir`: Where to write the trace.
///
/// # Errors
///
/// - If the preset does not exist or its body cannot be built.
/// - If the trace cannot be written.
pub fn simulate<R: Rng, P: AsRef<Path>>(
    config: &ShellConfig,
    model: &str,
    steps: usize,
    dt: f32,
    kick_every: Option<usize>,
    rng: &mut R,
    out_dir: P,
) -> Result<(), String> {
    let mut scene = Scene::new(PrimitiveLibrary, config.presets(Some(model)), config.controls).map_err(|e| e.to_string())?;
    scene.select(model).map_err(|e| e.to_string())?;

    let n = scene.body().vertices().len();
    ftlog::info!("Simulating {model} with {n} vertices for {steps} frames of {dt} s");

    let mut ecg = Array1::<f64>::zeros(steps);
    let mut centroid = Array2::<f32>::zeros((steps, 3));
    let mut energy = Array2::<f32>::zeros((steps, 3));
    let mut positions = Array3::<f32>::zeros((steps, n, 3));

    for i in 0..steps {
        if let Some(k) = kick_every.filter(|&k| k > 0 && i > 0 && i % k == 0) {
            let control = random_control(rng);
            ftlog::info!("Frame {i}: applying {control:?} (every {k} frames)");
            scene.apply(control).map_err(|e| e.to_string())?;
        }
        scene.frame(dt);

        let body = scene.body();
        ecg[i] = body.heart().map_or(f64::NAN, HeartDrive::ecg);
        centroid.row_mut(i).assign(&aview1(&body.centroid().to_array()));
        if let Some(e) = body.logs().last() {
            energy.row_mut(i).assign(&aview1(e));
        }
        for (j, v) in body.vertices().iter().enumerate() {
            positions.slice_mut(s![i, j, ..]).assign(&aview1(&v.position().to_array()));
        }

        if i % 60 == 0 {
            ftlog::info!("Frame {i}/{steps}: energy {:?}", body.logs().last());
        }
    }

    let out_path = out_dir.as_ref().join("trace.npz");
    let file = std::fs::File::create(&out_path).map_err(|e| format!("Failed to create output file {out_path:?}: {e}"))?;
    let mut writer = NpzWriter::new_compressed(file);
    writer.add_array("ecg", &ecg).map_err(|e| format!("Failed to write ecg: {e}"))?;
    writer
        .add_array("centroid", &centroid)
        .map_err(|e| format!("Failed to write centroid: {e}"))?;
    writer.add_array("energy", &energy).map_err(|e| format!("Failed to write energy: {e}"))?;
    writer
        .add_array("positions", &positions)
        .map_err(|e| format!("Failed to write positions: {e}"))?;
    writer.finish().map_err(|e| format!("Failed to finish {out_path:?}: {e}"))?;

    ftlog::info!("Wrote {out_path:?}");
    Ok(())
}
