//! Saving the model gallery.

use std::path::Path;

use crate::{config::ShellConfig, utils};

/// Writes every preset of the gallery to `presets.json` in `out_dir`.
///
/// # Errors
///
/// - If the file cannot be written.
pub fn presets<P: AsRef<Path>>(config: &ShellConfig, out_dir: P) -> Result<(), String> {
    let presets = config.presets(None);
    ftlog::info!("Saving {} presets", presets.len());
    utils::write_json(&presets, out_dir.as_ref().join("presets.json"))
}
