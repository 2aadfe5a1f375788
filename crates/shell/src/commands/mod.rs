//! The commands under the `shell` CLI.

mod inspect;
mod presets;
mod simulate;

use clap::Subcommand;

pub use inspect::inspect;
pub use presets::presets;
pub use simulate::simulate;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scene for a number of frames and save the trace to `trace.npz`.
    Simulate {
        /// The name of the preset to simulate.
        #[arg(short('m'), long, default_value = "heart")]
        model: String,

        /// The number of frames to simulate.
        #[arg(short('n'), long, default_value_t = 600)]
        steps: usize,

        /// The time-step of each frame, in seconds.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Apply a random control event every this many frames.
        #[arg(short('k'), long)]
        kick_every: Option<usize>,
    },
    /// Build a preset's body and save its statistics to `summary.json`.
    Inspect {
        /// The name of the preset to inspect.
        #[arg(short('m'), long, default_value = "heart")]
        model: String,
    },
    /// Save the model gallery to `presets.json`.
    Presets,
}
