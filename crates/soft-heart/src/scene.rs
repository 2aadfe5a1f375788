//! The control surface over a single active soft body.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{HeartConfig, Material, Model, NodeAdvance, Placement, SoftBody, SoftBodyConfig, SoftBodyError, ZoneRouting};

/// Anything that can turn a model name into meshes, such as a file loader.
pub trait MeshSource {
    /// Loads every mesh of the named model.
    ///
    /// # Errors
    ///
    /// - If the source does not know the model or cannot read it.
    fn load(&self, source: &str) -> Result<Model, SoftBodyError>;
}

/// A model together with the body and heart settings it is simulated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPreset {
    /// The name used to select the preset.
    pub name: String,
    /// The name handed to the `MeshSource`.
    pub source: String,
    /// How the body is built.
    pub config: SoftBodyConfig,
    /// The heart attached to the body, if any.
    pub heart: Option<HeartConfig>,
}

impl ModelPreset {
    /// Creates a preset without a heart.
    #[must_use]
    pub fn new(name: &str, source: &str, config: SoftBodyConfig) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            config,
            heart: None,
        }
    }

    /// Returns the preset with a heart.
    #[must_use]
    pub fn with_heart(mut self, heart: HeartConfig) -> Self {
        self.heart = Some(heart);
        self
    }

    /// The preset of each model in the demo gallery, in swap order.
    #[must_use]
    pub fn gallery() -> Vec<Self> {
        let body = |material: Material, translation: Vec3, scale: f32| {
            SoftBodyConfig::default()
                .with_material(material)
                .with_placement(Placement::at(translation, scale))
        };
        let raised = Vec3::new(0.0, 2.0, 0.0);
        let heart = HeartConfig::default()
            .with_advance(NodeAdvance::Rk4)
            .with_routing(ZoneRouting::default().with_gain(0.02));

        vec![
            Self::new("heart", "heart.msh", body(Material::new(0.2, 30.0, 5_000.0, 0.9), Vec3::new(0.0, 6.0, 0.0), 5.0))
                .with_heart(heart),
            Self::new("ball", "ball.msh", body(Material::default(), Vec3::new(0.0, 6.0, 0.0), 5.0)),
            Self::new("cube", "cube.obj", body(Material::new(0.0, 1.0, 10.0, 0.1), raised, 1.5)),
            Self::new("diamond", "diamond.obj", body(Material::new(0.0, 1.0, 5.0, 0.1), raised, 2.0)),
            Self::new("star", "star.obj", body(Material::new(0.0, 1.0, 5.0, 0.1), raised, 2.0)),
            Self::new("donut", "donut.obj", body(Material::new(0.0, 1.0, 5.0, 0.1), raised, 1.5)),
            Self::new("acrobat", "acrobat.obj", body(Material::new(0.0, 0.5, 2.5, 0.1), raised, 0.3)),
        ]
    }
}

/// A horizontal push direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards negative x.
    Forward,
    /// Towards positive x.
    Back,
    /// Towards positive z.
    Left,
    /// Towards negative z.
    Right,
}

impl Direction {
    /// All directions.
    pub const ALL: [Self; 4] = [Self::Forward, Self::Back, Self::Left, Self::Right];

    /// The unit vector of the direction.
    #[must_use]
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::Forward => Vec3::NEG_X,
            Self::Back => Vec3::X,
            Self::Left => Vec3::Z,
            Self::Right => Vec3::NEG_Z,
        }
    }
}

/// A discrete control event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    /// Restore the body to its rest state.
    Reset,
    /// Push every point mass upwards.
    Jump,
    /// Push every point mass horizontally.
    Move(Direction),
    /// Swap to the next model preset.
    NextModel,
}

/// The forces behind the control events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    /// Added to every point mass each frame.
    pub gravity: Vec3,
    /// Added to every point mass on `Control::Jump`.
    pub jump: Vec3,
    /// The magnitude of the push on `Control::Move`.
    pub push: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -2.0, 0.0),
            jump: Vec3::new(0.0, 250.0, 0.0),
            push: 7.5,
        }
    }
}

/// One active soft body, the presets it can be swapped between, and the control events that act on it.
#[derive(Debug)]
pub struct Scene<S: MeshSource> {
    /// Where models are loaded from.
    source: S,
    /// The presets, in swap order.
    presets: Vec<ModelPreset>,
    /// The preset of the active body.
    active: usize,
    /// The preset tried by the last swap.
    cursor: usize,
    /// The active body.
    body: SoftBody,
    /// The forces behind the control events.
    controls: Controls,
}

impl<S: MeshSource> Scene<S> {
    /// Creates a scene whose active body is built from the first preset.
    ///
    /// # Errors
    ///
    /// - If `presets` is empty.
    /// - If the first preset cannot be built.
    pub fn new(source: S, presets: Vec<ModelPreset>, controls: Controls) -> Result<Self, SoftBodyError> {
        let first = presets.first().ok_or(SoftBodyError::NoPresets)?;
        let body = build_body(&source, first)?;
        ftlog::info!("Scene starts with {}", first.name);
        Ok(Self {
            source,
            presets,
            active: 0,
            cursor: 0,
            body,
            controls,
        })
    }

    /// Builds a body for a preset.
    ///
    /// # Errors
    ///
    /// - If the model cannot be loaded or the body cannot be built.
    pub fn build(&self, preset: &ModelPreset) -> Result<SoftBody, SoftBodyError> {
        build_body(&self.source, preset)
    }

    /// Replaces the active body with one built from the preset at `index`.
    ///
    /// The new body is built completely before it replaces the old one. On failure the old body stays active.
    fn swap_to(&mut self, index: usize) -> Result<(), SoftBodyError> {
        self.cursor = index;
        let preset = &self.presets[index];
        match build_body(&self.source, preset) {
            Ok(body) => {
                ftlog::info!("Swapped to {}", preset.name);
                self.body = body;
                self.active = index;
                Ok(())
            }
            Err(e) => {
                ftlog::warn!("Keeping {} after failing to build {}: {e}", self.presets[self.active].name, preset.name);
                Err(e)
            }
        }
    }

    /// Makes the named preset active.
    ///
    /// # Errors
    ///
    /// - If no preset has that name.
    /// - If the preset cannot be built. The old body stays active.
    pub fn select(&mut self, name: &str) -> Result<(), SoftBodyError> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| SoftBodyError::UnknownModel(name.to_string()))?;
        self.swap_to(index)
    }

    /// Swaps to the preset after the one tried last.
    ///
    /// # Errors
    ///
    /// - If that preset cannot be built. The old body stays active, and the next swap tries the preset after the failed one.
    pub fn next_model(&mut self) -> Result<(), SoftBodyError> {
        self.swap_to((self.cursor + 1) % self.presets.len())
    }

    /// Applies a control event to the active body.
    ///
    /// # Errors
    ///
    /// - See `Scene::next_model`.
    pub fn apply(&mut self, control: Control) -> Result<(), SoftBodyError> {
        match control {
            Control::Reset => self.body.reset(),
            Control::Jump => self.body.add_force(self.controls.jump),
            Control::Move(direction) => self.body.add_force(direction.unit() * self.controls.push),
            Control::NextModel => return self.next_model(),
        }
        Ok(())
    }

    /// Applies gravity and advances the active body by one time-step.
    pub fn frame(&mut self, dt: f32) {
        self.body.add_force(self.controls.gravity);
        self.body.update(dt);
    }

    /// The active body.
    #[must_use]
    pub const fn body(&self) -> &SoftBody {
        &self.body
    }

    /// The active body, as mutable.
    pub fn body_mut(&mut self) -> &mut SoftBody {
        &mut self.body
    }

    /// The preset of the active body.
    #[must_use]
    pub fn preset(&self) -> &ModelPreset {
        &self.presets[self.active]
    }

    /// The presets, in swap order.
    #[must_use]
    pub fn presets(&self) -> &[ModelPreset] {
        &self.presets
    }

    /// The forces behind the control events.
    #[must_use]
    pub const fn controls(&self) -> &Controls {
        &self.controls
    }
}

/// Loads a preset's model and builds its body, with its heart attached.
fn build_body<S: MeshSource>(source: &S, preset: &ModelPreset) -> Result<SoftBody, SoftBodyError> {
    let model = source.load(&preset.source)?;
    let body = SoftBody::from_model(model, &preset.config)?;
    Ok(match &preset.heart {
        Some(heart) => body.with_heart(heart),
        None => body,
    })
}
