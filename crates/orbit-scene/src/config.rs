//! Scene configuration.
//!
//! Every constant the demo uses lives here with its default; nothing is read
//! from disk or the environment.

use std::path::PathBuf;

use glam::Vec2;
use winit::dpi::LogicalSize;

use orbit_engine::paint::Color;
use orbit_engine::render::Camera2d;
use orbit_engine::window::RuntimeConfig;

/// Animation constants for both sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Base rotation speed in radians per second.
    pub rotation_speed: f32,
    /// Multiplier on `rotation_speed` for the primary sprite.
    pub primary_spin: f32,
    /// Multiplier on `rotation_speed` for the orbiting sprite.
    pub orbiting_spin: f32,

    /// Amplitude of the primary sprite's diagonal oscillation.
    pub movement_range: f32,
    /// Distance between the orbiting sprite and the primary sprite.
    pub orbit_radius: f32,

    /// Angular frequency of the primary sprite's scale pulse.
    pub scale_speed: f32,
    /// Smallest uniform scale the pulse reaches.
    pub scale_min: f32,
    /// Largest uniform scale the pulse reaches.
    pub scale_max: f32,

    /// Primary sprite position before the first update.
    pub primary_start: Vec2,
    /// Orbiting sprite position before the first update.
    pub orbiting_start: Vec2,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            primary_spin: 1.0,
            orbiting_spin: 2.0,
            movement_range: 2.0,
            orbit_radius: 2.0,
            scale_speed: 1.0,
            scale_min: 0.5,
            scale_max: 2.0,
            primary_start: Vec2::new(-3.0, 0.0),
            orbiting_start: Vec2::new(3.0, 0.0),
        }
    }
}

/// Top-level demo configuration.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub title: String,
    pub window_size: LogicalSize<f64>,
    pub clear_color: Color,
    pub camera: Camera2d,

    pub primary_asset: PathBuf,
    pub orbiting_asset: PathBuf,

    pub animation: AnimationConfig,
}

impl SceneConfig {
    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: self.window_size,
            ..RuntimeConfig::default()
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");

        Self {
            title: "orbit".to_string(),
            window_size: LogicalSize::new(1280.0, 960.0),
            clear_color: Color::from_srgb(0.9765625, 0.9609375, 0.97265625, 1.0),
            camera: Camera2d::orthographic(-5.0, 5.0, -3.75, 3.75, -1.0, 1.0),
            primary_asset: assets.join("silverwolf.png"),
            orbiting_asset: assets.join("herta.png"),
            animation: AnimationConfig::default(),
        }
    }
}
