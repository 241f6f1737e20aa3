use anyhow::{Context, Result};

use orbit_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use orbit_engine::render::{Camera2d, RenderCtx, SpriteDraw, SpriteRenderer, TextureId};

use crate::anim::SceneState;
use crate::config::SceneConfig;
use crate::transform::{orbiting_model, primary_model};

/// Texture handles, available once `on_start` succeeded.
#[derive(Debug, Copy, Clone)]
struct SpriteTextures {
    primary: TextureId,
    orbiting: TextureId,
}

/// The two-sprite demo.
pub struct OrbitApp {
    config: SceneConfig,
    scene: SceneState,
    camera: Camera2d,
    renderer: SpriteRenderer,
    textures: Option<SpriteTextures>,
}

impl OrbitApp {
    pub fn new(config: SceneConfig) -> Self {
        let scene = SceneState::new(&config.animation);
        let camera = config.camera;
        Self {
            config,
            scene,
            camera,
            renderer: SpriteRenderer::new(),
            textures: None,
        }
    }
}

/// Draw list for one frame: primary first, orbiting on top.
fn frame_draws(scene: &SceneState, primary: TextureId, orbiting: TextureId) -> [SpriteDraw; 2] {
    [
        SpriteDraw::new(primary_model(&scene.primary), primary),
        SpriteDraw::new(orbiting_model(&scene.orbiting), orbiting),
    ]
}

impl App for OrbitApp {
    fn on_start(&mut self, _window: &WindowCtx<'_>, ctx: &RenderCtx<'_>) -> Result<()> {
        let primary = self
            .renderer
            .load_texture(ctx, &self.config.primary_asset)
            .context("primary sprite")?;
        let orbiting = self
            .renderer
            .load_texture(ctx, &self.config.orbiting_asset)
            .context("orbiting sprite")?;

        for (id, path) in [
            (primary, &self.config.primary_asset),
            (orbiting, &self.config.orbiting_asset),
        ] {
            if let Some((w, h)) = self.renderer.texture_size(id) {
                log::info!("loaded sprite {} ({w}x{h})", path.display());
            }
        }

        self.textures = Some(SpriteTextures { primary, orbiting });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(textures) = self.textures else {
            log::error!("frame requested before sprites were loaded");
            return AppControl::Exit;
        };

        self.scene.update(ctx.time.ticks, &self.config.animation);

        if ctx.time.frame_index % 600 == 0 {
            log::debug!(
                "frame {} t={:.2}s primary={:?} orbiting={:?}",
                ctx.time.frame_index,
                ctx.time.ticks,
                self.scene.primary.position,
                self.scene.orbiting.position
            );
        }

        let draws = frame_draws(&self.scene, textures.primary, textures.orbiting);
        let camera = &self.camera;
        let renderer = &mut self.renderer;

        ctx.render(self.config.clear_color, |rctx, target| {
            renderer.render(rctx, target, camera, &draws);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn draws_pair_each_matrix_with_its_texture() {
        let cfg = SceneConfig::default();
        let mut scene = SceneState::new(&cfg.animation);
        scene.update(1.0, &cfg.animation);

        let (a, b) = (TextureId::from_index(0), TextureId::from_index(1));
        let draws = frame_draws(&scene, a, b);

        assert_eq!(draws[0].texture, a);
        assert_eq!(draws[1].texture, b);
        assert_eq!(draws[0].model, primary_model(&scene.primary));
        assert_eq!(draws[1].model, orbiting_model(&scene.orbiting));
    }

    #[test]
    fn orbiting_sprite_is_drawn_last() {
        let cfg = SceneConfig::default();
        let scene = SceneState::new(&cfg.animation);
        let draws = frame_draws(&scene, TextureId::from_index(7), TextureId::from_index(9));
        assert_eq!(draws.last().map(|d| d.texture), Some(TextureId::from_index(9)));
    }

    #[test]
    fn initial_draws_sit_at_start_positions() {
        let cfg = SceneConfig::default();
        let scene = SceneState::new(&cfg.animation);
        let draws = frame_draws(&scene, TextureId::from_index(0), TextureId::from_index(1));

        assert_eq!(draws[0].model, Mat4::from_translation(Vec3::new(-3.0, 0.0, 0.0)));
        assert_eq!(draws[1].model, Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn new_app_has_no_textures_until_started() {
        let app = OrbitApp::new(SceneConfig::default());
        assert!(app.textures.is_none());
        assert_eq!(app.camera, SceneConfig::default().camera);
    }
}
