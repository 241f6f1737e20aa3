//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, bind groups) and
//! records into a [`RenderTarget`] handed out by the frame context.
//!
//! Convention:
//! - world space is y-up, mapped to clip space by a [`Camera2d`]
//! - matrices are glam `Mat4` (column-major), applied as `P * V * M * v`

mod camera;
mod ctx;
pub mod sprite;
pub mod texture;

pub use camera::Camera2d;
pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::{SpriteDraw, SpriteRenderer, TextureId};
pub use texture::{sprite_texture_format, DecodedImage, Texture};
