//! RGBA texture decoding and upload.

use std::path::Path;

use anyhow::{Context, Result};

use super::RenderCtx;

/// Decoded straight-alpha RGBA8 pixels, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Decodes an encoded image (PNG, JPEG) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("failed to decode image")?;
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        anyhow::ensure!(width > 0 && height > 0, "image has zero size");

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Reads and decodes the image at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("unable to read image {}", path.display()))?;
        Self::decode(&bytes).with_context(|| format!("unable to load image {}", path.display()))
    }
}

/// Texel format for sprite images drawn onto a `surface_format` target.
///
/// An sRGB surface re-encodes on write, so texels are decoded to linear on
/// sample. A non-sRGB surface stores what the shader writes, so texels are
/// sampled raw.
pub fn sprite_texture_format(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

/// GPU texture + default view.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Uploads `image` into a new sampled texture matching the surface encoding.
    pub fn from_image(ctx: &RenderCtx<'_>, image: &DecodedImage, label: &str) -> Result<Self> {
        let max = ctx.device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            image.width <= max && image.height <= max,
            "{label}: {}x{} exceeds the device texture limit of {max}",
            image.width,
            image.height
        );
        anyhow::ensure!(
            image.pixels.len() == image.width as usize * image.height as usize * 4,
            "{label}: pixel buffer does not match {}x{} RGBA8",
            image.width,
            image.height
        );

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let format = sprite_texture_format(ctx.surface_format);
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!(
            "uploaded texture {label} ({}x{}, {format:?})",
            image.width,
            image.height
        );

        Ok(Self {
            texture,
            view,
            format,
            width: image.width,
            height: image.height,
        })
    }
}
