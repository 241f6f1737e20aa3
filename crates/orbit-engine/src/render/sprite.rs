//! Textured sprite renderer.
//!
//! Every sprite is the same unit quad (`[-0.5, 0.5]²`) placed in the world by
//! its own model matrix. Per-draw matrices live in one uniform buffer, one
//! aligned slot per draw, selected with a dynamic offset.

use std::path::Path;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::texture::{DecodedImage, Texture};
use super::{Camera2d, RenderCtx, RenderTarget};

/// Handle to a texture registered with a [`SpriteRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    /// Wraps a raw registration index.
    #[inline]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }
}

/// One sprite to draw this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteDraw {
    pub model: Mat4,
    pub texture: TextureId,
}

impl SpriteDraw {
    #[inline]
    pub fn new(model: Mat4, texture: TextureId) -> Self {
        Self { model, texture }
    }
}

struct SpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws textured quads in submission order (later draws end up on top).
///
/// GPU objects are created lazily on first use, and the pipeline is rebuilt
/// if the surface format changes.
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    uniform_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,

    uniform_ubo: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,
    uniform_stride: u64,

    textures: Vec<SpriteTexture>,

    warned_unknown_texture: bool,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the image at `path` and registers it as a sprite texture.
    pub fn load_texture(&mut self, ctx: &RenderCtx<'_>, path: impl AsRef<Path>) -> Result<TextureId> {
        let path = path.as_ref();
        let image = DecodedImage::load(path)?;
        self.add_texture(ctx, &image, &path.display().to_string())
    }

    /// Uploads decoded pixels and registers them as a sprite texture.
    pub fn add_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        image: &DecodedImage,
        label: &str,
    ) -> Result<TextureId> {
        self.ensure_layouts(ctx);
        self.ensure_sampler(ctx);

        let texture = Texture::from_image(ctx, image, label)?;

        let Some(bgl) = self.texture_bgl.as_ref() else {
            anyhow::bail!("sprite texture layout missing");
        };
        let Some(sampler) = self.sampler.as_ref() else {
            anyhow::bail!("sprite sampler missing");
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbit sprite texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let id = TextureId(self.textures.len() as u32);
        self.textures.push(SpriteTexture { texture, bind_group });
        Ok(id)
    }

    /// Returns the pixel size of a registered texture.
    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures
            .get(id.0 as usize)
            .map(|t| (t.texture.width, t.texture.height))
    }

    /// Records one pass drawing `draws` on top of the target's current contents.
    ///
    /// Draws referencing an unknown texture are skipped (one-time warning).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera2d,
        draws: &[SpriteDraw],
    ) {
        if draws.is_empty() {
            return;
        }

        self.ensure_layouts(ctx);
        self.ensure_sampler(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_uniform_capacity(ctx, draws.len());

        // Resolve textures while `self` is still mutably borrowable.
        let mut resolved: Vec<(u32, usize)> = Vec::with_capacity(draws.len());
        for (slot, draw) in draws.iter().enumerate() {
            let index = draw.texture.0 as usize;
            if index < self.textures.len() {
                resolved.push(((slot as u64 * self.uniform_stride) as u32, index));
            } else if !self.warned_unknown_texture {
                log::warn!("SpriteRenderer: draw references unknown texture {:?}", draw.texture);
                self.warned_unknown_texture = true;
            }
        }

        if resolved.is_empty() {
            return;
        }

        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let staging = pack_uniforms(self.uniform_stride, camera, draws);
        ctx.queue.write_buffer(ubo, 0, &staging);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(uniform_bg) = self.uniform_bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orbit sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));

        for (offset, index) in resolved {
            rpass.set_bind_group(0, uniform_bg, &[offset]);
            rpass.set_bind_group(1, &self.textures[index].bind_group, &[]);
            rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.uniform_bgl.is_some() && self.texture_bgl.is_some() {
            return;
        }

        let uniform_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbit sprite uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(SPRITE_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbit sprite texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        self.uniform_bgl = Some(uniform_bgl);
        self.texture_bgl = Some(texture_bgl);
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        // Nearest sampling in both directions, no mipmaps.
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("orbit sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let (Some(uniform_bgl), Some(texture_bgl)) =
            (self.uniform_bgl.as_ref(), self.texture_bgl.as_ref())
        else {
            return;
        };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orbit sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("orbit sprite pipeline layout"),
            bind_group_layouts: &[uniform_bgl, texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("orbit sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("SpriteRenderer: pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("orbit sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.uniform_capacity && self.uniform_bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.uniform_bgl.as_ref() else { return };

        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = uniform_stride(SPRITE_UNIFORM_SIZE, alignment);
        let capacity = required.next_power_of_two().max(8);

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbit sprite uniform ubo"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbit sprite uniform bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(SPRITE_UNIFORM_SIZE),
                }),
            }],
        });

        self.uniform_ubo = Some(ubo);
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = capacity;
        self.uniform_stride = stride;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

fn straight_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteUniform {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

const SPRITE_UNIFORM_SIZE: u64 = std::mem::size_of::<SpriteUniform>() as u64;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(x: f32, y: f32, u: f32, w: f32) -> SpriteVertex {
    SpriteVertex { pos: [x, y], uv: [u, w] }
}

/// Two triangles covering `[-0.5, 0.5]²`; texture row 0 lands on the top edge.
const QUAD_VERTICES: [SpriteVertex; 6] = [
    v(-0.5, -0.5, 0.0, 1.0),
    v(0.5, -0.5, 1.0, 1.0),
    v(0.5, 0.5, 1.0, 0.0),
    v(-0.5, -0.5, 0.0, 1.0),
    v(0.5, 0.5, 1.0, 0.0),
    v(-0.5, 0.5, 0.0, 0.0),
];

fn uniform_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment.max(1)) * alignment.max(1)
}

fn pack_uniforms(stride: u64, camera: &Camera2d, draws: &[SpriteDraw]) -> Vec<u8> {
    let projection = camera.projection().to_cols_array_2d();
    let view = camera.view.to_cols_array_2d();

    let mut staging = vec![0u8; stride as usize * draws.len()];
    for (slot, draw) in draws.iter().enumerate() {
        let u = SpriteUniform {
            projection,
            view,
            model: draw.model.to_cols_array_2d(),
        };
        let start = slot * stride as usize;
        staging[start..start + SPRITE_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&u));
    }
    staging
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    // ── quad ──────────────────────────────────────────────────────────────

    #[test]
    fn quad_is_two_triangles_in_unit_square() {
        assert_eq!(QUAD_VERTICES.len(), 6);
        for vert in QUAD_VERTICES {
            assert!(vert.pos[0].abs() == 0.5 && vert.pos[1].abs() == 0.5);
        }
    }

    #[test]
    fn quad_uvs_map_corner_to_corner() {
        // Bottom-left samples the last texture row, top-right the first.
        for vert in QUAD_VERTICES {
            assert_eq!(vert.uv, [vert.pos[0] + 0.5, 0.5 - vert.pos[1]]);
        }
    }

    #[test]
    fn quad_triangles_are_counter_clockwise() {
        for tri in QUAD_VERTICES.chunks(3) {
            let (a, b, c) = (tri[0].pos, tri[1].pos, tri[2].pos);
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn uniform_holds_three_matrices() {
        assert_eq!(SPRITE_UNIFORM_SIZE, 3 * 64);
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(uniform_stride(192, 256), 256);
        assert_eq!(uniform_stride(192, 64), 192);
        assert_eq!(uniform_stride(300, 256), 512);
    }

    #[test]
    fn packed_models_land_in_their_slots() {
        let camera = Camera2d::default();
        let a = Mat4::from_translation(Vec3::new(1.0, 2.0, 0.0));
        let b = Mat4::from_translation(Vec3::new(-3.0, 4.0, 0.0));
        let draws = [
            SpriteDraw::new(a, TextureId(0)),
            SpriteDraw::new(b, TextureId(1)),
        ];

        let staging = pack_uniforms(256, &camera, &draws);
        assert_eq!(staging.len(), 512);

        let read = |offset: usize| -> Mat4 {
            let cols: [f32; 16] = bytemuck::pod_read_unaligned(&staging[offset..offset + 64]);
            Mat4::from_cols_array(&cols)
        };
        assert_eq!(read(0), camera.projection());
        assert_eq!(read(64), Mat4::IDENTITY);
        assert_eq!(read(128), a);
        assert_eq!(read(256 + 128), b);
    }
}
