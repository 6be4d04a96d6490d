//! GPU pipeline for marker point sprites.
//!
//! Instanced quads, six vertices per marker. The sizing contract lives in
//! `shaders/markers.wgsl`: screen size `size * size / (distance + 1)` and a
//! fragment discard below alpha 0.5, which supports atlases with transparent
//! margins.

use anyhow::{ensure, Result};
use wgpu::util::DeviceExt;

use crate::batch::{MarkerBatch, PointInstance};
use crate::host::CameraSnapshot;

/// Horizontal sprite strip supplied by the embedder.
///
/// The crate does no image decoding; `rgba` is tightly packed RGBA8 data.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    /// Atlas width in pixels.
    pub width: u32,
    /// Atlas height in pixels.
    pub height: u32,
    /// Number of icon columns; a marker's category selects one.
    pub columns: u32,
    /// RGBA8 texel data, row-major.
    pub rgba: Vec<u8>,
}

/// Uniform block consumed by the marker shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerUniform {
    /// World-to-clip transform.
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space (w unused).
    pub camera_pos: [f32; 4],
    /// Viewport dimensions in pixels.
    pub viewport: [f32; 2],
    /// Base sprite size.
    pub size: f32,
    /// Atlas column count.
    pub columns: f32,
}

/// Render pipeline and GPU resources for the marker batch.
pub struct MarkerPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    #[allow(dead_code)]
    // Texture must stay alive for the bind group even if unused directly.
    atlas_texture: wgpu::Texture,
    instance_buffer: Option<wgpu::Buffer>,
    instance_count: u32,
    columns: u32,
}

impl MarkerPipeline {
    /// Create the pipeline and upload the sprite atlas.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        atlas: &SpriteAtlas,
    ) -> Result<Self> {
        ensure!(atlas.columns > 0, "sprite atlas needs at least one column");
        ensure!(
            atlas.rgba.len() == (atlas.width * atlas.height * 4) as usize,
            "sprite atlas data is {} bytes but {}x{} RGBA needs {}",
            atlas.rgba.len(),
            atlas.width,
            atlas.height,
            atlas.width * atlas.height * 4,
        );

        let texture_size = wgpu::Extent3d {
            width: atlas.width,
            height: atlas.height,
            depth_or_array_layers: 1,
        };
        let atlas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Marker Atlas Texture"),
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &atlas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas.rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(atlas.width * 4),
                rows_per_image: Some(atlas.height),
            },
            texture_size,
        );

        let texture_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Marker Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Marker Uniform Buffer"),
            size: std::mem::size_of::<MarkerUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Marker Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Marker Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Marker Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/markers.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Marker Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Drawn after the scene pass into the scene's color target; the
        // overlay carries no depth attachment of its own.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Marker Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[PointInstance::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
            multiview: None,
        });

        tracing::info!(
            width = atlas.width,
            height = atlas.height,
            columns = atlas.columns,
            "marker pipeline created"
        );

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
            atlas_texture,
            instance_buffer: None,
            instance_count: 0,
            columns: atlas.columns,
        })
    }

    /// Re-upload instance data when the batch changed since the last upload.
    pub fn upload(&mut self, device: &wgpu::Device, batch: &mut MarkerBatch) {
        if !batch.take_dirty() && self.instance_buffer.is_some() {
            return;
        }
        let instances = batch.instances();
        if instances.is_empty() {
            self.instance_buffer = None;
            self.instance_count = 0;
            return;
        }
        self.instance_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Marker Instance Buffer"),
                contents: bytemuck::cast_slice(instances),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.instance_count = instances.len() as u32;
        tracing::trace!(
            count = self.instance_count,
            generation = batch.generation(),
            "uploaded marker instances"
        );
    }

    /// Write the camera uniform for this frame.
    pub fn update_camera(
        &self,
        queue: &wgpu::Queue,
        camera: &CameraSnapshot,
        viewport: (u32, u32),
        point_size: f32,
    ) {
        let uniform = MarkerUniform {
            view_proj: camera.view_proj.to_cols_array_2d(),
            camera_pos: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            viewport: [viewport.0 as f32, viewport.1 as f32],
            size: point_size,
            columns: self.columns as f32,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Draw the marker batch as instanced quads.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        let Some(instance_buffer) = self.instance_buffer.as_ref() else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, instance_buffer.slice(..));
        pass.draw(0..6, 0..self.instance_count);
    }
}
