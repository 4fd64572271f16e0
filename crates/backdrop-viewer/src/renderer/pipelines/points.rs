use crate::{renderer::sprite::SpriteTexture, scene::SceneState};
use glam::Mat4;
use wavefield::PointCloud;
use wgpu::util::DeviceExt;

/// Point edge length in world units.
pub const POINT_SIZE: f32 = 1.5;
pub const OPACITY: f32 = 0.8;
/// Fragments whose alpha falls below this are discarded.
pub const ALPHA_TEST: f32 = 0.01;
pub const FOG_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
pub const FOG_DENSITY: f32 = 0.001;

/// Per-frame uniforms. Must match `PointUniforms` in `points.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniforms {
    pub model: Mat4,         // 64 B
    pub view: Mat4,          // +64
    pub proj: Mat4,          // +64 -> 192
    /// rgb = fog colour, w = density.
    pub fog: [f32; 4],       // +16
    /// x = point size, y = opacity, z = alpha test, w = tan(fov_y / 2).
    pub material: [f32; 4],  // +16 -> 224
}

// Compile-time check: buffer size must match the WGSL struct.
const _: [(); 224] = [(); core::mem::size_of::<PointUniforms>()];

impl PointUniforms {
    pub fn from_scene(scene: &SceneState) -> Self {
        Self {
            model: scene.model(),
            view: scene.camera.view(),
            proj: scene.camera.proj,
            fog: [FOG_COLOR[0], FOG_COLOR[1], FOG_COLOR[2], FOG_DENSITY],
            material: [
                POINT_SIZE,
                OPACITY,
                ALPHA_TEST,
                (scene.camera.fov_y_rad * 0.5).tan(),
            ],
        }
    }
}

pub struct PointsPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    /// Flat xyz per point; rewritten whenever the scene marks it dirty.
    position_vb: wgpu::Buffer,
    /// Flat rgb per point; written once.
    color_vb: wgpu::Buffer,
    instances_len: u32,
    // Bound through `bind_group`; held so it lives as long as the pipeline.
    _sprite: SpriteTexture,
}

impl PointsPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_fmt: wgpu::TextureFormat,
        cloud: &PointCloud,
    ) -> Self {
        let sprite = SpriteTexture::new(device, queue, &wavefield::soft_disc(wavefield::SPRITE_SIZE));

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Points Uniform Buffer"),
            size: std::mem::size_of::<PointUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points BGL"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<PointUniforms>() as u64,
                        ),
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
            label: Some("Points Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sprite.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sprite.sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/points.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/points.wgsl").into()),
        });

        // Unit quad (two triangles), expanded per instance in the vertex shader.
        let quad_corners: [[f32; 2]; 6] = [
            [-1.0, -1.0],
            [1.0, -1.0],
            [1.0, 1.0],
            [-1.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
        ];

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Points Quad VB"),
            contents: bytemuck::cast_slice(&quad_corners),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let position_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Positions"),
            contents: bytemuck::cast_slice(cloud.positions()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let color_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Colors"),
            contents: bytemuck::cast_slice(cloud.colors()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Quad corners per vertex; position and colour per instance.
        let vbuf_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 2,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points PipelineLayout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &vbuf_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Transparent sprites without depth writes; nothing else shares the pass.
            depth_stencil: None,
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            quad_vb,
            position_vb,
            color_vb,
            instances_len: cloud.len() as u32,
            _sprite: sprite,
        }
    }

    /// Replaces the whole position buffer. `positions` must be the cloud the pipeline was built from.
    pub fn upload_positions(&self, queue: &wgpu::Queue, positions: &[f32]) {
        queue.write_buffer(&self.position_vb, 0, bytemuck::cast_slice(positions));
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.position_vb.slice(..));
        rpass.set_vertex_buffer(2, self.color_vb.slice(..));
        rpass.draw(0..6, 0..self.instances_len);
    }
}
