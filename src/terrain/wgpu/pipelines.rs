//! Compute pipelines for the elevation stages.
//!
//! The stage sequence matches `terrain::cpu::run`: mask kernel, smoothing
//! kernel per iteration (ping-pong), a host readback for the sort-based
//! ocean threshold, the elevation kernel, one final smoothing pass, and the
//! classification clamps on the host. The readback after mask smoothing is
//! the one mandatory synchronization point.

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use super::context::{TerrainGpuContext, TerrainGpuError};
use crate::terrain::config::ElevationConfig;
use crate::terrain::cpu::{self, FINAL_SMOOTH, MASK_SMOOTH};
use crate::terrain::smoothing::sample_stride;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct Params {
    tile_count: u32,
    stride: u32,
    _pad0: [u32; 2],
    // shape: continent_scale, ocean_ratio, threshold, deep_ocean_start
    shape: [f32; 4],
    // smooth: radius, ocean-world flag, _, _
    smooth: [f32; 4],
}

pub struct ElevationGpu {
    ctx: TerrainGpuContext,
    bgl: wgpu::BindGroupLayout,
    mask: wgpu::ComputePipeline,
    smooth: wgpu::ComputePipeline,
    elevate: wgpu::ComputePipeline,
}

impl ElevationGpu {
    pub fn new(ctx: TerrainGpuContext) -> Self {
        let shader_src = {
            let noise = include_str!("shaders/noise.wgsl");
            let elevation = include_str!("shaders/elevation.wgsl");
            format!("{noise}\n{elevation}")
        };
        let module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("planetile-elevation-wgsl"),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(shader_src)),
            });

        let storage_entry = |binding, read_only| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("planetile-elevation-bgl"),
                entries: &[
                    // Params
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(
                                std::num::NonZeroU64::new(std::mem::size_of::<Params>() as u64)
                                    .unwrap(),
                            ),
                        },
                        count: None,
                    },
                    // Tile positions
                    storage_entry(1, true),
                    // Permutation table
                    storage_entry(2, true),
                    // Field in
                    storage_entry(3, true),
                    // Field out
                    storage_entry(4, false),
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("planetile-elevation-pipeline-layout"),
                bind_group_layouts: &[&bgl],
                push_constant_ranges: &[],
            });

        let make_pipeline = |entry_point: &'static str| {
            ctx.device
                .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some(entry_point),
                    layout: Some(&pipeline_layout),
                    module: &module,
                    entry_point: Some(entry_point),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    cache: None,
                })
        };

        let mask = make_pipeline("continent_mask");
        let smooth = make_pipeline("smooth_field");
        let elevate = make_pipeline("shape_elevation");

        Self {
            ctx,
            bgl,
            mask,
            smooth,
            elevate,
        }
    }

    fn create_bind_group(
        &self,
        params: &wgpu::Buffer,
        positions: &wgpu::Buffer,
        perm: &wgpu::Buffer,
        field_in: &wgpu::Buffer,
        field_out: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        self.ctx
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("planetile-elevation-bind-group"),
                layout: &self.bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: positions.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: perm.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: field_in.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: field_out.as_entire_binding(),
                    },
                ],
            })
    }

    fn dispatch(
        encoder: &mut wgpu::CommandEncoder,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
        tile_count: u32,
    ) {
        let groups = tile_count.div_ceil(64);
        let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("planetile-elevation-pass"),
            timestamp_writes: None,
        });
        cpass.set_pipeline(pipeline);
        cpass.set_bind_group(0, bind_group, &[]);
        cpass.dispatch_workgroups(groups, 1, 1);
    }

    fn readback_f32(&self, buffer: &wgpu::Buffer, len: usize) -> Vec<f32> {
        let size = (len * std::mem::size_of::<f32>()) as u64;
        let readback = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("planetile-elevation-readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("planetile-elevation-readback-encoder"),
            });
        encoder.copy_buffer_to_buffer(buffer, 0, &readback, 0, size);
        self.ctx.queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        // Block until the mapping is ready.
        self.ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv().unwrap().unwrap();
        let data = slice.get_mapped_range();
        let out: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        readback.unmap();
        out
    }

    /// Runs the full elevation stage sequence on the GPU.
    ///
    /// `perm` is the seeded permutation table shared with the CPU noise
    /// instance; it is uploaded read-only and never mutated by a kernel.
    pub fn run(
        &self,
        positions: &[Vec3],
        perm: &[u8; 512],
        config: &ElevationConfig,
    ) -> Result<Vec<f32>, TerrainGpuError> {
        let tile_count = positions.len() as u32;
        if tile_count == 0 {
            return Ok(Vec::new());
        }
        let stride = sample_stride(positions.len()) as u32;

        let padded: Vec<[f32; 4]> = positions.iter().map(|p| [p.x, p.y, p.z, 0.0]).collect();
        let positions_buf =
            self.ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("planetile-tile-positions"),
                    contents: bytemuck::cast_slice(&padded),
                    usage: wgpu::BufferUsages::STORAGE,
                });

        let perm_words: Vec<u32> = perm.iter().map(|&v| v as u32).collect();
        let perm_buf = self
            .ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("planetile-permutation"),
                contents: bytemuck::cast_slice(&perm_words),
                usage: wgpu::BufferUsages::STORAGE,
            });

        let field_size = (positions.len() * std::mem::size_of::<f32>()) as u64;
        let make_field = |label: &str| {
            self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: field_size,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        };
        let field = [make_field("planetile-field-a"), make_field("planetile-field-b")];

        let ocean_world = if config.ocean_ratio >= 1.0 { 1.0 } else { 0.0 };
        let mut params = Params {
            tile_count,
            stride,
            _pad0: [0; 2],
            shape: [
                config.continent_scale,
                config.ocean_ratio,
                0.0,
                config.deep_ocean_start,
            ],
            smooth: [MASK_SMOOTH.radius, ocean_world, 0.0, 0.0],
        };
        let params_buf = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("planetile-elevation-params"),
            size: std::mem::size_of::<Params>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.ctx
            .queue
            .write_buffer(&params_buf, 0, bytemuck::bytes_of(&params));

        // Bind groups for the two ping-pong directions.
        let bind_0_to_1 =
            self.create_bind_group(&params_buf, &positions_buf, &perm_buf, &field[0], &field[1]);
        let bind_1_to_0 =
            self.create_bind_group(&params_buf, &positions_buf, &perm_buf, &field[1], &field[0]);

        // Pass 1: mask into field 0, then the smoothing iterations.
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("planetile-mask-encoder"),
            });
        Self::dispatch(&mut encoder, &self.mask, &bind_1_to_0, tile_count);
        let mut cur = 0usize;
        for _ in 0..MASK_SMOOTH.iterations {
            let bg = if cur == 0 { &bind_0_to_1 } else { &bind_1_to_0 };
            Self::dispatch(&mut encoder, &self.smooth, bg, tile_count);
            cur ^= 1;
        }
        self.ctx.queue.submit(Some(encoder.finish()));

        // Mandatory barrier: the threshold needs a full sort of the smoothed
        // mask on the host before the elevation kernel can run.
        let mask = self.readback_f32(&field[cur], positions.len());
        let threshold = cpu::ocean_threshold(&mask, config.ocean_ratio);

        params.shape[2] = threshold;
        params.smooth[0] = FINAL_SMOOTH.radius;
        self.ctx
            .queue
            .write_buffer(&params_buf, 0, bytemuck::bytes_of(&params));

        // Pass 2 plus final smoothing.
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("planetile-elevation-encoder"),
            });
        {
            let bg = if cur == 0 { &bind_0_to_1 } else { &bind_1_to_0 };
            Self::dispatch(&mut encoder, &self.elevate, bg, tile_count);
            cur ^= 1;
        }
        for _ in 0..FINAL_SMOOTH.iterations {
            let bg = if cur == 0 { &bind_0_to_1 } else { &bind_1_to_0 };
            Self::dispatch(&mut encoder, &self.smooth, bg, tile_count);
            cur ^= 1;
        }
        self.ctx.queue.submit(Some(encoder.finish()));

        let mut heights = self.readback_f32(&field[cur], positions.len());
        cpu::classify_clamp(&mut heights, &mask, threshold, config);
        Ok(heights)
    }
}
