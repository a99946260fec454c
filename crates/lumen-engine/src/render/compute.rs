//! Compute pipeline helpers shared by post effects.

/// Edge length of the square workgroups every pixel-space shader declares
/// (`@workgroup_size(8, 8, 1)`).
pub const WORKGROUP_SIZE: u32 = 8;

/// Workgroup counts covering a `width × height` pixel domain.
#[inline]
pub fn workgroup_count(width: u32, height: u32) -> [u32; 3] {
    [width.div_ceil(WORKGROUP_SIZE), height.div_ceil(WORKGROUP_SIZE), 1]
}

// ── layout entries ────────────────────────────────────────────────────────

pub fn uniform_buffer(binding: u32) -> wgpu::BindGroupLayoutEntry {
    buffer_entry(binding, wgpu::BufferBindingType::Uniform)
}

pub fn storage_buffer(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    buffer_entry(binding, wgpu::BufferBindingType::Storage { read_only })
}

fn buffer_entry(binding: u32, ty: wgpu::BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Sampled 2D float texture. Non-filterable entries accept any float format
/// and are meant for `textureLoad`.
pub fn sampled_texture(binding: u32, filterable: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Write-only 2D storage texture.
pub fn storage_texture(binding: u32, format: wgpu::TextureFormat) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::WriteOnly,
            format,
            view_dimension: wgpu::TextureViewDimension::D2,
        },
        count: None,
    }
}

pub fn filtering_sampler(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

// ── program ───────────────────────────────────────────────────────────────

/// A compiled compute shader with its single bind group layout (group 0).
///
/// Entry point is always `main`.
pub struct ComputeProgram {
    label: &'static str,
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
}

impl ComputeProgram {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        source: &str,
        entries: &[wgpu::BindGroupLayoutEntry],
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        log::debug!("compiled compute program `{label}`");

        Self { label, pipeline, layout }
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Binds resources against this program's layout and sizes the dispatch
    /// for a `width × height` pixel domain.
    pub fn dispatch(
        &self,
        device: &wgpu::Device,
        entries: &[wgpu::BindGroupEntry<'_>],
        width: u32,
        height: u32,
    ) -> ComputeDispatch {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout: &self.layout,
            entries,
        });

        ComputeDispatch {
            label: self.label,
            pipeline: self.pipeline.clone(),
            bind_group,
            workgroups: workgroup_count(width, height),
        }
    }
}

/// One ready-to-encode dispatch: pipeline, bound resources, workgroup counts.
pub struct ComputeDispatch {
    label: &'static str,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    workgroups: [u32; 3],
}

impl ComputeDispatch {
    #[inline]
    pub fn workgroups(&self) -> [u32; 3] {
        self.workgroups
    }

    pub fn encode(&self, pass: &mut wgpu::ComputePass<'_>) {
        let [x, y, z] = self.workgroups;
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(x, y, z);
    }
}

/// Encodes `dispatches` in order into a single compute pass.
///
/// wgpu tracks resource usage per dispatch, so a later dispatch observes the
/// writes of an earlier one without explicit barriers.
pub fn encode_sequence(encoder: &mut wgpu::CommandEncoder, label: &str, dispatches: &[&ComputeDispatch]) {
    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
        label: Some(label),
        timestamp_writes: None,
    });
    for dispatch in dispatches {
        log::trace!("dispatch `{}` {:?}", dispatch.label, dispatch.workgroups);
        dispatch.encode(&mut pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_of_tile() {
        assert_eq!(workgroup_count(64, 32), [8, 4, 1]);
    }

    #[test]
    fn partial_tiles_round_up() {
        assert_eq!(workgroup_count(65, 1), [9, 1, 1]);
        assert_eq!(workgroup_count(959, 539), [120, 68, 1]);
    }

    #[test]
    fn zero_extent_dispatches_nothing() {
        assert_eq!(workgroup_count(0, 100), [0, 13, 1]);
    }
}
