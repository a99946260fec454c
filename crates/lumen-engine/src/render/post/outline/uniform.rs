use bytemuck::{Pod, Zeroable};

use crate::settings::OutlineSettings;

/// `OutlineSetting` uniform shared by all three outline shaders.
///
/// Layout must match the WGSL struct: eight `f32`, 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct OutlineUniform {
    pub strength: f32,
    pub use_add_mode: f32, // 0 or 1
    pub outline_pixel: f32,
    pub fade_outline_pixel: f32,
    pub low_width: f32,
    pub low_height: f32,
    pub slot_count: f32,
    pub max_entities: f32,
}

impl OutlineUniform {
    pub(super) fn new(
        settings: &OutlineSettings,
        low_size: (u32, u32),
        slot_count: usize,
        max_entities: usize,
    ) -> Self {
        Self {
            strength: settings.strength,
            use_add_mode: if settings.use_add_mode { 1.0 } else { 0.0 },
            outline_pixel: settings.outline_pixel,
            fade_outline_pixel: settings.fade_outline_pixel,
            low_width: low_size.0 as f32,
            low_height: low_size.1 as f32,
            slot_count: slot_count as f32,
            max_entities: max_entities as f32,
        }
    }
}

/// Uniform buffer that skips the upload when the value did not change.
pub(super) struct UniformSlot {
    buffer: wgpu::Buffer,
    last: Option<OutlineUniform>,
}

impl UniformSlot {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen outline settings ubo"),
            size: std::mem::size_of::<OutlineUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, last: None }
    }

    #[inline]
    pub(super) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub(super) fn write(&mut self, queue: &wgpu::Queue, value: OutlineUniform) {
        if self.last == Some(value) {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&value));
        self.last = Some(value);
    }
}
