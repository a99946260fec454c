use anyhow::Result;

use crate::render::compute::{
    encode_sequence, filtering_sampler, sampled_texture, storage_buffer, storage_texture,
    uniform_buffer, ComputeDispatch, ComputeProgram,
};
use crate::render::{RenderCtx, RenderTexture};

use super::sync::SlotBuffers;

/// Format of the half-resolution outline and the full-resolution output.
pub(super) const OUTLINE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Bytes of one `vec4<f32>` weight / color entry.
const TEXEL_BYTES: u64 = 16;

pub(super) const WEIGHT_SHADER: &str = concat!(
    include_str!("shaders/outline_common.wgsl"),
    include_str!("shaders/outline_weight.wgsl"),
);
pub(super) const EXPAND_SHADER: &str = concat!(
    include_str!("shaders/outline_common.wgsl"),
    include_str!("shaders/outline_expand.wgsl"),
);
pub(super) const BLEND_SHADER: &str = concat!(
    include_str!("shaders/outline_common.wgsl"),
    include_str!("shaders/outline_blend.wgsl"),
);

/// Size of the low-resolution passes for a `width × height` frame.
///
/// Rounds down. The weight pass widens the last block column and row to
/// three full-res pixels so an odd frame's final column and row still count.
#[inline]
pub fn low_res_size(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// The three outline programs plus the upsampling sampler. Size independent;
/// built once.
pub(super) struct OutlinePipelines {
    weight: ComputeProgram,
    expand: ComputeProgram,
    blend: ComputeProgram,
    sampler: wgpu::Sampler,
}

impl OutlinePipelines {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let weight = ComputeProgram::new(
            device,
            "lumen outline weight",
            WEIGHT_SHADER,
            &[
                uniform_buffer(0),
                storage_buffer(1, true),
                storage_buffer(2, true),
                sampled_texture(3, false),
                storage_buffer(4, false),
            ],
        );

        let expand = ComputeProgram::new(
            device,
            "lumen outline expand",
            EXPAND_SHADER,
            &[
                uniform_buffer(0),
                storage_buffer(1, true),
                storage_buffer(2, true),
                storage_buffer(3, false),
                storage_texture(4, OUTLINE_FORMAT),
            ],
        );

        let blend = ComputeProgram::new(
            device,
            "lumen outline blend",
            BLEND_SHADER,
            &[
                uniform_buffer(0),
                sampled_texture(1, false),
                sampled_texture(2, true),
                filtering_sampler(3),
                storage_texture(4, OUTLINE_FORMAT),
            ],
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen outline upsample sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { weight, expand, blend, sampler }
    }
}

/// Inputs the dispatches were bound against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct BoundInputs {
    index: u64,
    scene: u64,
}

/// Everything sized from the frame: textures, per-pixel buffers and the bound
/// dispatches. Rebuilt when the frame size changes.
pub(super) struct OutlineTargets {
    full_size: (u32, u32),
    low_size: (u32, u32),
    low_tex: RenderTexture,
    outline_tex: RenderTexture,
    weight_buffer: wgpu::Buffer,
    old_outline_color: wgpu::Buffer,
    dispatches: Option<(BoundInputs, [ComputeDispatch; 3])>,
}

impl OutlineTargets {
    pub(super) fn new(ctx: &RenderCtx<'_>, full_size: (u32, u32)) -> Result<Self> {
        let (width, height) = full_size;
        anyhow::ensure!(width > 0 && height > 0, "outline targets need a non-empty frame");
        let max_dim = ctx.device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max_dim && height <= max_dim,
            "frame {width}x{height} exceeds the device texture limit {max_dim}"
        );

        let low_size = low_res_size(width, height);
        let (low_w, low_h) = low_size;

        let low_tex = RenderTexture::new(
            ctx.device,
            "lumen outline low tex",
            low_w,
            low_h,
            OUTLINE_FORMAT,
            wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
        );
        let outline_tex = RenderTexture::new(
            ctx.device,
            "lumen outline tex",
            width,
            height,
            OUTLINE_FORMAT,
            wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
        );

        let per_pixel = u64::from(low_w) * u64::from(low_h) * TEXEL_BYTES;
        let max_binding = u64::from(ctx.device.limits().max_storage_buffer_binding_size);
        anyhow::ensure!(
            per_pixel <= max_binding,
            "outline buffers ({per_pixel} bytes) exceed the storage binding limit {max_binding}"
        );

        let weight_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen outline weights"),
            size: per_pixel,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        // Zero-initialized by wgpu, i.e. no outline history on the first frame.
        let old_outline_color = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen outline old color"),
            size: per_pixel,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        log::debug!("outline targets built: full {width}x{height}, low {low_w}x{low_h}");

        Ok(Self {
            full_size,
            low_size,
            low_tex,
            outline_tex,
            weight_buffer,
            old_outline_color,
            dispatches: None,
        })
    }

    #[inline]
    pub(super) fn full_size(&self) -> (u32, u32) {
        self.full_size
    }

    #[inline]
    pub(super) fn low_size(&self) -> (u32, u32) {
        self.low_size
    }

    #[inline]
    pub(super) fn outline_tex(&self) -> &RenderTexture {
        &self.outline_tex
    }

    /// Workgroup counts of the weight, expand and blend dispatches, if bound.
    pub(super) fn workgroups(&self) -> Option<[[u32; 3]; 3]> {
        self.dispatches
            .as_ref()
            .map(|(_, d)| [d[0].workgroups(), d[1].workgroups(), d[2].workgroups()])
    }

    /// (Re)binds the dispatches if the input textures changed since the last
    /// call.
    pub(super) fn bind(
        &mut self,
        device: &wgpu::Device,
        pipelines: &OutlinePipelines,
        buffers: &SlotBuffers,
        uniform: &wgpu::Buffer,
        index: &RenderTexture,
        scene: &RenderTexture,
    ) {
        let inputs = BoundInputs { index: index.id(), scene: scene.id() };
        if matches!(&self.dispatches, Some((bound, _)) if *bound == inputs) {
            return;
        }

        let (low_w, low_h) = self.low_size;
        let (width, height) = self.full_size;

        let weight = pipelines.weight.dispatch(
            device,
            &[
                entry(0, uniform.as_entire_binding()),
                entry(1, buffers.slots_buffer().as_entire_binding()),
                entry(2, buffers.entities_buffer().as_entire_binding()),
                entry(3, wgpu::BindingResource::TextureView(index.view())),
                entry(4, self.weight_buffer.as_entire_binding()),
            ],
            low_w,
            low_h,
        );

        let expand = pipelines.expand.dispatch(
            device,
            &[
                entry(0, uniform.as_entire_binding()),
                entry(1, buffers.slots_buffer().as_entire_binding()),
                entry(2, self.weight_buffer.as_entire_binding()),
                entry(3, self.old_outline_color.as_entire_binding()),
                entry(4, wgpu::BindingResource::TextureView(self.low_tex.view())),
            ],
            low_w,
            low_h,
        );

        let blend = pipelines.blend.dispatch(
            device,
            &[
                entry(0, uniform.as_entire_binding()),
                entry(1, wgpu::BindingResource::TextureView(scene.view())),
                entry(2, wgpu::BindingResource::TextureView(self.low_tex.view())),
                entry(3, wgpu::BindingResource::Sampler(&pipelines.sampler)),
                entry(4, wgpu::BindingResource::TextureView(self.outline_tex.view())),
            ],
            width,
            height,
        );

        log::debug!("outline dispatches bound (index #{}, scene #{})", inputs.index, inputs.scene);
        self.dispatches = Some((inputs, [weight, expand, blend]));
    }

    /// Encodes weight → expand → blend. No-op until [`bind`](Self::bind) ran.
    pub(super) fn encode(&self, encoder: &mut wgpu::CommandEncoder) {
        let Some((_, [weight, expand, blend])) = &self.dispatches else { return };
        encode_sequence(encoder, "lumen outline", &[weight, expand, blend]);
    }
}

#[inline]
fn entry(binding: u32, resource: wgpu::BindingResource<'_>) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry { binding, resource }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(label: &str, source: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{label} failed to parse:\n{}", e.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{label} failed validation: {e:?}"));
        assert!(
            module.entry_points.iter().any(|ep| ep.name == "main"),
            "{label} has no `main` entry point"
        );
    }

    #[test]
    fn weight_shader_is_valid_wgsl() {
        validate("weight", WEIGHT_SHADER);
    }

    #[test]
    fn expand_shader_is_valid_wgsl() {
        validate("expand", EXPAND_SHADER);
    }

    #[test]
    fn blend_shader_is_valid_wgsl() {
        validate("blend", BLEND_SHADER);
    }

    #[test]
    fn low_res_is_half_rounded_down() {
        assert_eq!(low_res_size(1920, 1080), (960, 540));
        assert_eq!(low_res_size(1919, 1079), (959, 539));
    }

    #[test]
    fn low_res_never_collapses_to_zero() {
        assert_eq!(low_res_size(1, 1), (1, 1));
        assert_eq!(low_res_size(3, 1), (1, 1));
    }
}
