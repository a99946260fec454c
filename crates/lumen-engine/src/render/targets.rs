use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Well-known target names.
pub mod names {
    /// Lit scene color written by the color pass.
    pub const COLOR_PASS_COLOR: &str = "color_pass.color";
    /// Position/visibility buffer of the color pass; `.w` holds the entity
    /// index of the visible surface, negative where nothing was drawn.
    pub const COLOR_PASS_POSITION: &str = "color_pass.position";
    /// Output of the most recent post effect in the current frame.
    pub const POST_OUTPUT: &str = "post.output";
}

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("render target `{0}` is not registered")]
    Missing(String),
}

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// A 2D texture with its default view.
///
/// Each allocation gets a process-unique `id`, which lets consumers detect a
/// swapped input without comparing wgpu handles.
#[derive(Debug, Clone)]
pub struct RenderTexture {
    id: u64,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl RenderTexture {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        Self::from_texture(texture)
    }

    /// Wraps a texture created elsewhere (e.g. by the color pass).
    pub fn from_texture(texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            texture,
            view,
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Textures of the current frame, looked up by semantic name.
#[derive(Debug, Default)]
pub struct FrameTargets {
    textures: HashMap<String, RenderTexture>,
}

impl FrameTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `texture` under `name`, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, texture: RenderTexture) -> Option<RenderTexture> {
        self.textures.insert(name.into(), texture)
    }

    pub fn remove(&mut self, name: &str) -> Option<RenderTexture> {
        self.textures.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&RenderTexture, TargetError> {
        self.textures
            .get(name)
            .ok_or_else(|| TargetError::Missing(name.to_owned()))
    }

    /// Color the next post effect should read: the previous effect's output
    /// if any, otherwise the color pass result.
    pub fn scene_color(&self) -> Result<&RenderTexture, TargetError> {
        self.textures
            .get(names::POST_OUTPUT)
            .map_or_else(|| self.get(names::COLOR_PASS_COLOR), Ok)
    }
}
