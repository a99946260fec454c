use std::sync::Arc;

use anyhow::{Context, Result};

use crate::render::post::{PostEffect, PostFrame};
use crate::render::{names, RenderCtx, RenderTexture};
use crate::settings::{OutlineChange, OutlineSettings, SettingsStore};

use super::passes::{OutlinePipelines, OutlineTargets};
use super::sync::SlotBuffers;
use super::uniform::{OutlineUniform, UniformSlot};
use super::{EntityIndex, OutlineColor, OutlineError, SlotStore, MAX_ENTITIES};

/// GPU side of the effect, created on the first rendered frame.
struct OutlineResources {
    pipelines: OutlinePipelines,
    buffers: SlotBuffers,
    uniform: UniformSlot,
    targets: OutlineTargets,
}

impl OutlineResources {
    fn new(ctx: &RenderCtx<'_>, slots: &SlotStore, full_size: (u32, u32)) -> Result<Self> {
        let targets = OutlineTargets::new(ctx, full_size).context("failed to create outline targets")?;
        Ok(Self {
            pipelines: OutlinePipelines::new(ctx.device),
            buffers: SlotBuffers::new(ctx.device, slots),
            uniform: UniformSlot::new(ctx.device),
            targets,
        })
    }
}

enum OutlineState {
    Uninitialized,
    Ready(Box<OutlineResources>),
}

/// Outlines selected entities in per-slot colors.
///
/// ```rust,ignore
/// let settings = SharedSettings::default();
/// let mut outline = OutlineEffect::new(Arc::new(settings.clone()));
/// outline.fill_slot(0, &[3, 7, 12], OutlineColor::new(1.0, 0.0, 0.0))?;
/// stack.push(Box::new(outline));
/// ```
///
/// Reads [`names::COLOR_PASS_POSITION`] (entity id in `.w`) and the current
/// scene color, and publishes an `Rgba16Float` texture of the same size as
/// [`names::POST_OUTPUT`].
pub struct OutlineEffect {
    settings: Arc<dyn SettingsStore>,
    slots: SlotStore,
    state: OutlineState,
}

impl OutlineEffect {
    pub const NAME: &'static str = "outline";

    /// Creates the effect. The slot count is taken from the settings' group
    /// count now and never changes afterwards. No GPU work happens here.
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        let slots = SlotStore::from_settings(&settings.outline());
        Self { settings, slots, state: OutlineState::Uninitialized }
    }

    /// Whether GPU resources exist (i.e. a frame has been rendered).
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, OutlineState::Ready(_))
    }

    // ── slots ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    #[inline]
    pub fn slots_mut(&mut self) -> &mut SlotStore {
        &mut self.slots
    }

    /// See [`SlotStore::fill_slot`].
    pub fn fill_slot(
        &mut self,
        slot: usize,
        entities: &[EntityIndex],
        color: OutlineColor,
    ) -> Result<(), OutlineError> {
        self.slots.fill_slot(slot, entities, color)
    }

    /// See [`SlotStore::clear_at`].
    pub fn clear_slot(&mut self, slot: usize) -> Result<(), OutlineError> {
        self.slots.clear_at(slot)
    }

    pub fn clear_slots(&mut self) {
        self.slots.clear();
    }

    // ── settings ──────────────────────────────────────────────────────────

    /// Current settings, as the next frame would see them.
    pub fn settings(&self) -> OutlineSettings {
        self.settings.outline()
    }

    /// Clamps and applies `change` to the shared settings in one atomic
    /// edit of the store.
    ///
    /// Returns whether anything was written; an unchanged value is not.
    pub fn apply_config_change(&self, change: OutlineChange) -> bool {
        self.settings.apply_outline(change)
    }

    pub fn set_outline_pixel(&self, value: f32) -> bool {
        self.apply_config_change(OutlineChange::OutlinePixel(value))
    }

    pub fn outline_pixel(&self) -> f32 {
        self.settings.outline().outline_pixel
    }

    pub fn set_fade_outline_pixel(&self, value: f32) -> bool {
        self.apply_config_change(OutlineChange::FadeOutlinePixel(value))
    }

    pub fn fade_outline_pixel(&self) -> f32 {
        self.settings.outline().fade_outline_pixel
    }

    pub fn set_strength(&self, value: f32) -> bool {
        self.apply_config_change(OutlineChange::Strength(value))
    }

    pub fn strength(&self) -> f32 {
        self.settings.outline().strength
    }

    pub fn set_use_add_mode(&self, value: bool) -> bool {
        self.apply_config_change(OutlineChange::UseAddMode(value))
    }

    pub fn use_add_mode(&self) -> bool {
        self.settings.outline().use_add_mode
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    /// Slot uploads performed so far.
    pub fn uploads(&self) -> u64 {
        match &self.state {
            OutlineState::Ready(res) => res.buffers.uploads(),
            OutlineState::Uninitialized => 0,
        }
    }

    /// Full and low-res sizes the targets are currently built for.
    pub fn target_sizes(&self) -> Option<((u32, u32), (u32, u32))> {
        match &self.state {
            OutlineState::Ready(res) => Some((res.targets.full_size(), res.targets.low_size())),
            OutlineState::Uninitialized => None,
        }
    }

    /// Workgroup counts of the weight, expand and blend dispatches.
    pub fn workgroups(&self) -> Option<[[u32; 3]; 3]> {
        match &self.state {
            OutlineState::Ready(res) => res.targets.workgroups(),
            OutlineState::Uninitialized => None,
        }
    }

    fn output_id(&self) -> Option<u64> {
        match &self.state {
            OutlineState::Ready(res) => Some(res.targets.outline_tex().id()),
            OutlineState::Uninitialized => None,
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Creates GPU resources on first use and rebuilds the size-dependent
    /// ones when the frame size changed.
    fn ensure_initialized<'s>(
        state: &'s mut OutlineState,
        ctx: &RenderCtx<'_>,
        slots: &SlotStore,
        full_size: (u32, u32),
    ) -> Result<&'s mut OutlineResources> {
        if let OutlineState::Uninitialized = state {
            log::debug!("creating outline GPU resources ({} slots)", slots.slot_count());
            *state = OutlineState::Ready(Box::new(OutlineResources::new(ctx, slots, full_size)?));
        }
        let OutlineState::Ready(res) = state else {
            anyhow::bail!("outline resources missing after initialization");
        };

        if res.targets.full_size() != full_size {
            log::debug!("outline frame resized {:?} -> {:?}", res.targets.full_size(), full_size);
            res.targets = OutlineTargets::new(ctx, full_size).context("failed to resize outline targets")?;
        }
        Ok(&mut **res)
    }
}

fn is_float_texture(texture: &RenderTexture) -> bool {
    matches!(
        texture.format().sample_type(None, None),
        Some(wgpu::TextureSampleType::Float { .. })
    )
}

impl PostEffect for OutlineEffect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_attach(&mut self) {
        self.apply_config_change(OutlineChange::Enable(true));
    }

    fn on_detach(&mut self) {
        self.apply_config_change(OutlineChange::Enable(false));
    }

    fn render(&mut self, ctx: &RenderCtx<'_>, frame: &mut PostFrame<'_>) -> Result<()> {
        let settings = self.settings.outline().sanitized();
        if !settings.enable {
            return Ok(());
        }

        let mut scene = frame.targets.scene_color()?.clone();
        if self.output_id() == Some(scene.id()) {
            // Left over from our previous frame; reading it would alias the
            // blend pass output.
            log::trace!("outline: ignoring own stale output, reading the color pass");
            scene = frame.targets.get(names::COLOR_PASS_COLOR)?.clone();
        }
        let index = frame.targets.get(names::COLOR_PASS_POSITION)?.clone();
        anyhow::ensure!(
            is_float_texture(&scene) && is_float_texture(&index),
            "outline inputs must be float textures (scene {:?}, index {:?})",
            scene.format(),
            index.format()
        );

        let res = Self::ensure_initialized(&mut self.state, ctx, &self.slots, scene.size())?;
        let OutlineResources { pipelines, buffers, uniform, targets } = res;

        uniform.write(
            ctx.queue,
            OutlineUniform::new(&settings, targets.low_size(), self.slots.slot_count(), MAX_ENTITIES),
        );
        buffers.flush_if_dirty(ctx.queue, &mut self.slots);
        targets.bind(ctx.device, pipelines, buffers, uniform.buffer(), &index, &scene);
        targets.encode(frame.encoder);

        frame.targets.insert(names::POST_OUTPUT, targets.outline_tex().clone());
        Ok(())
    }
}
