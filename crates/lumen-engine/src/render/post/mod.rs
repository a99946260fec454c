//! Post-processing effects.
//!
//! A [`PostEffect`] reads the frame's named targets, encodes its GPU work into
//! the frame encoder and publishes its result as
//! [`POST_OUTPUT`](crate::render::names::POST_OUTPUT), which
//! the next effect in the [`PostStack`] picks up as scene color.

pub mod outline;
mod stack;

use anyhow::Result;

use super::{FrameTargets, RenderCtx};

pub use stack::PostStack;

/// Per-frame inputs handed to post effects.
pub struct PostFrame<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub targets: &'a mut FrameTargets,
}

impl<'a> PostFrame<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, targets: &'a mut FrameTargets) -> Self {
        Self { encoder, targets }
    }
}

/// Contract between the frame orchestrator and a post effect.
pub trait PostEffect {
    /// Stable name, used for lookups and log lines.
    fn name(&self) -> &'static str;

    /// Called when the effect is added to an active stack.
    fn on_attach(&mut self) {}

    /// Called when the effect is removed from the stack.
    fn on_detach(&mut self) {}

    /// Encodes this frame's work. Effects that are disabled or lack inputs
    /// return `Ok(())` without encoding anything.
    fn render(&mut self, ctx: &RenderCtx<'_>, frame: &mut PostFrame<'_>) -> Result<()>;
}
