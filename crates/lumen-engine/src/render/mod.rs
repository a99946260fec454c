//! GPU rendering subsystem.
//!
//! Effects own their GPU resources (pipelines, buffers, textures) and issue
//! commands through wgpu. Shared infrastructure lives here:
//! - [`RenderCtx`]: device + queue handed to every renderer
//! - [`FrameTargets`]: named textures produced by earlier passes
//! - [`compute`]: pipeline/bind-group/dispatch helpers for compute effects
//! - [`mirror`]: dirty-tracked CPU arrays mirrored into storage buffers
//!
//! Convention: compute work is tiled in 8×8 workgroups over pixel space.

pub mod compute;
mod ctx;
pub mod mirror;
pub mod post;
mod targets;

pub use ctx::RenderCtx;
pub use targets::{names, FrameTargets, RenderTexture, TargetError};
