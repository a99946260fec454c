//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - handing out renderer contexts and command encoders
//! - submitting recorded frames
//!
//! Presentation (surfaces, swapchains) belongs to the host application; post
//! effects only ever render into offscreen targets.

mod gpu;
mod init;

pub use gpu::Gpu;
pub use init::GpuInit;
