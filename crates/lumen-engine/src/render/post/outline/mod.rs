//! Outline post effect.
//!
//! Selected entities are grouped into colored slots. Each frame three compute
//! passes run in one compute pass on the frame encoder:
//!
//! 1. weight: half-resolution map of which slot (if any) covers each pixel,
//!    read from the entity ids in the color pass position buffer
//! 2. expand: dilates the selection by `outline_pixel`, fades it over
//!    `fade_outline_pixel`, smooths against the previous frame and writes a
//!    half-resolution color texture
//! 3. blend: upsamples that texture onto the full-resolution scene color
//!
//! Slot data lives on the CPU in [`SlotStore`] and reaches the GPU only on
//! frames where it changed.

mod effect;
mod error;
mod passes;
mod slots;
mod sync;
mod uniform;

pub use effect::OutlineEffect;
pub use error::OutlineError;
pub use passes::low_res_size;
pub use slots::{
    EntityIndex, OutlineColor, OutlineSlot, SlotFetch, SlotStore, EMPTY_ENTITY, MAX_ENTITIES,
};
pub use sync::{project_slots, SlotBuffers, SLOT_STRIDE};
