//! Pointer interaction for scene and screen-space elements.
//!
//! Elements implement [`Interactive`]; a [`Picker`] tests them against the
//! cursor each frame and keeps their [`InteractiveStyle`] in sync with hover
//! and press state.

mod interactive;
mod picker;
mod ray;
mod rect;

pub use interactive::{Interactive, InteractiveStyle, NodeId, PickHit};
pub use picker::Picker;
pub use ray::Ray;
pub use rect::{InteractiveRect, ScreenRect};
