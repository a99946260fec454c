//! Lumen engine crate.
//!
//! Owns the GPU post-processing stack (most notably the multi-pass outline
//! effect) and the interaction contract implemented by pickable screen
//! elements. Scene graph, camera and asset loading live in higher layers.

pub mod device;
pub mod logging;
pub mod render;
pub mod settings;
pub mod ui;
