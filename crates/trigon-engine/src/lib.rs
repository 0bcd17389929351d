//! Trigon engine crate.
//!
//! Owns the window runtime and GPU device, plus thin wrappers for shaders,
//! pipeline state and vertex/index buffers used by samples.

pub mod core;
pub mod device;
pub mod gfx;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
