//! Per-frame rendering handles.
//!
//! Draw code receives a `RenderCtx` for device access and a `RenderTarget`
//! for recording into the current frame's encoder.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
