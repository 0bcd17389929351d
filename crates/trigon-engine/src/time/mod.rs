//! Frame timing.
//!
//! The runtime owns one `FrameClock` per window and calls `tick()` once per
//! presented frame; the resulting `FrameTime` is handed to the app.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
