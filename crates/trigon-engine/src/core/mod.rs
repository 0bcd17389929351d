//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the application: one init callback, window events, and one callback
//! per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InitCtx};
