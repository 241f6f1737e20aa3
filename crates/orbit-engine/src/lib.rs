//! Orbit engine crate.
//!
//! Owns the platform + GPU runtime pieces: window loop, device/surface,
//! frame timing, logging setup and the sprite renderer.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
