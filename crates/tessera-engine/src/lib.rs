//! Tessera engine crate.
//!
//! Draws a fixed piece of geometry with a fixed shader program, once per frame,
//! into a window or an offscreen texture.

pub mod coords;
pub mod core;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod shader;
pub mod window;
