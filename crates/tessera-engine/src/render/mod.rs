//! GPU rendering subsystem.
//!
//! [`FrameRenderer`] owns the geometry buffer, shader program and vertex array
//! and records one draw per frame. It only needs a [`RenderCtx`] and a
//! [`RenderTarget`], so the same code drives a window surface or an offscreen
//! texture.

mod ctx;
mod frame_renderer;
mod vertex_array;

pub use ctx::{RenderCtx, RenderTarget};
pub use frame_renderer::{FrameOutcome, FrameRenderer, RendererError, RendererState, TeardownReport};
pub use vertex_array::VertexArray;
