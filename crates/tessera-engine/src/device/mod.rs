//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Adapter/Device/Queue, windowed or headless
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - scoped ownership of GPU objects ([`Owned`])

mod gpu;
mod headless;
mod init;
mod resource;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use headless::{HeadlessGpu, OffscreenTarget, Pixels};
pub use init::GpuInit;
pub use resource::{Owned, Release};
pub use surface::SurfaceErrorAction;
