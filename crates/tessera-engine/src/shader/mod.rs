//! Shader compilation and linking.
//!
//! WGSL stages are parsed and validated with naga before wgpu ever sees them, so
//! a bad shader surfaces as a [`ShaderError`] with the compiler diagnostic
//! instead of a device error at pipeline creation. Linking checks the vertex
//! outputs against the fragment inputs and the vertex inputs against the
//! [`VertexLayout`](crate::geometry::VertexLayout).

mod compile;
mod error;
mod link;
mod program;
pub mod sources;

pub use compile::CompiledStage;
pub use error::{LinkError, ShaderError, StageKind};
pub use link::LinkedProgram;
pub use program::ShaderProgram;
pub use sources::ShaderSources;
