//! Vertex layouts, geometry data and their GPU buffers.

mod buffer;
mod data;
mod error;
mod layout;
mod variant;

pub use buffer::GeometryBuffer;
pub use data::{DrawCall, GeometryData};
pub use error::GeometryError;
pub use layout::{VertexAttribute, VertexLayout};
pub use variant::Variant;
