use thiserror::Error;

/// Rejected vertex layout or geometry data.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum GeometryError {
    #[error("vertex layout declares no attributes")]
    EmptyLayout,

    #[error("vertex stride {stride} is not a positive multiple of 4 bytes")]
    BadStride { stride: u64 },

    #[error("attribute at location {location} has {components} components (expected 1..=4)")]
    BadComponentCount { location: u32, components: u32 },

    #[error("attribute at location {location} (offset {offset}) does not fit in a {stride}-byte vertex")]
    AttributeOutOfBounds { location: u32, offset: u64, stride: u64 },

    #[error("location {location} is declared more than once")]
    DuplicateLocation { location: u32 },

    #[error("geometry has no vertices")]
    NoVertices,

    #[error("{floats} vertex floats is not a multiple of the {stride}-float stride")]
    RaggedVertices { floats: usize, stride: usize },

    #[error("{count} indices do not form whole triangles")]
    RaggedIndices { count: usize },

    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u8, position: usize, vertex_count: usize },
}
