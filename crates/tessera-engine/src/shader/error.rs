use std::fmt;

use thiserror::Error;

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader compile or link failure.
///
/// `log` fields hold the rendered compiler diagnostic, source excerpt included.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: StageKind, log: String },

    #[error("{stage} shader failed validation:\n{log}")]
    Validation { stage: StageKind, log: String },

    #[error("{stage} shader declares no {stage} entry point")]
    MissingEntryPoint { stage: StageKind },

    #[error("{stage} shader declares {count} {stage} entry points, expected one")]
    AmbiguousEntryPoint { stage: StageKind, count: usize },

    #[error("shader program failed to link: {0}")]
    Link(#[from] LinkError),
}

/// Interface mismatch found while linking two stages against a vertex layout.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LinkError {
    #[error("expected a {expected} stage, got a {found} stage")]
    WrongStage { expected: StageKind, found: StageKind },

    #[error("vertex stage does not write @builtin(position)")]
    MissingPosition,

    #[error("fragment stage does not write a color to @location(0)")]
    MissingColorOutput,

    #[error("fragment input @location({location}) is not written by the vertex stage")]
    UnmatchedVarying { location: u32 },

    #[error("fragment input @location({location}) does not match the vertex output type")]
    VaryingTypeMismatch { location: u32 },

    #[error("vertex input @location({location}) has no attribute in the vertex layout")]
    MissingAttribute { location: u32 },

    #[error(
        "vertex input @location({location}) takes {expected} components, the layout provides {provided}"
    )]
    AttributeComponentMismatch {
        location: u32,
        expected: u32,
        provided: u32,
    },

    #[error("vertex input @location({location}) is not a float scalar or vector")]
    UnsupportedAttributeType { location: u32 },
}
