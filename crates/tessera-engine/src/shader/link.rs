use naga::{ScalarKind, TypeInner};

use crate::geometry::VertexLayout;

use super::compile::CompiledStage;
use super::{LinkError, StageKind};

/// A vertex and fragment stage whose interfaces agree with each other and
/// with the vertex layout feeding them.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
}

impl LinkedProgram {
    /// Checks the stage interfaces and the vertex layout against each other.
    pub fn link(
        vertex: CompiledStage,
        fragment: CompiledStage,
        layout: &VertexLayout,
    ) -> Result<Self, LinkError> {
        expect_stage(&vertex, StageKind::Vertex)?;
        expect_stage(&fragment, StageKind::Fragment)?;

        let vs = vertex.interface();
        let fs = fragment.interface();

        if !vs.writes_position {
            return Err(LinkError::MissingPosition);
        }

        for input in &vs.inputs {
            let attr = layout
                .attribute(input.location)
                .ok_or(LinkError::MissingAttribute { location: input.location })?;

            let expected = float_components(&input.ty)
                .ok_or(LinkError::UnsupportedAttributeType { location: input.location })?;

            if expected != attr.components {
                return Err(LinkError::AttributeComponentMismatch {
                    location: input.location,
                    expected,
                    provided: attr.components,
                });
            }
        }

        for input in &fs.inputs {
            let output = vs
                .output(input.location)
                .ok_or(LinkError::UnmatchedVarying { location: input.location })?;
            if output.ty != input.ty {
                return Err(LinkError::VaryingTypeMismatch { location: input.location });
            }
        }

        if fs.output(0).is_none() {
            return Err(LinkError::MissingColorOutput);
        }

        Ok(Self { vertex, fragment })
    }

    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }
}

fn expect_stage(stage: &CompiledStage, expected: StageKind) -> Result<(), LinkError> {
    if stage.stage() == expected {
        Ok(())
    } else {
        Err(LinkError::WrongStage {
            expected,
            found: stage.stage(),
        })
    }
}

/// Component count of an `f32` scalar or vector type.
fn float_components(ty: &TypeInner) -> Option<u32> {
    match ty {
        TypeInner::Scalar(s) if s.kind == ScalarKind::Float => Some(1),
        TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float => {
            Some(*size as u32)
        }
        _ => None,
    }
}
