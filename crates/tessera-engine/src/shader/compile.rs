use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, BuiltIn, Handle, Module, Type, TypeInner};

use super::{ShaderError, StageKind};

/// A user-defined input or output at `@location(n)`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Varying {
    pub location: u32,
    pub ty: TypeInner,
}

/// Inputs and outputs of a stage's entry point, flattened out of any structs.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StageInterface {
    pub inputs: Vec<Varying>,
    pub outputs: Vec<Varying>,
    pub writes_position: bool,
}

impl StageInterface {
    pub fn output(&self, location: u32) -> Option<&Varying> {
        self.outputs.iter().find(|v| v.location == location)
    }
}

/// One shader stage that parsed and validated, with a single entry point of
/// its stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    stage: StageKind,
    source: String,
    entry_point: String,
    interface: StageInterface,
}

impl CompiledStage {
    /// Parses and validates WGSL `source` as a `stage` shader.
    ///
    /// Errors carry naga's rendered diagnostic for the offending span.
    pub fn compile(stage: StageKind, source: &str) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
            stage,
            log: e.emit_to_string(source),
        })?;

        Validator::new(ValidationFlags::all(), Capabilities::default())
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                stage,
                log: e.emit_to_string(source),
            })?;

        let candidates: Vec<_> = module
            .entry_points
            .iter()
            .filter(|ep| ep.stage == stage.naga())
            .collect();

        let entry = match candidates.as_slice() {
            [entry] => *entry,
            [] => return Err(ShaderError::MissingEntryPoint { stage }),
            many => {
                return Err(ShaderError::AmbiguousEntryPoint {
                    stage,
                    count: many.len(),
                });
            }
        };

        let mut interface = StageInterface::default();
        for arg in &entry.function.arguments {
            collect(&module, arg.ty, arg.binding.as_ref(), &mut interface.inputs, &mut false);
        }
        if let Some(result) = &entry.function.result {
            collect(
                &module,
                result.ty,
                result.binding.as_ref(),
                &mut interface.outputs,
                &mut interface.writes_position,
            );
        }

        log::debug!(
            "compiled {stage} shader `{}`: {} inputs, {} outputs",
            entry.name,
            interface.inputs.len(),
            interface.outputs.len()
        );

        Ok(Self {
            stage,
            source: source.to_owned(),
            entry_point: entry.name.clone(),
            interface,
        })
    }

    pub fn stage(&self) -> StageKind {
        self.stage
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn interface(&self) -> &StageInterface {
        &self.interface
    }
}

fn collect(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
    position: &mut bool,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Varying {
            location: *location,
            ty: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(BuiltIn::Position { .. })) => *position = true,
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect(module, member.ty, member.binding.as_ref(), out, position);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::sources;

    #[test]
    fn embedded_vertex_stage_reports_interface() {
        let vs = CompiledStage::compile(StageKind::Vertex, sources::VERTEX_COLOR.vertex).unwrap();
        assert_eq!(vs.entry_point(), "vs_main");

        let iface = vs.interface();
        assert!(iface.writes_position);
        let inputs: Vec<u32> = iface.inputs.iter().map(|v| v.location).collect();
        assert_eq!(inputs, vec![0, 1]);
        assert!(iface.output(0).is_some());
    }

    #[test]
    fn syntax_error_is_reported_with_diagnostic() {
        let err = CompiledStage::compile(StageKind::Fragment, "@fragment fn fs_main( {").unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, StageKind::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_error_fails_validation_or_compile() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1u; }";
        let err = CompiledStage::compile(StageKind::Fragment, src).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile { .. } | ShaderError::Validation { .. }
        ));
    }

    #[test]
    fn missing_entry_point_for_stage() {
        let err = CompiledStage::compile(StageKind::Vertex, sources::SOLID_RED.fragment).unwrap_err();
        assert_eq!(err, ShaderError::MissingEntryPoint { stage: StageKind::Vertex });
    }

    #[test]
    fn two_entry_points_are_ambiguous() {
        let src = "
            @fragment fn a() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
            @fragment fn b() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }
        ";
        let err = CompiledStage::compile(StageKind::Fragment, src).unwrap_err();
        assert_eq!(
            err,
            ShaderError::AmbiguousEntryPoint { stage: StageKind::Fragment, count: 2 }
        );
    }
}
