use crate::geometry::VertexLayout;

use super::{CompiledStage, LinkedProgram, ShaderError, ShaderSources, StageKind};

/// Linked vertex + fragment program with its wgpu shader modules.
///
/// Only obtainable from sources that compiled and linked; there is no
/// "invalid program" value.
#[derive(Debug)]
pub struct ShaderProgram {
    linked: LinkedProgram,
    vertex_module: wgpu::ShaderModule,
    fragment_module: wgpu::ShaderModule,
}

impl ShaderProgram {
    /// Compiles both stages and links them against `layout` without touching the GPU.
    pub fn link(sources: &ShaderSources<'_>, layout: &VertexLayout) -> Result<LinkedProgram, ShaderError> {
        let vertex = CompiledStage::compile(StageKind::Vertex, sources.vertex)?;
        let fragment = CompiledStage::compile(StageKind::Fragment, sources.fragment)?;
        Ok(LinkedProgram::link(vertex, fragment, layout)?)
    }

    /// Compiles, links and creates the shader modules.
    ///
    /// Failures are logged with their diagnostic before being returned.
    pub fn create(
        device: &wgpu::Device,
        sources: &ShaderSources<'_>,
        layout: &VertexLayout,
    ) -> Result<Self, ShaderError> {
        let linked = Self::link(sources, layout)
            .inspect_err(|e| log::error!("{} program: {e}", sources.label))?;

        let vertex_module = create_module(device, sources.label, linked.vertex());
        let fragment_module = create_module(device, sources.label, linked.fragment());

        log::debug!(
            "{} program linked ({} -> {})",
            sources.label,
            linked.vertex().entry_point(),
            linked.fragment().entry_point()
        );

        Ok(Self {
            linked,
            vertex_module,
            fragment_module,
        })
    }

    pub fn linked(&self) -> &LinkedProgram {
        &self.linked
    }

    pub fn vertex_state<'a>(
        &'a self,
        buffers: &'a [wgpu::VertexBufferLayout<'a>],
    ) -> wgpu::VertexState<'a> {
        wgpu::VertexState {
            module: &self.vertex_module,
            entry_point: Some(self.linked.vertex().entry_point()),
            compilation_options: Default::default(),
            buffers,
        }
    }

    pub fn fragment_state<'a>(
        &'a self,
        targets: &'a [Option<wgpu::ColorTargetState>],
    ) -> wgpu::FragmentState<'a> {
        wgpu::FragmentState {
            module: &self.fragment_module,
            entry_point: Some(self.linked.fragment().entry_point()),
            compilation_options: Default::default(),
            targets,
        }
    }
}

fn create_module(device: &wgpu::Device, label: &str, stage: &CompiledStage) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("tessera {label} {} shader", stage.stage())),
        source: wgpu::ShaderSource::Wgsl(stage.source().into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{sources, LinkError};

    #[test]
    fn invalid_source_never_yields_a_program() {
        let bad = ShaderSources {
            label: "broken",
            vertex: "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return nope; }",
            fragment: sources::VERTEX_COLOR.fragment,
        };
        let layout = VertexLayout::interleaved(&[(0, 3)]).unwrap();
        let err = ShaderProgram::link(&bad, &layout).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile { stage: StageKind::Vertex, .. }
                | ShaderError::Validation { stage: StageKind::Vertex, .. }
        ));
    }

    #[test]
    fn link_errors_surface_as_shader_errors() {
        let layout = VertexLayout::interleaved(&[(0, 3)]).unwrap();
        let err = ShaderProgram::link(&sources::VERTEX_COLOR, &layout).unwrap_err();
        assert_eq!(err, ShaderError::Link(LinkError::MissingAttribute { location: 1 }));
        assert!(err.to_string().contains("@location(1)"));
    }
}
