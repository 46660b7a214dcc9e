use crate::device::Owned;
use crate::geometry::VertexLayout;
use crate::shader::ShaderProgram;

/// The program bound to a vertex layout for one color target format.
///
/// wgpu bakes vertex attribute bindings into the render pipeline, so this is
/// where the layout, the program and the target format meet.
#[derive(Debug)]
pub struct VertexArray {
    pipeline: Owned<wgpu::RenderPipeline>,
    format: wgpu::TextureFormat,
}

impl VertexArray {
    pub fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        layout: &VertexLayout,
        format: wgpu::TextureFormat,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let buffers = [layout.buffer_layout()];
        let targets = [Some(wgpu::ColorTargetState {
            format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera pipeline"),
            layout: Some(&pipeline_layout),
            vertex: program.vertex_state(&buffers),
            fragment: Some(program.fragment_state(&targets)),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "vertex array: {} attributes, stride {} bytes, target {format:?}",
            layout.attributes().len(),
            layout.stride()
        );

        Self {
            pipeline: Owned::new("vertex array", pipeline),
            format,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Binds the pipeline. Returns `false` once released.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        match self.pipeline.get() {
            Some(pipeline) => {
                rpass.set_pipeline(pipeline);
                true
            }
            None => false,
        }
    }

    pub(crate) fn release(&mut self) -> bool {
        self.pipeline.release()
    }
}
