use thiserror::Error;

use crate::coords::Viewport;
use crate::geometry::{DrawCall, GeometryBuffer, GeometryData, GeometryError, Variant};
use crate::shader::{ShaderError, ShaderProgram, ShaderSources};

use super::{RenderCtx, RenderTarget, VertexArray};

/// Lifecycle of a [`FrameRenderer`].
///
/// `Uninitialized -> Ready -> Rendering (per frame) -> ShuttingDown -> Terminated`.
/// There is no way back from `ShuttingDown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    Uninitialized,
    Ready,
    Rendering,
    ShuttingDown,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RendererError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("cannot {operation} a renderer in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: RendererState,
    },
}

/// Result of one [`FrameRenderer::render_frame`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Cleared and issued `draw` over the full viewport.
    Drawn { draw: DrawCall, viewport: Viewport },
    /// Zero-area viewport; nothing recorded.
    Skipped,
}

/// Which handles a [`FrameRenderer::shutdown`] call released.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct TeardownReport {
    pub vertex_array: bool,
    pub vertex_buffer: bool,
    pub index_buffer: bool,
}

impl TeardownReport {
    pub fn released_any(&self) -> bool {
        self.vertex_array || self.vertex_buffer || self.index_buffer
    }
}

struct Resources {
    vertex_array: VertexArray,
    geometry: GeometryBuffer,
    // Held for the lifetime of the pipeline built from it.
    _program: ShaderProgram,
}

/// Owns one geometry buffer, one shader program and the vertex array joining
/// them, and draws them once per frame.
pub struct FrameRenderer {
    state: RendererState,
    clear_color: wgpu::Color,
    resources: Option<Resources>,
    frames: u64,
}

impl FrameRenderer {
    pub fn new(clear_color: wgpu::Color) -> Self {
        Self {
            state: RendererState::Uninitialized,
            clear_color,
            resources: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Frames drawn so far (skipped frames excluded).
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Compiles and links the program, uploads the geometry and builds the
    /// vertex array for `ctx.target_format`.
    ///
    /// The program is built first, so a shader failure allocates no buffers.
    pub fn initialize(
        &mut self,
        ctx: &RenderCtx<'_>,
        geometry: &GeometryData,
        sources: &ShaderSources<'_>,
    ) -> Result<(), RendererError> {
        self.expect_state("initialize", &[RendererState::Uninitialized])?;

        let program = ShaderProgram::create(ctx.device, sources, geometry.layout())?;
        let buffer = GeometryBuffer::upload(ctx.device, geometry);
        let vertex_array =
            VertexArray::new(ctx.device, &program, geometry.layout(), ctx.target_format);

        self.resources = Some(Resources {
            vertex_array,
            geometry: buffer,
            _program: program,
        });
        self.state = RendererState::Ready;

        log::info!(
            "renderer ready: {} ({} vertices, {:?})",
            sources.label,
            geometry.vertex_count(),
            geometry.draw_call()
        );
        Ok(())
    }

    /// [`initialize`](Self::initialize) with a built-in variant.
    pub fn initialize_variant(
        &mut self,
        ctx: &RenderCtx<'_>,
        variant: Variant,
    ) -> Result<(), RendererError> {
        let geometry = variant.geometry()?;
        self.initialize(ctx, &geometry, &variant.shader_sources())
    }

    /// Records one frame into `target`: clear, bind, set `viewport`, draw.
    ///
    /// The render pass ends before returning, which unbinds the program and
    /// buffers. Submission and presentation are the caller's job.
    pub fn render_frame(
        &mut self,
        target: &mut RenderTarget<'_>,
        viewport: Viewport,
    ) -> Result<FrameOutcome, RendererError> {
        self.expect_state(
            "render",
            &[RendererState::Ready, RendererState::Rendering],
        )?;

        let Some(res) = self.resources.as_ref() else {
            return Err(RendererError::InvalidState {
                operation: "render",
                state: self.state,
            });
        };

        if viewport.is_empty() {
            log::trace!("skipping frame: zero-area viewport");
            return Ok(FrameOutcome::Skipped);
        }

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessera frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_viewport(
                0.0,
                0.0,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );

            if !(res.vertex_array.bind(&mut rpass) && res.geometry.record(&mut rpass)) {
                return Err(RendererError::InvalidState {
                    operation: "render",
                    state: self.state,
                });
            }
        }

        self.state = RendererState::Rendering;
        self.frames += 1;
        log::trace!(
            "frame {} at {}x{}",
            self.frames,
            viewport.width,
            viewport.height
        );

        Ok(FrameOutcome::Drawn {
            draw: res.geometry.draw_call(),
            viewport,
        })
    }

    /// Releases the vertex array, vertex buffer and index buffer, in that order.
    ///
    /// Each handle is released at most once; calling this again releases nothing.
    pub fn shutdown(&mut self) -> TeardownReport {
        if self.state == RendererState::Terminated {
            return TeardownReport::default();
        }

        self.state = RendererState::ShuttingDown;

        let report = match self.resources.as_mut() {
            Some(res) => TeardownReport {
                vertex_array: res.vertex_array.release(),
                vertex_buffer: res.geometry.release_vertex_buffer(),
                index_buffer: res.geometry.release_index_buffer(),
            },
            None => TeardownReport::default(),
        };
        self.resources = None;
        self.state = RendererState::Terminated;

        log::debug!("renderer shut down after {} frames: {report:?}", self.frames);
        report
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[RendererState],
    ) -> Result<(), RendererError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(RendererError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(wgpu::Color::BLACK)
    }
}

impl Drop for FrameRenderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, HeadlessGpu, OffscreenTarget, Pixels};

    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;

    fn headless() -> Option<HeadlessGpu> {
        let init = GpuInit {
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..Default::default()
        };
        match pollster::block_on(HeadlessGpu::new(&init)) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                eprintln!("no GPU adapter, skipping: {e:#}");
                None
            }
        }
    }

    fn render_once(gpu: &HeadlessGpu, variant: Variant) -> Pixels {
        let target = OffscreenTarget::new(gpu.device(), WIDTH, HEIGHT);
        let mut renderer = FrameRenderer::default();
        renderer
            .initialize_variant(&gpu.render_ctx(target.format()), variant)
            .unwrap();

        let outcome = gpu.render(&target, |_, rt| {
            renderer.render_frame(rt, Viewport::new(WIDTH, HEIGHT))
        });
        assert!(matches!(outcome, Ok(FrameOutcome::Drawn { .. })));

        target.read_pixels(gpu.device(), gpu.queue()).unwrap()
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        let close = actual
            .iter()
            .zip(expected)
            .all(|(a, e)| a.abs_diff(e) <= 4);
        assert!(close, "pixel {actual:?} is not close to {expected:?}");
    }

    #[test]
    fn state_checks_without_gpu() {
        let mut r = FrameRenderer::default();
        assert_eq!(r.state(), RendererState::Uninitialized);

        assert_eq!(r.shutdown(), TeardownReport::default());
        assert_eq!(r.state(), RendererState::Terminated);
        assert_eq!(r.shutdown(), TeardownReport::default());
    }

    #[test]
    fn shared_vertex_frame_has_interpolated_colors() {
        let Some(gpu) = headless() else { return };
        let px = render_once(&gpu, Variant::SharedVertex);

        // Near the centroid of triangle (0, 1, 2): even mix of red/green/blue.
        assert_close(px.get(266, 280).unwrap(), [85, 85, 85, 255]);
        // Near the centroid of triangle (0, 3, 4): red + cyan + purple.
        assert_close(px.get(373, 199).unwrap(), [170, 85, 170, 255]);
        // Outside both triangles: clear color.
        assert_eq!(px.get(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(px.get(373, 280), Some([0, 0, 0, 255]));
    }

    #[test]
    fn triangle_variant_fills_one_red_triangle() {
        let Some(gpu) = headless() else { return };
        let px = render_once(&gpu, Variant::Triangle);

        assert_eq!(px.get(266, 280), Some([255, 0, 0, 255]));
        assert_eq!(px.get(480, 120), Some([0, 0, 0, 255]));
    }

    #[test]
    fn identical_uploads_render_identically() {
        let Some(gpu) = headless() else { return };
        let a = render_once(&gpu, Variant::SharedVertex);
        let b = render_once(&gpu, Variant::SharedVertex);
        assert_eq!(a, b);
    }

    #[test]
    fn viewport_limits_drawing_to_its_rect() {
        let Some(gpu) = headless() else { return };
        let target = OffscreenTarget::new(gpu.device(), WIDTH, HEIGHT);
        let mut renderer = FrameRenderer::default();
        renderer
            .initialize_variant(&gpu.render_ctx(target.format()), Variant::Triangle)
            .unwrap();

        // Half-size viewport: the triangle lands in the top-left quadrant.
        gpu.render(&target, |_, rt| {
            renderer.render_frame(rt, Viewport::new(WIDTH / 2, HEIGHT / 2))
        })
        .unwrap();
        let px = target.read_pixels(gpu.device(), gpu.queue()).unwrap();

        assert_eq!(px.get(133, 140), Some([255, 0, 0, 255]));
        assert_eq!(px.get(266, 280), Some([0, 0, 0, 255]));
    }

    #[test]
    fn teardown_releases_each_handle_once() {
        let Some(gpu) = headless() else { return };
        let mut renderer = FrameRenderer::default();
        renderer
            .initialize_variant(&gpu.render_ctx(OffscreenTarget::FORMAT), Variant::SharedVertex)
            .unwrap();
        assert_eq!(renderer.state(), RendererState::Ready);

        let first = renderer.shutdown();
        assert_eq!(
            first,
            TeardownReport { vertex_array: true, vertex_buffer: true, index_buffer: true }
        );
        assert!(!renderer.shutdown().released_any());
        assert_eq!(renderer.state(), RendererState::Terminated);
    }

    #[test]
    fn non_indexed_teardown_has_no_index_buffer() {
        let Some(gpu) = headless() else { return };
        let mut renderer = FrameRenderer::default();
        renderer
            .initialize_variant(&gpu.render_ctx(OffscreenTarget::FORMAT), Variant::Triangle)
            .unwrap();

        let report = renderer.shutdown();
        assert!(report.vertex_array && report.vertex_buffer);
        assert!(!report.index_buffer);
    }

    #[test]
    fn lifecycle_rejects_out_of_order_calls() {
        let Some(gpu) = headless() else { return };
        let target = OffscreenTarget::new(gpu.device(), WIDTH, HEIGHT);
        let ctx = gpu.render_ctx(target.format());
        let mut renderer = FrameRenderer::default();

        let early = gpu.render(&target, |_, rt| renderer.render_frame(rt, Viewport::new(WIDTH, HEIGHT)));
        assert!(matches!(early, Err(RendererError::InvalidState { .. })));

        renderer.initialize_variant(&ctx, Variant::Quad).unwrap();
        assert!(matches!(
            renderer.initialize_variant(&ctx, Variant::Quad),
            Err(RendererError::InvalidState { state: RendererState::Ready, .. })
        ));

        let skipped = gpu.render(&target, |_, rt| renderer.render_frame(rt, Viewport::new(0, 0)));
        assert_eq!(skipped, Ok(FrameOutcome::Skipped));
        assert_eq!(renderer.state(), RendererState::Ready);

        gpu.render(&target, |_, rt| renderer.render_frame(rt, Viewport::new(WIDTH, HEIGHT)))
            .unwrap();
        assert_eq!(renderer.state(), RendererState::Rendering);
        assert_eq!(renderer.frames_rendered(), 1);

        renderer.shutdown();
        let late = gpu.render(&target, |_, rt| renderer.render_frame(rt, Viewport::new(WIDTH, HEIGHT)));
        assert!(matches!(
            late,
            Err(RendererError::InvalidState { state: RendererState::Terminated, .. })
        ));
    }

    #[test]
    fn shader_failure_leaves_renderer_uninitialized() {
        let Some(gpu) = headless() else { return };
        let mut renderer = FrameRenderer::default();
        let geometry = Variant::Triangle.geometry().unwrap();
        let broken = ShaderSources {
            label: "broken",
            vertex: "@vertex fn vs_main( -> {",
            fragment: crate::shader::sources::SOLID_RED.fragment,
        };

        let err = renderer
            .initialize(&gpu.render_ctx(OffscreenTarget::FORMAT), &geometry, &broken)
            .unwrap_err();
        assert!(matches!(err, RendererError::Shader(ShaderError::Compile { .. })));
        assert_eq!(renderer.state(), RendererState::Uninitialized);
    }
}
