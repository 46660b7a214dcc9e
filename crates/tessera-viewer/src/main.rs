use anyhow::{Context, Result};
use clap::Parser;

use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::{Gpu, GpuInit};
use tessera_engine::geometry::Variant;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::render::FrameRenderer;
use tessera_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

/// Opens a window and draws one of the built-in primitives every frame.
#[derive(Parser, Debug)]
#[command(name = "tessera-viewer", version)]
struct Cli {
    /// Geometry to draw: triangle, quad or shared-vertex.
    #[arg(long, default_value_t = Variant::default())]
    variant: Variant,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long, default_value = "tessera")]
    title: String,

    /// Exit after this many frames instead of waiting for the window to close.
    #[arg(long)]
    frames: Option<u64>,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

struct Viewer {
    variant: Variant,
    renderer: FrameRenderer,
}

impl App for Viewer {
    fn on_ready(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        self.renderer
            .initialize_variant(&gpu.render_ctx(), self.variant)
            .with_context(|| format!("failed to set up the {} variant", self.variant))
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let renderer = &mut self.renderer;
        ctx.render(|_, target, viewport| match renderer.render_frame(target, viewport) {
            Ok(_) => AppControl::Continue,
            Err(e) => {
                log::error!("frame failed: {e}");
                AppControl::Exit
            }
        })
    }

    fn on_shutdown(&mut self) {
        let report = self.renderer.shutdown();
        log::info!(
            "released {} frames worth of resources: {report:?}",
            self.renderer.frames_rendered()
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    log::info!("tessera-viewer: {} at {}x{}", cli.variant, cli.width, cli.height);

    let config = RuntimeConfig {
        title: cli.title,
        initial_size: LogicalSize::new(f64::from(cli.width), f64::from(cli.height)),
        max_frames: cli.frames,
    };

    let viewer = Viewer {
        variant: cli.variant,
        renderer: FrameRenderer::default(),
    };

    Runtime::run(config, GpuInit::default(), viewer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_window() {
        let cli = Cli::try_parse_from(["tessera-viewer"]).unwrap();
        assert_eq!(cli.variant, Variant::SharedVertex);
        assert_eq!((cli.width, cli.height), (640, 480));
        assert!(cli.frames.is_none());
    }

    #[test]
    fn parses_variant_and_frame_limit() {
        let cli =
            Cli::try_parse_from(["tessera-viewer", "--variant", "triangle", "--frames", "1"]).unwrap();
        assert_eq!(cli.variant, Variant::Triangle);
        assert_eq!(cli.frames, Some(1));
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["tessera-viewer", "--variant", "cube"]).is_err());
    }
}
