use anyhow::{Context, Result};

use crate::render::{RenderCtx, RenderTarget};

use super::init::device_descriptor;
use super::GpuInit;

/// Device + queue with no window or surface.
///
/// Renders into an [`OffscreenTarget`] whose pixels can be read back.
pub struct HeadlessGpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    pub async fn new(init: &GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a headless GPU adapter")?;

        let info = adapter.get_info();
        log::info!("headless adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&device_descriptor(init))
            .await
            .context("failed to create headless wgpu device/queue")?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Renderer-facing view targeting `format`.
    pub fn render_ctx(&self, format: wgpu::TextureFormat) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, format)
    }

    /// Records `draw` into `target` and submits it.
    pub fn render<R>(
        &self,
        target: &OffscreenTarget,
        draw: impl FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>) -> R,
    ) -> R {
        let ctx = self.render_ctx(target.format());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera offscreen encoder"),
            });

        let out = {
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            draw(&ctx, &mut rt)
        };

        self.queue.submit(std::iter::once(encoder.finish()));
        out
    }
}

/// Color texture standing in for a window's back buffer.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Linear, so shader output lands in memory unconverted.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        Self::FORMAT
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copies the texture into a mapped staging buffer and returns tightly packed RGBA8.
    pub fn read_pixels(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Pixels> {
        // Rows in buffer copies must be COPY_BYTES_PER_ROW_ALIGNMENT aligned.
        let unpadded = self.width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = unpadded.div_ceil(align) * align;

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera readback buffer"),
            size: u64::from(padded) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera readback encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to poll device for readback")?;

        rx.recv()
            .context("readback map callback was dropped")?
            .context("failed to map readback buffer")?;

        let mapped = slice.get_mapped_range();
        let mut data = Vec::with_capacity((unpadded * self.height) as usize);
        for row in 0..self.height {
            let start = (row * padded) as usize;
            data.extend_from_slice(&mapped[start..start + unpadded as usize]);
        }

        drop(mapped);
        staging.unmap();

        Ok(Pixels {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Tightly packed RGBA8 pixels, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Pixels {
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.data.get(i..i + 4).and_then(|p| p.try_into().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_lookup_is_row_major() {
        let px = Pixels {
            width: 2,
            height: 2,
            data: (0u8..16).collect(),
        };
        assert_eq!(px.get(0, 0), Some([0, 1, 2, 3]));
        assert_eq!(px.get(1, 0), Some([4, 5, 6, 7]));
        assert_eq!(px.get(0, 1), Some([8, 9, 10, 11]));
        assert_eq!(px.get(2, 0), None);
        assert_eq!(px.get(0, 2), None);
    }
}
