use wgpu::util::DeviceExt;

use crate::device::Owned;

use super::{DrawCall, GeometryData};

/// GPU-owned copy of a [`GeometryData`]: vertex buffer, optional index buffer
/// and the draw call that consumes them.
///
/// Contents are immutable after upload.
#[derive(Debug)]
pub struct GeometryBuffer {
    vertex_buffer: Owned<wgpu::Buffer>,
    index_buffer: Option<Owned<wgpu::Buffer>>,
    draw: DrawCall,
}

impl GeometryBuffer {
    /// Uploads vertex (and index) data into static GPU buffers.
    pub fn upload(device: &wgpu::Device, data: &GeometryData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera vertex buffer"),
            contents: bytemuck::cast_slice(data.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = data.gpu_indices().map(|indices| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tessera index buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            Owned::new("index buffer", buffer)
        });

        log::debug!(
            "uploaded {} vertices ({} bytes), indexed: {}",
            data.vertex_count(),
            std::mem::size_of_val(data.vertices()),
            index_buffer.is_some()
        );

        Self {
            vertex_buffer: Owned::new("vertex buffer", vertex_buffer),
            index_buffer,
            draw: data.draw_call(),
        }
    }

    pub fn draw_call(&self) -> DrawCall {
        self.draw
    }

    pub fn has_index_buffer(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Binds the buffers and issues the draw call.
    ///
    /// Returns `false` without drawing if any buffer was already released.
    pub fn record(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(vbo) = self.vertex_buffer.get() else { return false };
        rpass.set_vertex_buffer(0, vbo.slice(..));

        match self.draw {
            DrawCall::Arrays { first, count } => {
                rpass.draw(first..first + count, 0..1);
            }
            DrawCall::Indexed { count } => {
                let Some(ibo) = self.index_buffer.as_ref().and_then(Owned::get) else {
                    return false;
                };
                rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..count, 0, 0..1);
            }
        }
        true
    }

    pub(crate) fn release_vertex_buffer(&mut self) -> bool {
        self.vertex_buffer.release()
    }

    /// `false` when there is no index buffer or it was already released.
    pub(crate) fn release_index_buffer(&mut self) -> bool {
        self.index_buffer.as_mut().is_some_and(Owned::release)
    }
}
