use bytemuck::Pod;

use super::{GfxError, buffer};

/// GPU vertex buffer with a fixed element stride.
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    size: u64,
    stride: u64,
}

impl VertexBuffer {
    /// Allocates `size_in_bytes` of vertex storage holding `stride_in_bytes`-sized vertices.
    pub fn create(
        device: &wgpu::Device,
        size_in_bytes: u64,
        stride_in_bytes: u64,
    ) -> Result<Self, GfxError> {
        buffer::check_layout(size_in_bytes, stride_in_bytes)?;

        let buffer = buffer::create(
            device,
            "trigon vertex buffer",
            size_in_bytes,
            wgpu::BufferUsages::VERTEX,
        );

        Ok(Self {
            buffer,
            size: size_in_bytes,
            stride: stride_in_bytes,
        })
    }

    /// Copies `vertices` to the start of the buffer.
    pub fn write<T: Pod>(&self, queue: &wgpu::Queue, vertices: &[T]) -> Result<(), GfxError> {
        buffer::write(queue, &self.buffer, self.stride, self.size, vertices)
    }

    /// Byte range covering the declared size (excludes alignment padding).
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.size)
    }

    pub fn get(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of vertices the buffer holds.
    pub fn count(&self) -> u32 {
        (self.size / self.stride) as u32
    }
}
