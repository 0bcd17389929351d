use bytemuck::Pod;

use super::{GfxError, buffer};

/// GPU index buffer of 16- or 32-bit indices.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: wgpu::Buffer,
    size: u64,
    stride: u64,
    format: wgpu::IndexFormat,
}

impl IndexBuffer {
    /// Allocates `size_in_bytes` of index storage. `stride_in_bytes` selects the
    /// index format: 2 for `u16`, 4 for `u32`.
    pub fn create(
        device: &wgpu::Device,
        size_in_bytes: u64,
        stride_in_bytes: u64,
    ) -> Result<Self, GfxError> {
        let format = index_format(stride_in_bytes)?;
        buffer::check_layout(size_in_bytes, stride_in_bytes)?;

        let buffer = buffer::create(
            device,
            "trigon index buffer",
            size_in_bytes,
            wgpu::BufferUsages::INDEX,
        );

        Ok(Self {
            buffer,
            size: size_in_bytes,
            stride: stride_in_bytes,
            format,
        })
    }

    /// Copies `indices` to the start of the buffer.
    pub fn write<T: Pod>(&self, queue: &wgpu::Queue, indices: &[T]) -> Result<(), GfxError> {
        buffer::write(queue, &self.buffer, self.stride, self.size, indices)
    }

    /// Byte range covering the declared size (excludes alignment padding).
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.size)
    }

    pub fn get(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of indices the buffer holds.
    pub fn count(&self) -> u32 {
        (self.size / self.stride) as u32
    }
}

/// Maps an index stride in bytes to its index format.
pub fn index_format(stride_in_bytes: u64) -> Result<wgpu::IndexFormat, GfxError> {
    match stride_in_bytes {
        2 => Ok(wgpu::IndexFormat::Uint16),
        4 => Ok(wgpu::IndexFormat::Uint32),
        other => Err(GfxError::UnsupportedIndexStride(other)),
    }
}
