//! Shared sizing and upload helpers for the vertex and index buffer wrappers.

use bytemuck::Pod;

use super::GfxError;

/// Checks that `size` holds a whole, non-zero number of `stride`-byte elements.
pub(super) fn check_layout(size: u64, stride: u64) -> Result<(), GfxError> {
    if size == 0 || stride == 0 || size % stride != 0 {
        return Err(GfxError::InvalidBufferSize { size, stride });
    }
    Ok(())
}

/// Rounds `len` up to the copy alignment required by buffer writes.
pub(super) fn aligned_len(len: u64) -> u64 {
    len.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
}

/// Allocates the device buffer backing a wrapper.
pub(super) fn create(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: aligned_len(size),
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Returns the bytes of `data` zero-padded to copy alignment.
pub(super) fn padded_bytes<T: Pod>(data: &[T]) -> Vec<u8> {
    let raw: &[u8] = bytemuck::cast_slice(data);
    let mut bytes = raw.to_vec();
    bytes.resize(aligned_len(raw.len() as u64) as usize, 0);
    bytes
}

/// Checks an upload of `len` bytes made of `element`-sized items against a
/// buffer of `capacity` bytes holding `stride`-sized elements.
pub(super) fn check_write(len: u64, element: u64, stride: u64, capacity: u64) -> Result<(), GfxError> {
    if element != stride {
        return Err(GfxError::StrideMismatch { element, stride });
    }
    if len > capacity {
        return Err(GfxError::WriteOverflow { len, capacity });
    }
    Ok(())
}

/// Uploads `data` at offset 0.
pub(super) fn write<T: Pod>(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    stride: u64,
    capacity: u64,
    data: &[T],
) -> Result<(), GfxError> {
    let len = std::mem::size_of_val(data) as u64;
    check_write(len, std::mem::size_of::<T>() as u64, stride, capacity)?;
    if len == 0 {
        return Ok(());
    }
    queue.write_buffer(buffer, 0, &padded_bytes(data));
    Ok(())
}
