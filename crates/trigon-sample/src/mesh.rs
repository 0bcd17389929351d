use bytemuck::{Pod, Zeroable};

/// One vertex of the sample mesh. Grows with the input layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexData {
    pub position: [f32; 4],
}

pub const VERTICES: [VertexData; 3] = [
    VertexData { position: [0.0, 0.5, 0.0, 1.0] },
    VertexData { position: [0.5, -0.5, 0.0, 1.0] },
    VertexData { position: [-0.5, -0.5, 0.0, 1.0] },
];

pub const INDICES: [u16; 3] = [0, 2, 1];

/// Clip-space positions of each indexed triangle.
#[cfg(test)]
pub fn triangles() -> impl Iterator<Item = [[f32; 4]; 3]> {
    INDICES
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]].map(|i| VERTICES[i as usize].position))
}
