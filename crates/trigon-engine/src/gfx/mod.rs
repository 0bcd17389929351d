//! Thin wrappers over graphics object creation.
//!
//! Each type owns one wgpu object and is created by a single call:
//! shaders compile on the CPU, then root signature, pipeline state and
//! vertex/index buffers are created against a device and used every frame.

mod buffer;
mod error;
mod index_buffer;
mod pipeline_state;
mod root_signature;
mod shader;
mod vertex_buffer;

pub use error::{GfxError, ShaderError};
pub use index_buffer::{IndexBuffer, index_format};
pub use pipeline_state::{
    APPEND_ALIGNED_ELEMENT, BlendDesc, GraphicsPipelineDesc, InputElement, InputLayout,
    MAX_RENDER_TARGETS, PipelineState, RasterizerDesc, check_targets, link_stages,
};
pub use root_signature::RootSignature;
pub use shader::{ENTRY_POINT, Shader, ShaderModel, ShaderStage};
pub use vertex_buffer::VertexBuffer;
