use std::fmt;
use std::path::PathBuf;

use super::ShaderStage;

/// Failure while loading or compiling a shader.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader profile string (e.g. `"vs_6_0"`) could not be parsed.
    InvalidModel(String),
    /// The source file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The front end rejected the source. `message` holds the rendered diagnostic.
    Parse { label: String, message: String },
    /// The module parsed but failed validation.
    Validation { label: String, message: String },
    /// No entry point with the expected name exists for the requested stage.
    MissingEntryPoint {
        label: String,
        entry_point: String,
        stage: ShaderStage,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModel(model) => write!(f, "invalid shader model {model:?}"),
            Self::Io { path, .. } => write!(f, "failed to read shader {}", path.display()),
            Self::Parse { label, message } => {
                write!(f, "shader {label} failed to compile:\n{message}")
            }
            Self::Validation { label, message } => {
                write!(f, "shader {label} failed validation:\n{message}")
            }
            Self::MissingEntryPoint {
                label,
                entry_point,
                stage,
            } => write!(f, "shader {label} has no {stage} entry point named {entry_point:?}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure while creating a buffer or pipeline wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    /// Buffer size is zero or not a multiple of the element stride.
    InvalidBufferSize { size: u64, stride: u64 },
    /// Index buffers accept 2-byte or 4-byte indices only.
    UnsupportedIndexStride(u64),
    /// Upload element size differs from the buffer's element stride.
    StrideMismatch { element: u64, stride: u64 },
    /// Upload does not fit in the buffer.
    WriteOverflow { len: u64, capacity: u64 },
    /// A shader was bound to a pipeline slot of a different stage.
    StageMismatch {
        slot: &'static str,
        expected: ShaderStage,
        found: ShaderStage,
    },
    /// The vertex shader reads a location the input layout does not provide.
    MissingVertexAttribute(u32),
    /// The pixel shader reads a location the vertex shader never writes.
    UnlinkedLocation(u32),
    /// An explicit input element offset is not aligned for its format.
    MisalignedElement { location: u32, offset: u64 },
    /// Pipeline description is incomplete or out of range.
    InvalidPipeline(&'static str),
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBufferSize { size, stride } => write!(
                f,
                "buffer size {size} is not a non-zero multiple of stride {stride}"
            ),
            Self::UnsupportedIndexStride(stride) => {
                write!(f, "index stride must be 2 or 4 bytes, got {stride}")
            }
            Self::StrideMismatch { element, stride } => write!(
                f,
                "element size {element} does not match buffer stride {stride}"
            ),
            Self::WriteOverflow { len, capacity } => {
                write!(f, "write of {len} bytes exceeds buffer capacity {capacity}")
            }
            Self::StageMismatch {
                slot,
                expected,
                found,
            } => write!(f, "{slot} expects a {expected} shader, got {found}"),
            Self::MissingVertexAttribute(loc) => write!(
                f,
                "vertex shader input @location({loc}) has no matching input element"
            ),
            Self::UnlinkedLocation(loc) => write!(
                f,
                "pixel shader input @location({loc}) is not written by the vertex shader"
            ),
            Self::MisalignedElement { location, offset } => write!(
                f,
                "input element @location({location}) at offset {offset} is misaligned"
            ),
            Self::InvalidPipeline(reason) => write!(f, "invalid pipeline description: {reason}"),
        }
    }
}

impl std::error::Error for GfxError {}
