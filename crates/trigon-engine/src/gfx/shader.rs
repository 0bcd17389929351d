use std::fmt;
use std::path::Path;
use std::str::FromStr;

use naga::{Binding, Handle, Type, TypeInner};

use super::ShaderError;

/// Entry point name every shader is compiled against.
pub const ENTRY_POINT: &str = "main";

/// Programmable pipeline stage a shader targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    /// Pixel (fragment) stage.
    Pixel,
    Compute,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Pixel => naga::ShaderStage::Fragment,
            Self::Compute => naga::ShaderStage::Compute,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Pixel => "pixel",
            Self::Compute => "compute",
        })
    }
}

/// Shader profile in `<stage>_<major>_<minor>` form, e.g. `vs_6_0` or `ps_6_0`.
///
/// Only the stage prefix affects compilation. The version is kept for logging.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShaderModel {
    pub stage: ShaderStage,
    pub major: u8,
    pub minor: u8,
}

impl ShaderModel {
    pub const fn new(stage: ShaderStage, major: u8, minor: u8) -> Self {
        Self { stage, major, minor }
    }
}

impl FromStr for ShaderModel {
    type Err = ShaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ShaderError::InvalidModel(s.to_string());

        let mut parts = s.split('_');
        let (Some(prefix), Some(major), Some(minor), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let stage = match prefix {
            "vs" => ShaderStage::Vertex,
            "ps" => ShaderStage::Pixel,
            "cs" => ShaderStage::Compute,
            _ => return Err(invalid()),
        };

        let major = major.parse().map_err(|_| invalid())?;
        let minor = minor.parse().map_err(|_| invalid())?;

        Ok(Self { stage, major, minor })
    }
}

impl fmt::Display for ShaderModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.stage {
            ShaderStage::Vertex => "vs",
            ShaderStage::Pixel => "ps",
            ShaderStage::Compute => "cs",
        };
        write!(f, "{prefix}_{}_{}", self.major, self.minor)
    }
}

/// A compiled shader.
///
/// Compilation happens on the CPU through the WGSL front end and validator, so
/// diagnostics are available before any device exists. The GPU module is
/// created later with [`Shader::module`].
#[derive(Debug)]
pub struct Shader {
    label: String,
    source: String,
    model: ShaderModel,
    module: naga::Module,
}

impl Shader {
    /// Reads the shader at `path` and compiles it for `model` (e.g. `"vs_6_0"`).
    pub fn load(path: impl AsRef<Path>, model: &str) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let model: ShaderModel = model.parse()?;

        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::compile(path.display().to_string(), source, model)
    }

    /// Compiles in-memory WGSL source for `model`.
    pub fn from_source(
        label: impl Into<String>,
        source: impl Into<String>,
        model: &str,
    ) -> Result<Self, ShaderError> {
        let model: ShaderModel = model.parse()?;
        Self::compile(label.into(), source.into(), model)
    }

    fn compile(label: String, source: String, model: ShaderModel) -> Result<Self, ShaderError> {
        let module = match naga::front::wgsl::parse_str(&source) {
            Ok(module) => module,
            Err(err) => {
                let message = err.emit_to_string(&source);
                log::error!("{message}");
                return Err(ShaderError::Parse { label, message });
            }
        };

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        if let Err(err) = validator.validate(&module) {
            let message = err.emit_to_string(&source);
            log::error!("{message}");
            return Err(ShaderError::Validation { label, message });
        }

        let stage = model.stage.to_naga();
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.name == ENTRY_POINT && ep.stage == stage);
        if !found {
            log::error!("{label}: no {} entry point named {ENTRY_POINT:?}", model.stage);
            return Err(ShaderError::MissingEntryPoint {
                label,
                entry_point: ENTRY_POINT.to_string(),
                stage: model.stage,
            });
        }

        log::debug!("compiled shader {label} ({model})");

        Ok(Self {
            label,
            source,
            model,
            module,
        })
    }

    /// Creates the device-side shader module.
    pub fn module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn model(&self) -> ShaderModel {
        self.model
    }

    pub fn stage(&self) -> ShaderStage {
        self.model.stage
    }

    pub fn entry_point(&self) -> &'static str {
        ENTRY_POINT
    }

    pub fn naga_module(&self) -> &naga::Module {
        &self.module
    }

    /// User-defined `@location` inputs of the entry point, sorted.
    pub fn input_locations(&self) -> Vec<u32> {
        let mut out = Vec::new();
        if let Some(ep) = self.entry() {
            for arg in &ep.function.arguments {
                collect_locations(&self.module, arg.ty, arg.binding.as_ref(), &mut out);
            }
        }
        out.sort_unstable();
        out
    }

    /// User-defined `@location` outputs of the entry point, sorted.
    pub fn output_locations(&self) -> Vec<u32> {
        let mut out = Vec::new();
        if let Some(result) = self.entry().and_then(|ep| ep.function.result.as_ref()) {
            collect_locations(&self.module, result.ty, result.binding.as_ref(), &mut out);
        }
        out.sort_unstable();
        out
    }

    fn entry(&self) -> Option<&naga::EntryPoint> {
        let stage = self.model.stage.to_naga();
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == ENTRY_POINT && ep.stage == stage)
    }
}

fn collect_locations(
    module: &naga::Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(*location),
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn main(@location(0) position: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = position;
    out.color = vec4<f32>(1.0, 1.0, 1.0, 1.0);
    return out;
}
"#;

    const PS: &str = r#"
@fragment
fn main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

    // ── shader model ──────────────────────────────────────────────────────

    #[test]
    fn parses_vertex_and_pixel_profiles() {
        let vs: ShaderModel = "vs_6_0".parse().unwrap();
        assert_eq!(vs, ShaderModel::new(ShaderStage::Vertex, 6, 0));

        let ps: ShaderModel = "ps_5_1".parse().unwrap();
        assert_eq!(ps, ShaderModel::new(ShaderStage::Pixel, 5, 1));
    }

    #[test]
    fn profile_display_matches_input() {
        let m: ShaderModel = "cs_6_6".parse().unwrap();
        assert_eq!(m.to_string(), "cs_6_6");
    }

    #[test]
    fn rejects_malformed_profiles() {
        for bad in ["", "vs", "vs_6", "gs_6_0", "vs_6_0_1", "vs_x_0", "VS_6_0"] {
            assert!(
                matches!(bad.parse::<ShaderModel>(), Err(ShaderError::InvalidModel(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn compiles_vertex_shader() {
        let vs = Shader::from_source("vs", VS, "vs_6_0").unwrap();
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(vs.entry_point(), "main");
        assert_eq!(vs.input_locations(), vec![0]);
        assert_eq!(vs.output_locations(), vec![0]);
    }

    #[test]
    fn compiles_pixel_shader() {
        let ps = Shader::from_source("ps", PS, "ps_6_0").unwrap();
        assert_eq!(ps.stage(), ShaderStage::Pixel);
        assert_eq!(ps.input_locations(), vec![0]);
    }

    #[test]
    fn syntax_error_carries_diagnostic() {
        let err = Shader::from_source("broken", "@vertex fn main( {", "vs_6_0").unwrap_err();
        match err {
            ShaderError::Parse { label, message } => {
                assert_eq!(label, "broken");
                assert!(!message.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_fails_validation() {
        let src = r#"
@fragment
fn main() -> @location(0) vec4<f32> {
    let x: f32 = 1.0;
    return x;
}
"#;
        let err = Shader::from_source("bad-return", src, "ps_6_0").unwrap_err();
        assert!(
            matches!(err, ShaderError::Parse { .. } | ShaderError::Validation { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn wrong_stage_is_missing_entry_point() {
        let err = Shader::from_source("ps-as-vs", PS, "vs_6_0").unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingEntryPoint {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn other_entry_point_name_is_rejected() {
        let src = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;
        let err = Shader::from_source("named", src, "ps_6_0").unwrap_err();
        assert!(err.to_string().contains("\"main\""));
    }

    #[test]
    fn invalid_model_fails_before_compiling() {
        let err = Shader::from_source("vs", VS, "xs_6_0").unwrap_err();
        assert!(matches!(err, ShaderError::InvalidModel(m) if m == "xs_6_0"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Shader::load("does/not/exist.wgsl", "vs_6_0").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}
