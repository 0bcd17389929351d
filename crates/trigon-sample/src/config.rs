use std::path::PathBuf;

/// Environment variable that overrides the resources directory.
pub const RESOURCES_ENV: &str = "TRIGON_RESOURCES";

/// Sample settings. Defaults match the shipped resources.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub resources_dir: PathBuf,
    pub clear_color: wgpu::Color,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            title: "trigon sample".to_string(),
            width: 1280.0,
            height: 720.0,
            resources_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources"),
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.25,
                b: 0.5,
                a: 1.0,
            },
        }
    }
}

impl SampleConfig {
    /// Defaults, with the resources directory taken from `TRIGON_RESOURCES` when set.
    pub fn from_env() -> Self {
        Self::default().with_resources_override(std::env::var_os(RESOURCES_ENV).map(PathBuf::from))
    }

    fn with_resources_override(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            self.resources_dir = dir;
        }
        self
    }

    pub fn vertex_shader_path(&self) -> PathBuf {
        self.resources_dir.join("shaders").join("TestVS.wgsl")
    }

    pub fn pixel_shader_path(&self) -> PathBuf {
        self.resources_dir.join("shaders").join("TestPS.wgsl")
    }
}
