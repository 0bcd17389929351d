mod config;
mod mesh;
mod triangle;

use anyhow::Result;
use winit::dpi::LogicalSize;

use trigon_engine::device::GpuInit;
use trigon_engine::logging::{LoggingConfig, init_logging};
use trigon_engine::window::{Runtime, RuntimeConfig};

use config::SampleConfig;
use triangle::TriangleApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = SampleConfig::from_env();
    log::info!("resources: {}", config.resources_dir.display());

    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(config.width, config.height),
        resizable: false,
    };

    Runtime::run(runtime, GpuInit::default(), TriangleApp::new(config))
}
