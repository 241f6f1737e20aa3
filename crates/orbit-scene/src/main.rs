//! Two textured sprites: one sliding along a diagonal while it pulses in size,
//! the other circling it.

mod anim;
mod app;
mod config;
mod transform;

use anyhow::Result;

use orbit_engine::device::GpuInit;
use orbit_engine::logging::{init_logging, LoggingConfig};
use orbit_engine::window::Runtime;

use crate::app::OrbitApp;
use crate::config::SceneConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = SceneConfig::default();
    log::info!("starting {}", config.title);

    let runtime = config.runtime();
    Runtime::run(runtime, GpuInit::default(), OrbitApp::new(config))?;

    log::info!("shut down cleanly");
    Ok(())
}
