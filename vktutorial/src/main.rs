// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # vktutorial
//!
//! Opens a window and walks the Vulkan initialization sequence against it: instance, surface,
//! physical and logical device, swap chain, image views and shader modules.  Then it idles until
//! the window is closed.  Nothing is drawn.

mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use vktutorial_vulkan::VulkanError;

use crate::config::{Config, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "vktutorial")]
#[command(about = "Vulkan initialization walkthrough.", long_about = None)]
pub struct Args {
    /// TOML configuration file.  Defaults to ./vktutorial.toml when present.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Enable the Khronos validation layer
    #[arg(long = "validation", overrides_with = "no_validation")]
    pub validation: bool,

    /// Disable the Khronos validation layer
    #[arg(long = "no-validation", overrides_with = "validation")]
    pub no_validation: bool,

    /// Window width in logical pixels
    #[arg(long = "width")]
    pub width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long = "height")]
    pub height: Option<u32>,

    /// Search this assets root for shaders before the default locations
    #[arg(long = "assets-dir")]
    pub assets_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// The validation choice made on the command line, if any.
    pub fn validation_override(&self) -> Option<bool> {
        if self.validation {
            Some(true)
        } else if self.no_validation {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Vulkan: {0}")]
    Vulkan(#[from] VulkanError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window: {0}")]
    Window(#[from] winit::error::OsError),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: Args) -> Result<(), AppError> {
    let config = Config::load(&args)?;

    let event_loop = EventLoop::new()?;
    // Nothing is drawn, so there is no reason to spin between events.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = app::App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Errors are logged here and nowhere else.
fn report(result: Result<(), AppError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    report(run(args))
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_error_display() {
        let err = AppError::from(VulkanError::NoSuitableDevice);
        assert_eq!(err.to_string(), "Vulkan: failed to find a suitable GPU");
    }

    #[test]
    fn test_failure_exit_code() {
        let code = report(Err(VulkanError::NoDevices.into()));
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));

        let code = report(Ok(()));
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    }
}
