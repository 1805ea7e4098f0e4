// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Config
//!
//! Settings come from three places.  Command line flags win over the TOML file, which wins over
//! the built-in defaults.  Every key in the file is optional.
//!
//! ```toml
//! [window]
//! width = 800
//! height = 600
//! title = "Vulkan"
//!
//! [vulkan]
//! validation = true
//!
//! [shaders]
//! vertex = "triangle/vert"
//! fragment = "triangle/frag"
//! assets_dir = "/path/to/assets"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::Args;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vktutorial.toml";

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "Vulkan";
pub const DEFAULT_VERTEX_SHADER: &str = "triangle/vert";
pub const DEFAULT_FRAGMENT_SHADER: &str = "triangle/frag";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("window size must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
}

/// The TOML file as written.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub window: WindowSection,
    pub vulkan: VulkanSection,
    pub shaders: ShaderSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VulkanSection {
    pub validation: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderSection {
    pub vertex: Option<String>,
    pub fragment: Option<String>,
    pub assets_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub validation: bool,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub assets_dir: Option<PathBuf>,
}

impl Config {
    /// Read the file named by `--config`, or the default file if it exists, and apply `args`.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        Self::load_in(args, Path::new("."))
    }

    /// As [`Config::load`], looking for the default file in `dir` instead of the working directory.
    pub fn load_in(args: &Args, dir: &Path) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::read(path)?,
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    FileConfig::read(&path)?
                } else {
                    debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    FileConfig::default()
                }
            }
        };
        Self::merge(file, args)
    }

    pub fn merge(file: FileConfig, args: &Args) -> Result<Self, ConfigError> {
        let width = args.width.or(file.window.width).unwrap_or(DEFAULT_WIDTH);
        let height = args.height.or(file.window.height).unwrap_or(DEFAULT_HEIGHT);
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroSize { width, height });
        }

        Ok(Config {
            width,
            height,
            title: file.window.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            validation: args
                .validation_override()
                .or(file.vulkan.validation)
                .unwrap_or(cfg!(debug_assertions)),
            vertex_shader: file
                .shaders
                .vertex
                .unwrap_or_else(|| DEFAULT_VERTEX_SHADER.to_owned()),
            fragment_shader: file
                .shaders
                .fragment
                .unwrap_or_else(|| DEFAULT_FRAGMENT_SHADER.to_owned()),
            assets_dir: args.assets_dir.clone().or(file.shaders.assets_dir),
        })
    }
}
