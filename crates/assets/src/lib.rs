// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assets
//!
//! Shaders are compiled ahead of time into SPIR-V and looked up at runtime.  The build support and
//! runtime asset loading are both feature gated to keep compile time down.  The build feature
//! enables writing short build scripts.  The runtime feature enables loading the assets.  Use the
//! build feature in build dependencies and the runtime feature in normal dependencies.

#[cfg(feature = "runtime")]
pub mod assets;
#[cfg(feature = "build")]
pub mod build;
pub mod spirv;

#[cfg(feature = "runtime")]
pub use assets::*;
pub use spirv::read_spirv;

use std::ffi::OsStr;

mod prelude {
    pub use super::AssetError;
    #[allow(unused_imports)]
    pub use super::AssetKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Shader,
}

impl AssetKind {
    pub fn ext(&self) -> &'static OsStr {
        match self {
            AssetKind::Shader => OsStr::new("spv"),
        }
    }

    pub fn subdir(&self) -> &'static OsStr {
        match self {
            AssetKind::Shader => OsStr::new("shaders"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("read failed: {:?}", .0)]
    ReadError(#[from] std::io::Error),
    #[error("file not found: {:?}", .0)]
    NotFound(String),
    #[error("load spirv failed: {:?}", .0)]
    InvalidShader(String),
}
