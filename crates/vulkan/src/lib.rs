// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Vulkan
//!
//! The mandatory handshake with the driver, one step per module:
//!
//! - `context`: entry, instance, validation layers and the debug messenger
//! - `surface`: a presentable surface for a window
//! - `device`: choosing a physical device and opening a logical one
//! - `queue`: queue family discovery and the queues we draw and present on
//! - `swapchain`: the swap chain and its image views
//! - `pipeline`: shader modules and the pipeline layout
//!
//! Nothing here records commands or presents a frame.

pub mod context;
pub mod device;
pub mod pipeline;
pub mod queue;
#[cfg(feature = "window")]
pub mod surface;
pub mod swapchain;
pub mod util;

use ash::vk;

pub mod prelude {
    pub use super::VulkanError;
    pub use crate::context::VkContext;
    pub use crate::device::Device;
}

#[derive(thiserror::Error, Debug)]
pub enum VulkanError {
    #[error("failed to load Vulkan library: {0}")]
    Loading(#[from] ash::LoadingError),

    #[error("Ash: {0}")]
    Ash(#[from] vk::Result),

    #[error("validation layers requested, but not available: {0}")]
    MissingLayers(String),

    #[error("required instance extensions not available: {0}")]
    MissingExtensions(String),

    #[error("failed to find GPUs with Vulkan support")]
    NoDevices,

    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,

    #[error("device offers no surface formats")]
    NoSurfaceFormat,

    #[cfg(feature = "window")]
    #[error("window handle: {0}")]
    Handle(#[from] raw_window_handle::HandleError),

    #[error("assets: {0}")]
    Asset(#[from] vktutorial_assets::AssetError),
}

#[cfg(test)]
mod test {
    use super::*;

    #[cfg(feature = "window")]
    #[test]
    fn test_window_handle_error() {
        let err = VulkanError::from(raw_window_handle::HandleError::Unavailable);
        assert!(err.to_string().starts_with("window handle: "));
    }

    #[test]
    fn test_device_messages() {
        assert_eq!(
            VulkanError::NoDevices.to_string(),
            "failed to find GPUs with Vulkan support"
        );
        assert_eq!(
            VulkanError::NoSuitableDevice.to_string(),
            "failed to find a suitable GPU"
        );
    }
}
