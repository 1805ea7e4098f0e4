// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Device
//!
//! Choosing hardware and opening it.  The first physical device that can draw, present to our
//! surface and drive a swap chain is used.  There is no scoring.  Initializing it results in a
//! logical `ash::Device`, which is used in most calls to Vulkan.

use std::ffi::{CStr, c_char};

use ash::vk;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::prelude::*;
use crate::queue::{QueueFamilies, QueueFamilyIndices, Queues};
use crate::swapchain::SwapchainSupport;
use crate::util;

/// Extensions every selected device must support.
pub const DEVICE_EXTENSIONS: [&CStr; 1] = [vk::KHR_SWAPCHAIN_NAME];

/// Why a physical device was passed over.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Unsuitable {
    #[error("no graphics and present capable queue families")]
    QueueFamilies,
    #[error("missing device extensions: {0}")]
    Extensions(String),
    #[error("no surface formats or present modes")]
    Swapchain,
}

/// Decide suitability from what was queried.  Swap chain support is only meaningful once the
/// swap chain extension is known to be present, so `support` is consulted after extensions.
pub fn judge(
    indices: QueueFamilyIndices,
    missing_extensions: &[&CStr],
    support: Option<&SwapchainSupport>,
) -> Result<QueueFamilies, Unsuitable> {
    let families = QueueFamilies::try_from(indices).map_err(|_| Unsuitable::QueueFamilies)?;

    if !missing_extensions.is_empty() {
        return Err(Unsuitable::Extensions(util::join_names(missing_extensions)));
    }

    match support {
        Some(support) if support.is_adequate() => Ok(families),
        _ => Err(Unsuitable::Swapchain),
    }
}

/// Query `physical_device` and judge it.  Outer errors are Vulkan failures.  Inner errors are
/// devices that work but do not meet our needs.
pub fn check_device(
    context: &VkContext,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> Result<Result<QueueFamilies, Unsuitable>, VulkanError> {
    let indices = QueueFamilyIndices::query(context, physical_device, surface)?;

    let props = unsafe {
        context
            .instance
            .enumerate_device_extension_properties(physical_device)?
    };
    let available = util::extension_names(&props);
    let missing = util::missing_names(&DEVICE_EXTENSIONS, &available);

    let support = if missing.is_empty() {
        Some(SwapchainSupport::query(context, physical_device, surface)?)
    } else {
        None
    };

    Ok(judge(indices, &missing, support.as_ref()))
}

pub fn device_name(context: &VkContext, physical_device: vk::PhysicalDevice) -> String {
    let props = unsafe {
        context
            .instance
            .get_physical_device_properties(physical_device)
    };
    props
        .device_name_as_c_str()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "<unnamed device>".to_owned())
}

/// First suitable device in enumeration order.
pub fn pick_physical_device(
    context: &VkContext,
    surface: vk::SurfaceKHR,
) -> Result<(vk::PhysicalDevice, QueueFamilies), VulkanError> {
    let physical_devices = unsafe { context.instance.enumerate_physical_devices()? };
    if physical_devices.is_empty() {
        return Err(VulkanError::NoDevices);
    }

    for physical_device in physical_devices {
        let name = device_name(context, physical_device);
        match check_device(context, physical_device, surface)? {
            Ok(families) => {
                info!("graphics card selected: {name}");
                return Ok((physical_device, families));
            }
            Err(reason) => warn!("skipping {name}: {reason}"),
        }
    }

    Err(VulkanError::NoSuitableDevice)
}

/// The selected physical device, the logical device opened on it and its queues.
pub struct Device {
    pub physical_device: vk::PhysicalDevice,
    /// Vulkan logical device
    pub device: ash::Device,
    pub queues: Queues,
    pub name: String,
}

impl Device {
    /// Pick a physical device able to present to `surface` and open it.
    pub fn new(context: &VkContext, surface: vk::SurfaceKHR) -> Result<Self, VulkanError> {
        let (physical_device, families) = pick_physical_device(context, surface)?;
        let name = device_name(context, physical_device);

        let indices = QueueFamilyIndices {
            graphics: Some(families.graphics),
            present: Some(families.present),
        };
        let queue_priorities = [1.0];
        let queue_infos = indices.queue_infos(&queue_priorities);

        let extension_ptrs: SmallVec<*const c_char, 4> =
            DEVICE_EXTENSIONS.iter().map(|name| name.as_ptr()).collect();
        // Device layers are ignored by current drivers.  Older ones still read them.
        let layer_ptrs: SmallVec<*const c_char, 1> = context
            .device_layers()
            .iter()
            .map(|name| name.as_ptr())
            .collect();
        let features = vk::PhysicalDeviceFeatures::default();

        #[allow(deprecated)]
        let device_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&features);

        let device = unsafe {
            context
                .instance
                .create_device(physical_device, &device_info, None)?
        };
        let queues = Queues::new(&device, families);

        Ok(Self {
            physical_device,
            device,
            queues,
            name,
        })
    }

    pub fn device(&self) -> &ash::Device {
        &self.device
    }

    pub fn destroy(&self) {
        unsafe {
            self.device.destroy_device(None);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn adequate() -> SwapchainSupport {
        SwapchainSupport {
            formats: vec![vk::SurfaceFormatKHR::default()],
            present_modes: vec![vk::PresentModeKHR::FIFO],
            ..Default::default()
        }
    }

    fn complete(graphics: u32, present: u32) -> QueueFamilyIndices {
        QueueFamilyIndices {
            graphics: Some(graphics),
            present: Some(present),
        }
    }

    #[test]
    fn test_suitable() {
        let families = judge(complete(0, 1), &[], Some(&adequate())).unwrap();
        assert_eq!(
            families,
            QueueFamilies {
                graphics: 0,
                present: 1
            }
        );
    }

    #[test]
    fn test_needs_queues() {
        let indices = QueueFamilyIndices {
            graphics: Some(0),
            present: None,
        };
        assert_eq!(
            judge(indices, &[], Some(&adequate())),
            Err(Unsuitable::QueueFamilies)
        );
    }

    #[test]
    fn test_needs_extensions() {
        let err = judge(complete(0, 0), &[vk::KHR_SWAPCHAIN_NAME], None).unwrap_err();
        assert_eq!(err, Unsuitable::Extensions("VK_KHR_swapchain".to_owned()));
    }

    #[test]
    fn test_needs_swapchain_support() {
        let empty = SwapchainSupport::default();
        assert_eq!(
            judge(complete(0, 0), &[], Some(&empty)),
            Err(Unsuitable::Swapchain)
        );
    }

    #[test]
    fn test_requires_swapchain_extension() {
        assert_eq!(DEVICE_EXTENSIONS, [c"VK_KHR_swapchain"]);
    }
}
