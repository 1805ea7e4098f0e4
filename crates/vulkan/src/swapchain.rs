// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Swap Chain
//!
//! A swap chain exists when we are presenting to a surface.  Creating one is a handful of choices
//! made against what the device and surface support: a surface format, a present mode, an extent
//! and an image count.  Each image gets a view so it could later be used as a color attachment.

use ash::vk;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::prelude::*;
use crate::queue::QueueFamilies;

/// What a physical device can do with a particular surface.
#[derive(Debug, Clone, Default)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub fn query(
        context: &VkContext,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<Self, VulkanError> {
        let loader = &context.surface_loader;
        unsafe {
            Ok(Self {
                capabilities: loader
                    .get_physical_device_surface_capabilities(physical_device, surface)?,
                formats: loader.get_physical_device_surface_formats(physical_device, surface)?,
                present_modes: loader
                    .get_physical_device_surface_present_modes(physical_device, surface)?,
            })
        }
    }

    /// At least one format and one present mode.
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// Prefer 8-bit BGRA sRGB.  Otherwise settle for whatever is offered first.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first())
        .copied()
}

/// Prefer MAILBOX.  FIFO is the one mode every implementation must support.
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    if modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// The surface's current extent, unless the window manager lets us pick, signalled by a width of
/// `u32::MAX`.  Then the framebuffer size is clamped into the supported range.
pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    framebuffer: vk::Extent2D,
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }

    let min = capabilities.min_image_extent;
    let max = capabilities.max_image_extent;
    vk::Extent2D {
        width: framebuffer.width.clamp(min.width, max.width),
        height: framebuffer.height.clamp(min.height, max.height),
    }
}

/// One image more than the minimum so we never wait on the driver to acquire.  A maximum of zero
/// means there is no maximum.
pub fn image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        count.min(capabilities.max_image_count)
    } else {
        count
    }
}

/// Images are shared between families only when graphics and presentation are split.
pub fn sharing_mode(families: &QueueFamilies) -> (vk::SharingMode, SmallVec<u32, 2>) {
    if families.graphics != families.present {
        let mut indices: SmallVec<u32, 2> = SmallVec::new();
        indices.push(families.graphics);
        indices.push(families.present);
        (vk::SharingMode::CONCURRENT, indices)
    } else {
        (vk::SharingMode::EXCLUSIVE, SmallVec::new())
    }
}

pub struct Swapchain {
    pub loader: ash::khr::swapchain::Device,
    pub swapchain: vk::SwapchainKHR,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
    pub format: vk::Format,
    pub extent: vk::Extent2D,
}

impl Swapchain {
    /// Create a swap chain for `surface` and one view per image.  `framebuffer` is the window's
    /// size in pixels, used only when the surface leaves the extent up to us.
    pub fn new(
        context: &VkContext,
        device: &Device,
        surface: vk::SurfaceKHR,
        framebuffer: vk::Extent2D,
    ) -> Result<Self, VulkanError> {
        let support = SwapchainSupport::query(context, device.physical_device, surface)?;
        let surface_format =
            choose_surface_format(&support.formats).ok_or(VulkanError::NoSurfaceFormat)?;
        let present_mode = choose_present_mode(&support.present_modes);
        let extent = choose_extent(&support.capabilities, framebuffer);
        let min_image_count = image_count(&support.capabilities);
        let (sharing, family_indices) = sharing_mode(&device.queues.families);

        info!(
            surface_format = ?surface_format.format,
            color_space = ?surface_format.color_space,
            ?present_mode,
            width = extent.width,
            height = extent.height,
            min_image_count,
            "creating swap chain"
        );

        let swapchain_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface)
            .min_image_count(min_image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(sharing)
            .queue_family_indices(&family_indices)
            .pre_transform(support.capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(vk::SwapchainKHR::null());

        let loader = ash::khr::swapchain::Device::new(&context.instance, &device.device);
        let swapchain = unsafe { loader.create_swapchain(&swapchain_info, None)? };

        let images = match unsafe { loader.get_swapchain_images(swapchain) } {
            Ok(images) => images,
            Err(e) => {
                unsafe { loader.destroy_swapchain(swapchain, None) };
                return Err(e.into());
            }
        };
        debug!(count = images.len(), "swap chain images");

        let image_views = match create_image_views(&device.device, &images, surface_format.format)
        {
            Ok(views) => views,
            Err(e) => {
                unsafe { loader.destroy_swapchain(swapchain, None) };
                return Err(e);
            }
        };

        Ok(Self {
            loader,
            swapchain,
            images,
            image_views,
            format: surface_format.format,
            extent,
        })
    }

    /// Views first.  They reference images owned by the swap chain.
    pub fn destroy(&self, device: &ash::Device) {
        unsafe {
            for view in &self.image_views {
                device.destroy_image_view(*view, None);
            }
            self.loader.destroy_swapchain(self.swapchain, None);
        }
    }
}

fn create_image_views(
    device: &ash::Device,
    images: &[vk::Image],
    format: vk::Format,
) -> Result<Vec<vk::ImageView>, VulkanError> {
    let mut views = Vec::with_capacity(images.len());

    for &image in images {
        let view_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .components(vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            })
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        match unsafe { device.create_image_view(&view_info, None) } {
            Ok(view) => views.push(view),
            Err(e) => {
                // partial destruction
                for view in views {
                    unsafe { device.destroy_image_view(view, None) };
                }
                return Err(e.into());
            }
        }
    }

    Ok(views)
}
