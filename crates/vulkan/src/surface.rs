// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Window surfaces.  The platform specific surface extension is picked by ash-window from the
//! window's raw handles.

use ash::vk;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::prelude::*;

pub struct Surface {
    pub surface: vk::SurfaceKHR,
}

impl Surface {
    /// The context must have been created for the same display, see `VkContext::for_display`.
    pub fn new<W>(context: &VkContext, window: &W) -> Result<Self, VulkanError>
    where
        W: HasDisplayHandle + HasWindowHandle,
    {
        let display_handle = window.display_handle()?.as_raw();
        let window_handle = window.window_handle()?.as_raw();

        let surface = unsafe {
            ash_window::create_surface(
                &context.entry,
                &context.instance,
                display_handle,
                window_handle,
                None,
            )?
        };

        Ok(Self { surface })
    }

    pub fn destroy(&self, context: &VkContext) {
        unsafe {
            context.surface_loader.destroy_surface(self.surface, None);
        }
    }
}
