// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context
//!
//! The entry, instance and, when validation is on, the debug messenger are encapsulated by
//! `VkContext`.  Everything after this point (surfaces, devices) is created from the instance and
//! must be destroyed before it.

use std::ffi::{CStr, c_char, c_void};

use ash::vk;
use smallvec::SmallVec;
use tracing::{debug, error, info, trace, warn};

use crate::prelude::*;
use crate::util;

pub const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Layers enabled on both the instance and the device when validation is requested.
pub const VALIDATION_LAYERS: [&CStr; 1] = [VALIDATION_LAYER];

pub const APPLICATION_NAME: &CStr = c"Hello Triangle";
pub const ENGINE_NAME: &CStr = c"No Engine";

pub struct VkContext {
    pub entry: ash::Entry,
    pub instance: ash::Instance,
    /// Used to access surface query and destruction functions
    pub surface_loader: ash::khr::surface::Instance,

    debug: Option<DebugMessenger>,
    validation: bool,
}

struct DebugMessenger {
    loader: ash::ext::debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl VkContext {
    /// Load Vulkan and create an instance with `window_extensions` enabled.
    ///
    /// With `validation`, the Khronos validation layer and a debug messenger are enabled.  Messages
    /// emitted during instance creation and destruction are also captured.
    pub fn new(window_extensions: &[&CStr], validation: bool) -> Result<Self, VulkanError> {
        let entry = unsafe { ash::Entry::load()? };

        if validation {
            check_validation_layer_support(&entry)?;
        }

        let available_props = unsafe { entry.enumerate_instance_extension_properties(None)? };
        let available = util::extension_names(&available_props);
        debug!("available extensions:");
        for name in &available {
            debug!("\t{}", name.to_string_lossy());
        }

        let mut required: SmallVec<&CStr, 8> = window_extensions.iter().copied().collect();
        if validation {
            required.push(vk::EXT_DEBUG_UTILS_NAME);
        }

        let missing = util::missing_names(&required, &available);
        if !missing.is_empty() {
            return Err(VulkanError::MissingExtensions(util::join_names(&missing)));
        }
        info!("enabled extensions: {}", util::join_names(&required));

        let extension_ptrs: SmallVec<*const c_char, 8> =
            required.iter().map(|name| name.as_ptr()).collect();
        let layer_ptrs: SmallVec<*const c_char, 1> = if validation {
            VALIDATION_LAYERS.iter().map(|name| name.as_ptr()).collect()
        } else {
            SmallVec::new()
        };

        let app_info = vk::ApplicationInfo::default()
            .application_name(APPLICATION_NAME)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let mut debug_info = debug_messenger_info();
        let mut create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);
        if validation {
            create_info = create_info.push_next(&mut debug_info);
        }

        let instance = unsafe { entry.create_instance(&create_info, None)? };

        let debug = if validation {
            let loader = ash::ext::debug_utils::Instance::new(&entry, &instance);
            match unsafe { loader.create_debug_utils_messenger(&debug_info, None) } {
                Ok(messenger) => Some(DebugMessenger { loader, messenger }),
                Err(e) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);

        Ok(Self {
            entry,
            instance,
            surface_loader,
            debug,
            validation,
        })
    }

    /// Create a context whose instance can present to windows on `display`.
    #[cfg(feature = "window")]
    pub fn for_display(
        display: &impl raw_window_handle::HasDisplayHandle,
        validation: bool,
    ) -> Result<Self, VulkanError> {
        let raw = display.display_handle()?.as_raw();
        let window_exts = ash_window::enumerate_required_extensions(raw)?;
        // ash-window hands back pointers to static, nul terminated extension names.
        let window_exts: SmallVec<&CStr, 4> = window_exts
            .iter()
            .map(|&ptr| unsafe { CStr::from_ptr(ptr) })
            .collect();
        Self::new(&window_exts, validation)
    }

    pub fn validation(&self) -> bool {
        self.validation
    }

    /// Layers to request on the device, mirroring the instance.
    pub fn device_layers(&self) -> &'static [&'static CStr] {
        if self.validation {
            &VALIDATION_LAYERS
        } else {
            &[]
        }
    }

    /// Destroy the messenger and instance.  Every object created from the instance must already be
    /// gone.
    // XXX in reality, this consumes the context, but ownership friction needs worked out.
    pub fn destroy(&self) {
        unsafe {
            if let Some(debug) = &self.debug {
                debug
                    .loader
                    .destroy_debug_utils_messenger(debug.messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

fn check_validation_layer_support(entry: &ash::Entry) -> Result<(), VulkanError> {
    let props = unsafe { entry.enumerate_instance_layer_properties()? };
    let available = util::layer_names(&props);
    let missing = util::missing_names(&VALIDATION_LAYERS, &available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(VulkanError::MissingLayers(util::join_names(&missing)))
    }
}

fn debug_messenger_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(vulkan_debug_callback))
}

/// Forward validation messages into tracing.  Never aborts the triggering call.
unsafe extern "system" fn vulkan_debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    kind: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let message = unsafe { data.as_ref() }
        .filter(|d| !d.p_message.is_null())
        .map(|d| unsafe { CStr::from_ptr(d.p_message) }.to_string_lossy())
        .unwrap_or_default();

    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        error!("validation layer ({kind:?}): {message}");
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        warn!("validation layer ({kind:?}): {message}");
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        debug!("validation layer ({kind:?}): {message}");
    } else {
        trace!("validation layer ({kind:?}): {message}");
    }

    vk::FALSE
}
