// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Vulkan Utils
//!
//! Junk drawer.  Mostly name matching for layers and extensions, which Vulkan hands back as fixed
//! size C character arrays.

use std::ffi::CStr;

use ash::vk;

/// Names of the layers in `props`.  Entries without a terminator are skipped.
pub fn layer_names(props: &[vk::LayerProperties]) -> Vec<&CStr> {
    props
        .iter()
        .filter_map(|p| p.layer_name_as_c_str().ok())
        .collect()
}

/// Names of the extensions in `props`.  Entries without a terminator are skipped.
pub fn extension_names(props: &[vk::ExtensionProperties]) -> Vec<&CStr> {
    props
        .iter()
        .filter_map(|p| p.extension_name_as_c_str().ok())
        .collect()
}

/// Every `required` name that does not appear in `available`, in `required` order.
pub fn missing_names<'a>(required: &[&'a CStr], available: &[&CStr]) -> Vec<&'a CStr> {
    required
        .iter()
        .filter(|name| !available.contains(name))
        .copied()
        .collect()
}

/// Comma separated names for log lines and error messages.
pub fn join_names(names: &[&CStr]) -> String {
    names
        .iter()
        .map(|n| n.to_string_lossy())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_names() {
        let required = [c"VK_KHR_surface", c"VK_EXT_debug_utils", c"VK_KHR_xlib_surface"];
        let available = [c"VK_KHR_xlib_surface", c"VK_KHR_surface"];
        assert_eq!(
            missing_names(&required, &available),
            vec![c"VK_EXT_debug_utils"]
        );
    }

    #[test]
    fn test_nothing_missing() {
        let required = [c"VK_LAYER_KHRONOS_validation"];
        let available = [c"VK_LAYER_MESA_overlay", c"VK_LAYER_KHRONOS_validation"];
        assert!(missing_names(&required, &available).is_empty());
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&[c"a", c"b"]), "a, b");
        assert_eq!(join_names(&[]), "");
    }

    #[test]
    fn test_extension_names() {
        let mut prop = vk::ExtensionProperties::default();
        for (dst, src) in prop
            .extension_name
            .iter_mut()
            .zip(c"VK_KHR_swapchain".to_bytes_with_nul())
        {
            *dst = *src as std::ffi::c_char;
        }
        assert_eq!(extension_names(&[prop]), vec![c"VK_KHR_swapchain"]);
    }
}
