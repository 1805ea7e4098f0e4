// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use vktutorial_vulkan::{context::VkContext, device};

#[test]
#[ignore = "requires a Vulkan driver"]
fn context_creation_test() {
    let context = VkContext::new(&[], false).unwrap();
    let physical_devices = unsafe { context.instance.enumerate_physical_devices().unwrap() };
    for pd in physical_devices {
        assert!(!device::device_name(&context, pd).is_empty());
    }
    context.destroy();
}
