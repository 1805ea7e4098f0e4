// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Queue
//!
//! A queue family only accepts some kinds of commands.  We need one family that can run graphics
//! work and one that can present to our surface.  They are usually, but not necessarily, the same
//! family.

use ash::vk;
use smallvec::SmallVec;

use crate::prelude::*;

/// Queue families the device offers for the work we need.  `None` until a family is found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics: Option<u32>,
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Scan `families` in order.  The first family with the graphics bit and the first family for
    /// which `supports_present` answers true are taken.  Stops as soon as both are known.
    pub fn find<F>(
        families: &[vk::QueueFamilyProperties],
        mut supports_present: F,
    ) -> Result<Self, VulkanError>
    where
        F: FnMut(u32) -> Result<bool, VulkanError>,
    {
        let mut indices = QueueFamilyIndices::default();

        for (i, family) in families.iter().enumerate() {
            if indices.is_complete() {
                break;
            }
            let i = i as u32;

            if indices.graphics.is_none() && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
                indices.graphics = Some(i);
            }
            if indices.present.is_none() && supports_present(i)? {
                indices.present = Some(i);
            }
        }

        Ok(indices)
    }

    /// Query the families of `physical_device` against `surface`.
    pub fn query(
        context: &VkContext,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<Self, VulkanError> {
        let families = unsafe {
            context
                .instance
                .get_physical_device_queue_family_properties(physical_device)
        };
        Self::find(&families, |i| unsafe {
            Ok(context
                .surface_loader
                .get_physical_device_surface_support(physical_device, i, surface)?)
        })
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }

    /// Found families without duplicates.  A family may only appear once in device creation.
    pub fn unique_families(&self) -> SmallVec<u32, 2> {
        let mut unique: SmallVec<u32, 2> = SmallVec::new();
        for index in [self.graphics, self.present].into_iter().flatten() {
            if !unique.contains(&index) {
                unique.push(index);
            }
        }
        unique
    }

    /// One queue per unique family, sharing `priorities`.
    pub fn queue_infos<'a>(&self, priorities: &'a [f32]) -> Vec<vk::DeviceQueueCreateInfo<'a>> {
        self.unique_families()
            .into_iter()
            .map(|index| {
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(index)
                    .queue_priorities(priorities)
            })
            .collect()
    }
}

/// Queue families after they are known to be complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl TryFrom<QueueFamilyIndices> for QueueFamilies {
    type Error = VulkanError;

    fn try_from(indices: QueueFamilyIndices) -> Result<Self, Self::Error> {
        match (indices.graphics, indices.present) {
            (Some(graphics), Some(present)) => Ok(QueueFamilies { graphics, present }),
            _ => Err(VulkanError::NoSuitableDevice),
        }
    }
}

/// Handles to the queues created alongside the logical device.
pub struct Queues {
    pub graphics: vk::Queue,
    pub present: vk::Queue,
    pub families: QueueFamilies,
}

impl Queues {
    pub fn new(device: &ash::Device, families: QueueFamilies) -> Self {
        // NOTE device owns queues.  There is nothing to destroy.
        let graphics = unsafe { device.get_device_queue(families.graphics, 0) };
        let present = unsafe { device.get_device_queue(families.present, 0) };
        Queues {
            graphics,
            present,
            families,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_shared_family() {
        let families = [
            family(vk::QueueFlags::TRANSFER),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE),
        ];
        let indices = QueueFamilyIndices::find(&families, |i| Ok(i == 1)).unwrap();
        assert_eq!(indices.graphics, Some(1));
        assert_eq!(indices.present, Some(1));
        assert!(indices.is_complete());
        assert_eq!(&indices.unique_families()[..], &[1]);
    }

    #[test]
    fn test_first_match_wins() {
        let families = [
            family(vk::QueueFlags::GRAPHICS),
            family(vk::QueueFlags::GRAPHICS),
            family(vk::QueueFlags::COMPUTE),
        ];
        let indices = QueueFamilyIndices::find(&families, |i| Ok(i >= 1)).unwrap();
        assert_eq!(indices.graphics, Some(0));
        assert_eq!(indices.present, Some(1));
        assert_eq!(&indices.unique_families()[..], &[0, 1]);
    }

    #[test]
    fn test_scan_stops_when_complete() {
        let families = [
            family(vk::QueueFlags::GRAPHICS),
            family(vk::QueueFlags::GRAPHICS),
        ];
        let mut asked = Vec::new();
        QueueFamilyIndices::find(&families, |i| {
            asked.push(i);
            Ok(true)
        })
        .unwrap();
        assert_eq!(asked, vec![0]);
    }

    #[test]
    fn test_incomplete() {
        let families = [family(vk::QueueFlags::COMPUTE)];
        let indices = QueueFamilyIndices::find(&families, |_| Ok(true)).unwrap();
        assert!(!indices.is_complete());
        assert!(QueueFamilies::try_from(indices).is_err());
    }

    #[test]
    fn test_present_query_error_propagates() {
        let families = [family(vk::QueueFlags::GRAPHICS)];
        let result =
            QueueFamilyIndices::find(&families, |_| Err(vk::Result::ERROR_SURFACE_LOST_KHR.into()));
        assert!(matches!(
            result,
            Err(VulkanError::Ash(vk::Result::ERROR_SURFACE_LOST_KHR))
        ));
    }

    #[test]
    fn test_queue_infos() {
        let indices = QueueFamilyIndices {
            graphics: Some(2),
            present: Some(0),
        };
        let priorities = [1.0];
        let infos = indices.queue_infos(&priorities);
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].queue_family_index, 2);
        assert_eq!(infos[1].queue_family_index, 0);
        assert_eq!(infos[0].queue_count, 1);
    }
}
