// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Pipeline
//!
//! Shader bytecode is wrapped in shader modules and plugged into the programmable stages of a
//! graphics pipeline.  Only the layout is created.  There is no render pass to build a pipeline
//! object against, so the pipeline stops here.

use std::ffi::CStr;

use ash::vk;
use smallvec::SmallVec;
use tracing::debug;

use vktutorial_assets::AssetDirs;

use crate::prelude::*;

/// Entry point of both shader stages.
pub const SHADER_ENTRY: &CStr = c"main";

pub fn create_shader_module(
    device: &ash::Device,
    code: &[u32],
) -> Result<vk::ShaderModule, VulkanError> {
    let module_info = vk::ShaderModuleCreateInfo::default().code(code);
    Ok(unsafe { device.create_shader_module(&module_info, None)? })
}

/// Vertex then fragment stage, both entering at `main`.
pub fn stage_infos(
    vertex: vk::ShaderModule,
    fragment: vk::ShaderModule,
) -> [vk::PipelineShaderStageCreateInfo<'static>; 2] {
    [
        vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::VERTEX)
            .module(vertex)
            .name(SHADER_ENTRY),
        vk::PipelineShaderStageCreateInfo::default()
            .stage(vk::ShaderStageFlags::FRAGMENT)
            .module(fragment)
            .name(SHADER_ENTRY),
    ]
}

pub struct GraphicsPipeline {
    pub layout: vk::PipelineLayout,
    /// Stages that were supplied with shader code.
    pub stages: SmallVec<vk::ShaderStageFlags, 2>,
}

impl GraphicsPipeline {
    /// Load the `vertex` and `fragment` shaders by asset name and set up the pipeline as far as it
    /// goes without a render pass.  The shader modules are destroyed before returning.
    pub fn new(
        device: &ash::Device,
        assets: &AssetDirs,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self, VulkanError> {
        let vert_spv = assets.find_shader(vertex)?;
        let frag_spv = assets.find_shader(fragment)?;
        debug!(
            vertex_words = vert_spv.len(),
            fragment_words = frag_spv.len(),
            "loaded shader bytecode"
        );

        let vert_module = create_shader_module(device, &vert_spv)?;
        let frag_module = match create_shader_module(device, &frag_spv) {
            Ok(module) => module,
            Err(e) => {
                unsafe { device.destroy_shader_module(vert_module, None) };
                return Err(e);
            }
        };

        let shader_stages = stage_infos(vert_module, frag_module);
        let stages = shader_stages.iter().map(|s| s.stage).collect();

        let layout_info = vk::PipelineLayoutCreateInfo::default();
        let layout = unsafe { device.create_pipeline_layout(&layout_info, None) };

        // Modules are only needed while a pipeline is being created.
        unsafe {
            device.destroy_shader_module(vert_module, None);
            device.destroy_shader_module(frag_module, None);
        }

        Ok(Self {
            layout: layout?,
            stages,
        })
    }

    pub fn destroy(&self, device: &ash::Device) {
        unsafe {
            device.destroy_pipeline_layout(self.layout, None);
        }
    }
}
