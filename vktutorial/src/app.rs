// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The winit application.  Vulkan is brought up once the window exists and torn down, in reverse
//! creation order, when the event loop exits.

use ash::vk;
use tracing::{debug, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard as kb,
    window::{Window, WindowId},
};

use vktutorial_assets::AssetDirs;
use vktutorial_vulkan::{
    context::VkContext, device::Device, pipeline::GraphicsPipeline, surface::Surface,
    swapchain::Swapchain,
};

use crate::AppError;
use crate::config::Config;

/// Installation directory for assets, from `package.metadata.vktutorial.asset_dir`.  Only release
/// builds search it.
pub const DEFAULT_ASSET_DIR: Option<&str> = option_env!("VKTUTORIAL_BUILD_ASSETS_DIR");

/// Everything created from the Vulkan instance, in creation order.
struct VulkanState {
    context: VkContext,
    surface: Surface,
    device: Device,
    swapchain: Swapchain,
    pipeline: GraphicsPipeline,
}

impl VulkanState {
    fn new(window: &Window, config: &Config) -> Result<Self, AppError> {
        let context = VkContext::for_display(window, config.validation)?;

        let surface = Surface::new(&context, window).inspect_err(|_| context.destroy())?;

        let device = Device::new(&context, surface.surface).inspect_err(|_| {
            surface.destroy(&context);
            context.destroy();
        })?;

        let size = window.inner_size();
        let framebuffer = vk::Extent2D {
            width: size.width,
            height: size.height,
        };
        let swapchain = Swapchain::new(&context, &device, surface.surface, framebuffer)
            .inspect_err(|_| {
                device.destroy();
                surface.destroy(&context);
                context.destroy();
            })?;

        let assets = AssetDirs::with_default_dir(config.assets_dir.iter(), DEFAULT_ASSET_DIR);
        let pipeline = GraphicsPipeline::new(
            device.device(),
            &assets,
            &config.vertex_shader,
            &config.fragment_shader,
        )
        .inspect_err(|_| {
            swapchain.destroy(device.device());
            device.destroy();
            surface.destroy(&context);
            context.destroy();
        })?;

        info!(
            device = %device.name,
            images = swapchain.images.len(),
            stages = ?pipeline.stages,
            "Vulkan initialized"
        );

        Ok(Self {
            context,
            surface,
            device,
            swapchain,
            pipeline,
        })
    }

    fn destroy(&self) {
        let device = self.device.device();
        self.pipeline.destroy(device);
        self.swapchain.destroy(device);
        self.device.destroy();
        self.surface.destroy(&self.context);
        self.context.destroy();
    }
}

pub struct App {
    config: Config,
    // Vulkan state must be destroyed before the window it presents to.
    vulkan: Option<VulkanState>,
    window: Option<Window>,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: Config) -> Self {
        App {
            config,
            vulkan: None,
            window: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if initialization failed.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);
        let window = event_loop.create_window(attrs)?;

        let vulkan = VulkanState::new(&window, &self.config)?;

        self.vulkan = Some(vulkan);
        self.window = Some(window);
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(vulkan) = self.vulkan.take() {
            debug!("destroying Vulkan objects");
            vulkan.destroy();
        }
        self.window = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Some platforms resume more than once.
        if self.vulkan.is_some() || self.error.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.repeat && event.state == ElementState::Pressed {
                    match event.physical_key {
                        kb::PhysicalKey::Code(kb::KeyCode::KeyQ)
                        | kb::PhysicalKey::Code(kb::KeyCode::Escape) => {
                            event_loop.exit();
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::Resized(size) => {
                // The window is not resizable and the swap chain is never recreated.
                debug!(width = size.width, height = size.height, "window resized");
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_asset_dir_from_manifest() {
        assert_eq!(DEFAULT_ASSET_DIR, Some("../share/vktutorial/assets"));
    }
}
