//! Render surface - swapchain and back-buffer lifecycle
//!
//! Wraps the window's wgpu surface. Resize rebuilds the swapchain
//! configuration in place (never patches the old one); frame
//! acquisition classifies failures into the occluded / outdated /
//! device-lost taxonomy the frame loop acts on.

use crate::color::Color;
use crate::gpu::{GpuContext, GpuError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use wgpu::{
    CommandEncoder, Device, Queue, Surface, SurfaceConfiguration, SurfaceTexture, TextureFormat,
    TextureUsages, TextureView,
};
use winit::window::Window;

/// Frame acquisition failure, classified for the frame loop
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The surface is not visible or acquisition timed out; idle
    /// briefly and retry. Never terminates the loop.
    #[error("surface occluded, frame skipped")]
    Occluded,

    /// The surface no longer matches the window (resize race);
    /// reconfigure at the current size and skip this frame.
    #[error("surface outdated, reconfigure required")]
    Outdated,

    /// The device is gone. Unrecoverable without full device
    /// re-creation, which this design does not attempt.
    #[error("GPU device lost: {0}")]
    DeviceLost(String),
}

impl FrameError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FrameError::DeviceLost(_))
    }
}

// Minimized windows report zero; swapchain dimensions must be >= 1
fn clamped(width: u32, height: u32) -> (u32, u32) {
    (width.max(1), height.max(1))
}

fn classify(err: wgpu::SurfaceError) -> FrameError {
    match err {
        wgpu::SurfaceError::Timeout => FrameError::Occluded,
        wgpu::SurfaceError::Outdated => FrameError::Outdated,
        wgpu::SurfaceError::Lost => FrameError::DeviceLost("surface lost".into()),
        wgpu::SurfaceError::OutOfMemory => FrameError::DeviceLost("out of memory".into()),
        wgpu::SurfaceError::Other => FrameError::DeviceLost("internal driver error".into()),
    }
}

/// Render surface for a window
///
/// Owned exclusively by the frame loop thread. The surface
/// configuration is valid from creation until drop; every resize
/// replaces it wholesale.
pub struct RenderSurface {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    format: TextureFormat,
    device: Arc<Device>,
    queue: Arc<Queue>,
    width: u32,
    height: u32,
}

impl RenderSurface {
    /// Create the surface for a window at the given pixel dimensions.
    ///
    /// Failure here is a startup misconfiguration; callers abort
    /// rather than retry.
    pub fn new(
        gpu: &GpuContext,
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        info!("Creating render surface ({}x{})", width, height);

        let surface = gpu
            .instance
            .create_surface(window)
            .map_err(|e| GpuError::SurfaceCreation(e.to_string()))?;

        let caps = surface.get_capabilities(&gpu.adapter);

        // Prefer sRGB for correct color
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        debug!("Surface format: {:?}", format);

        let (width, height) = clamped(width, height);
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };

        surface.configure(&gpu.device, &config);

        Ok(Self {
            surface,
            width: config.width,
            height: config.height,
            config,
            format,
            device: gpu.device.clone(),
            queue: gpu.queue.clone(),
        })
    }

    /// Rebuild the swapchain configuration for new window dimensions.
    ///
    /// Dimensions are clamped to at least 1 (minimized windows report
    /// zero). The old configuration is dropped wholesale.
    pub fn resize(&mut self, width: u32, height: u32) {
        (self.width, self.height) = clamped(width, height);
        self.config.width = self.width;
        self.config.height = self.height;

        self.surface.configure(&self.device, &self.config);

        debug!("Surface resized to {}x{}", self.width, self.height);
    }

    /// Re-apply the current configuration after an `Outdated` frame.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Current pixel dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texture format of the back buffer
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Acquire the current back buffer for drawing.
    pub fn acquire(&mut self) -> Result<Frame, FrameError> {
        let output = self.surface.get_current_texture().map_err(classify)?;

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        Ok(Frame {
            output,
            view,
            encoder,
            queue: self.queue.clone(),
        })
    }
}

/// A frame being rendered
pub struct Frame {
    output: SurfaceTexture,
    /// Texture view of the back buffer
    pub view: TextureView,
    /// Command encoder for this frame's work
    pub encoder: CommandEncoder,
    queue: Arc<Queue>,
}

impl Frame {
    /// Begin the frame's render pass, clearing to `background`.
    ///
    /// The pass borrows nothing from the frame once returned, so
    /// external renderers can record into it freely.
    pub fn pass(&mut self, background: Color) -> wgpu::RenderPass<'static> {
        self.encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime()
    }

    /// Submit recorded work and present the back buffer.
    ///
    /// Blocks until the frame is queued; returns before the next
    /// loop step proceeds.
    pub fn present(self) {
        self.queue.submit(std::iter::once(self.encoder.finish()));
        self.output.present();
    }
}
