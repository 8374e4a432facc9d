//! Application shell - event bridge and frame loop
//!
//! Single-threaded, cooperative loop:
//! 1. winit drains pending native events; pointer/keyboard/text are
//!    forwarded opaquely to the GUI input bridge
//! 2. each redraw takes the accumulated input batch exactly once,
//!    declares the GUI, then clears + rasterizes + presents
//! 3. quit and device loss are observed at the loop boundary, never
//!    mid-frame; teardown runs once, consumers before producers

use crate::lifecycle::Lifecycle;
use anyhow::Context as _;
use sigview_model::SignalTable;
use sigview_render::{Color, FrameError, GpuContext, RenderSurface};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;

/// Idle delay while the window is occluded (minimized, fully hidden)
const OCCLUDED_IDLE: Duration = Duration::from_millis(10);

/// Everything created once the window exists.
///
/// Dropped as a unit in `exiting`, GUI renderer first and window
/// last, so no consumer outlives its producer.
struct Gfx {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: RenderSurface,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Application state for the winit run loop
pub struct App {
    gfx: Option<Gfx>,
    table: SignalTable,
    lifecycle: Lifecycle,
    occluded: bool,
    panel_open: bool,
    startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new() -> Self {
        Self {
            gfx: None,
            table: SignalTable::default(),
            lifecycle: Lifecycle::new(),
            occluded: false,
            panel_open: true,
            startup_error: None,
        }
    }

    /// Resolve the loop outcome after the event loop returns.
    ///
    /// A failure stored during startup becomes the run's error, so
    /// the process exits non-zero instead of looking like a normal
    /// shutdown.
    fn into_result(self) -> anyhow::Result<()> {
        match self.startup_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Create window, GPU context, surface and GUI stack.
    ///
    /// Any failure here is a startup misconfiguration and aborts the
    /// run; nothing is retried.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Gfx> {
        let attrs = WindowAttributes::default()
            .with_title("Signal Table Configurator")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("window creation failed")?,
        );

        let gpu = pollster::block_on(GpuContext::new()).context("GPU initialization failed")?;

        let size = window.inner_size();
        let surface = RenderSurface::new(&gpu, window.clone(), size.width, size.height)
            .context("surface creation failed")?;

        let egui_ctx = egui::Context::default();
        sigview_ui::install_fonts(&egui_ctx, Path::new(sigview_ui::DEFAULT_FONT_FILE));

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let renderer = egui_wgpu::Renderer::new(&gpu.device, surface.format(), None, 1, false);

        info!("Rendering initialized: {}x{}", size.width, size.height);

        Ok(Gfx {
            window,
            gpu,
            surface,
            egui_ctx,
            egui_state,
            renderer,
        })
    }

    /// One frame: input batch, GUI declaration, clear + draw, present.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.lifecycle.is_running() {
            return;
        }
        if self.occluded {
            std::thread::sleep(OCCLUDED_IDLE);
            return;
        }
        let Some(gfx) = &mut self.gfx else {
            return;
        };

        // Acquire before declaring the GUI: texture deltas produced
        // by a pass are one-shot, so a pass must never run for a
        // frame that cannot render
        let mut frame = match gfx.surface.acquire() {
            Ok(frame) => frame,
            Err(FrameError::Occluded) => {
                std::thread::sleep(OCCLUDED_IDLE);
                return;
            }
            Err(FrameError::Outdated) => {
                debug!("Surface outdated, reconfiguring");
                gfx.surface.reconfigure();
                return;
            }
            Err(err @ FrameError::DeviceLost(_)) => {
                fatal_device_loss(&mut self.lifecycle, event_loop, &err);
                return;
            }
        };

        // Input batch boundary: everything drained since the last
        // frame, taken exactly once, even if empty
        let raw_input = gfx.egui_state.take_egui_input(&gfx.window);
        gfx.egui_ctx.begin_pass(raw_input);
        sigview_ui::signal_panel(&gfx.egui_ctx, &mut self.table, &mut self.panel_open);
        let full_output = gfx.egui_ctx.end_pass();
        gfx.egui_state
            .handle_platform_output(&gfx.window, full_output.platform_output);

        let primitives = gfx
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gfx.surface.dimensions();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            gfx.renderer
                .update_texture(&gfx.gpu.device, &gfx.gpu.queue, *id, delta);
        }
        gfx.renderer.update_buffers(
            &gfx.gpu.device,
            &gfx.gpu.queue,
            &mut frame.encoder,
            &primitives,
            &screen,
        );

        {
            let mut pass = frame.pass(Color::BACKGROUND);
            gfx.renderer.render(&mut pass, &primitives, &screen);
        }

        for id in &full_output.textures_delta.free {
            gfx.renderer.free_texture(id);
        }

        frame.present();
    }
}

/// Fatal path: one modal notification, then end the loop.
fn fatal_device_loss(lifecycle: &mut Lifecycle, event_loop: &ActiveEventLoop, err: &FrameError) {
    if lifecycle.begin_shutdown() {
        error!("Fatal: {err}");
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Fatal error")
            .set_description(format!(
                "The GPU device was lost ({err}). The application will close."
            ))
            .show();
    }
    event_loop.exit();
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(gfx) => self.gfx = Some(gfx),
            Err(err) => {
                error!("Startup failed: {err:#}");
                self.startup_error = Some(err);
                self.lifecycle.begin_shutdown();
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Opaque forwarding first: the GUI bridge coalesces pointer,
        // keyboard and text events into the next frame's input batch
        // (it also tracks pixel size and scale from resize events)
        if let Some(gfx) = &mut self.gfx {
            let _ = gfx.egui_state.on_window_event(&gfx.window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Quit requested");
                self.lifecycle.begin_shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width > 0 && height > 0 {
                    debug!("Window resized: {}x{}", width, height);
                    if let Some(gfx) = &mut self.gfx {
                        gfx.surface.resize(width, height);
                    }
                }
            }

            WindowEvent::Occluded(occluded) => {
                debug!("Window occluded: {}", occluded);
                self.occluded = occluded;
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Immediate-mode GUI: render continuously while running
        if self.lifecycle.is_running() {
            if let Some(gfx) = &self.gfx {
                gfx.window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = self.gfx.take() {
            // Consumers before producers
            drop(gfx.renderer);
            drop(gfx.egui_state);
            drop(gfx.egui_ctx);
            drop(gfx.surface);
            drop(gfx.gpu);
            drop(gfx.window);
        }
        if self.lifecycle.finish() {
            info!("Teardown complete");
        }
    }
}

/// Run the application to completion.
pub fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    app.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_initial_state() {
        let app = App::new();

        assert!(app.gfx.is_none());
        assert!(app.lifecycle.is_running());
        assert!(!app.occluded);
        assert!(app.panel_open);
        assert_eq!(app.table, SignalTable::default());
    }

    #[test]
    fn test_normal_shutdown_is_ok() {
        let mut app = App::new();
        app.lifecycle.begin_shutdown();
        app.lifecycle.finish();

        assert!(app.into_result().is_ok());
    }

    #[test]
    fn test_startup_failure_propagates_out_of_run() {
        // A failed init must surface as the run's error, not a clean
        // exit that is indistinguishable from a normal shutdown.
        let mut app = App::new();
        app.startup_error = Some(anyhow::anyhow!("GPU initialization failed"));
        app.lifecycle.begin_shutdown();
        app.lifecycle.finish();

        let result = app.into_result();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("GPU initialization failed"));
    }

    #[test]
    fn test_occlusion_does_not_shut_down() {
        let mut app = App::new();

        // Occlusion only toggles the idle flag; the loop state is
        // untouched on both edges.
        app.occluded = true;
        assert!(app.lifecycle.is_running());
        app.occluded = false;
        assert!(app.lifecycle.is_running());
    }

    #[test]
    fn test_device_loss_then_teardown_is_single_shot() {
        let mut app = App::new();

        // First loss transitions (and would notify); repeats must not
        assert!(app.lifecycle.begin_shutdown());
        assert!(!app.lifecycle.begin_shutdown());
        assert!(app.lifecycle.finish());
        assert!(!app.lifecycle.finish());
    }
}
