//! sigview-render - render-surface lifecycle
//!
//! Owns the GPU context and the window's swapchain surface: creation,
//! resize-as-reconfigure, frame acquisition with device-loss
//! classification, and presentation.

mod color;
mod gpu;
mod surface;

pub use color::Color;
pub use gpu::{GpuContext, GpuError};
pub use surface::{Frame, FrameError, RenderSurface};
