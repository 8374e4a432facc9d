//! GPU context - wgpu initialization
//!
//! One context per process: instance, adapter, device, queue. Created
//! once at startup and passed by reference to whoever needs it; never
//! re-created on resize (only the surface is).

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use wgpu::{
    Adapter, Device, DeviceDescriptor, Features, Instance, InstanceDescriptor, Limits,
    PowerPreference, Queue, RequestAdapterOptions,
};

/// GPU context errors
///
/// These only occur at startup and are unrecoverable there; callers
/// abort rather than retry.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter found (hardware or software)")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    DeviceCreation(String),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(String),
}

/// GPU context holding wgpu device and queue
pub struct GpuContext {
    /// wgpu instance
    pub instance: Instance,
    /// Selected adapter
    pub adapter: Adapter,
    /// Logical device
    pub device: Arc<Device>,
    /// Command queue
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a new GPU context.
    ///
    /// Requests a hardware adapter first; if none is available, falls
    /// back to the software rasterizer before giving up.
    pub async fn new() -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match Self::request_adapter(&instance, false).await {
            Some(adapter) => adapter,
            None => {
                warn!("No hardware adapter available, trying software fallback");
                Self::request_adapter(&instance, true)
                    .await
                    .ok_or(GpuError::NoAdapter)?
            }
        };

        let adapter_info = adapter.get_info();
        info!(
            "GPU adapter: {} ({:?}, {:?})",
            adapter_info.name, adapter_info.backend, adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("sigview GPU Device"),
                    required_features: Features::empty(),
                    required_limits: Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceCreation(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|error| {
            warn!("wgpu error: {}", error);
        }));

        info!("GPU context initialized");

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    async fn request_adapter(instance: &Instance, force_fallback: bool) -> Option<Adapter> {
        instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: force_fallback,
            })
            .await
    }
}
