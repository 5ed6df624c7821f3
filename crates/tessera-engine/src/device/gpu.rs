use anyhow::{Context, Result};

use super::GpuInit;

/// Owns the wgpu core objects used to upload and replay draw passes.
///
/// No surface is created: passes render into caller-provided targets.
pub struct Gpu {
    /// Kept alive for the adapter and device.
    _instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a device without a surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let GpuInit { power_preference, required_features, required_limits } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::debug!("headless device on {}", adapter.get_info().name);

        Ok(Self { _instance: instance, adapter, device, queue })
    }

    /// Blocking variant of [`new_headless`](Self::new_headless).
    pub fn new_headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new_headless(init))
    }

    /// Returns information about the selected adapter.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
