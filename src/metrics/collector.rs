//! Resource collection via sysinfo, with optional NVML GPU metrics.

use crate::metrics::data::ResourceSnapshot;
use sysinfo::System;

#[cfg(feature = "gpu")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};

/// Collector for instantaneous CPU/RAM usage and, when available, GPU
/// utilization and temperature.
///
/// The NVML handle is acquired once at construction; a failed init degrades
/// GPU metrics to zero for the lifetime of the process.
pub struct ResourceCollector {
    system: System,
    #[cfg(feature = "gpu")]
    nvml: Option<Nvml>,
}

impl ResourceCollector {
    /// Create a collector, attempting GPU monitoring when compiled in.
    pub fn new() -> Self {
        #[cfg(feature = "gpu")]
        let nvml = match Nvml::init() {
            Ok(nvml) => Some(nvml),
            Err(e) => {
                tracing::warn!("NVML initialization failed, GPU metrics disabled: {e}");
                None
            }
        };

        Self {
            system: Self::primed_system(),
            #[cfg(feature = "gpu")]
            nvml,
        }
    }

    /// Create a collector that never initializes GPU monitoring.
    pub fn without_gpu() -> Self {
        Self {
            system: Self::primed_system(),
            #[cfg(feature = "gpu")]
            nvml: None,
        }
    }

    // First CPU refresh establishes the baseline sysinfo needs for usage
    // deltas, so per-request reads stay non-blocking.
    fn primed_system() -> System {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        system
    }

    /// Whether the GPU monitoring subsystem initialized at startup.
    pub fn gpu_available(&self) -> bool {
        #[cfg(feature = "gpu")]
        {
            self.nvml.is_some()
        }
        #[cfg(not(feature = "gpu"))]
        {
            false
        }
    }

    /// Take an instantaneous resource snapshot.
    ///
    /// Per-request GPU query failures are logged and leave the GPU fields at
    /// zero; they do not affect `gpu_active`.
    pub fn snapshot(&mut self) -> ResourceSnapshot {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu = self.system.global_cpu_usage();
        let total = self.system.total_memory();
        let ram = if total > 0 {
            (self.system.used_memory() as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        let mut snapshot = ResourceSnapshot {
            cpu,
            ram,
            gpu: 0,
            gpu_temp: 0,
            gpu_active: self.gpu_available(),
        };

        #[cfg(feature = "gpu")]
        if let Some(nvml) = &self.nvml {
            match Self::query_gpu(nvml) {
                Ok((gpu, gpu_temp)) => {
                    snapshot.gpu = gpu;
                    snapshot.gpu_temp = gpu_temp;
                }
                Err(e) => tracing::warn!("GPU query failed: {e}"),
            }
        }

        snapshot
    }

    #[cfg(feature = "gpu")]
    fn query_gpu(nvml: &Nvml) -> Result<(u32, u32), nvml_wrapper::error::NvmlError> {
        let device = nvml.device_by_index(0)?;
        let utilization = device.utilization_rates()?.gpu;
        let temperature = device.temperature(TemperatureSensor::Gpu)?;
        Ok((utilization, temperature))
    }
}

impl Default for ResourceCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_sane_percentages() {
        let mut collector = ResourceCollector::without_gpu();
        let snapshot = collector.snapshot();
        assert!(snapshot.cpu >= 0.0 && snapshot.cpu <= 100.0);
        assert!(snapshot.ram >= 0.0 && snapshot.ram <= 100.0);
    }

    #[test]
    fn disabled_gpu_stays_zeroed() {
        let mut collector = ResourceCollector::without_gpu();
        for _ in 0..3 {
            let snapshot = collector.snapshot();
            assert_eq!(snapshot.gpu, 0);
            assert_eq!(snapshot.gpu_temp, 0);
            assert!(!snapshot.gpu_active);
        }
    }
}
