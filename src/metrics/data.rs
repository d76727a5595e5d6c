//! Data structures for local resource metrics.

use serde::{Deserialize, Serialize};

/// Instantaneous local resource usage.
///
/// `gpu` and `gpu_temp` stay at 0 whenever GPU monitoring is unavailable;
/// `gpu_active` reflects only whether the monitoring subsystem initialized
/// at startup, not per-request query success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Overall CPU usage percentage (0.0 to 100.0)
    pub cpu: f32,
    /// RAM usage percentage (0.0 to 100.0)
    pub ram: f32,
    /// GPU utilization percentage
    pub gpu: u32,
    /// GPU temperature in Celsius
    pub gpu_temp: u32,
    /// Whether GPU monitoring initialized at startup
    pub gpu_active: bool,
}

impl Default for ResourceSnapshot {
    fn default() -> Self {
        Self {
            cpu: 0.0,
            ram: 0.0,
            gpu: 0,
            gpu_temp: 0,
            gpu_active: false,
        }
    }
}
