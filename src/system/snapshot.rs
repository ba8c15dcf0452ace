use std::time::SystemTime;

use serde::Serialize;

use crate::format::bounded_percent;

/// One point-in-time reading of system-wide resource usage.
///
/// Percentages are rounded to two decimals and clamped into `[0, 100]` when
/// the snapshot is built; the value is never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SystemSnapshot {
    cpu_percent: f64,
    memory_percent: f64,
    disk_percent: f64,
    captured_at: SystemTime,
}

impl SystemSnapshot {
    pub fn new(cpu_percent: f64, memory_percent: f64, disk_percent: f64) -> Self {
        Self::captured(cpu_percent, memory_percent, disk_percent, SystemTime::now())
    }

    pub fn captured(
        cpu_percent: f64,
        memory_percent: f64,
        disk_percent: f64,
        captured_at: SystemTime,
    ) -> Self {
        SystemSnapshot {
            cpu_percent: bounded_percent(cpu_percent),
            memory_percent: bounded_percent(memory_percent),
            disk_percent: bounded_percent(disk_percent),
            captured_at,
        }
    }

    pub fn cpu_percent(&self) -> f64 {
        self.cpu_percent
    }

    pub fn memory_percent(&self) -> f64 {
        self.memory_percent
    }

    pub fn disk_percent(&self) -> f64 {
        self.disk_percent
    }

    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }
}
