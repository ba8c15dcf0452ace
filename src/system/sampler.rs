use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};
use thiserror::Error;
use tracing::debug;

use super::snapshot::SystemSnapshot;
use crate::format::ratio_percent;

/// A sampling attempt that failed for a transient reason. The caller skips
/// the tick and tries again on the next one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("CPU usage reading is unavailable")]
    CpuUnavailable,
    #[error("memory totals are unavailable")]
    MemoryUnavailable,
    #[error("no mounted filesystem contains {}", .0.display())]
    DiskNotFound(PathBuf),
    #[error("filesystem mounted at {} reports no capacity", .0.display())]
    DiskUnavailable(PathBuf),
}

impl SamplingError {
    pub fn is_retryable(&self) -> bool {
        true
    }
}

pub trait Sampler {
    fn sample(&mut self) -> Result<SystemSnapshot, SamplingError>;
}

/// Space figures for one mounted filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskSpace {
    pub mount_point: PathBuf,
    pub total: u64,
    pub available: u64,
}

/// Usage of the filesystem holding `target`: the mount whose mount point is
/// the longest prefix of the path.
pub fn disk_usage_for(target: &Path, disks: &[DiskSpace]) -> Result<f64, SamplingError> {
    let disk = disks
        .iter()
        .filter(|d| target.starts_with(&d.mount_point))
        .max_by_key(|d| d.mount_point.components().count())
        .ok_or_else(|| SamplingError::DiskNotFound(target.to_path_buf()))?;

    let used = disk.total.saturating_sub(disk.available);
    ratio_percent(used, disk.total)
        .ok_or_else(|| SamplingError::DiskUnavailable(disk.mount_point.clone()))
}

/// Reads system-wide CPU, memory and disk utilization through sysinfo.
pub struct SystemSampler {
    sys: System,
    disk_path: PathBuf,
}

impl SystemSampler {
    pub fn new(disk_path: impl Into<PathBuf>) -> Self {
        let mut sys = System::new();
        // CPU usage is a delta between two refreshes; take the baseline now.
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        SystemSampler {
            sys,
            disk_path: disk_path.into(),
        }
    }

    fn read_cpu(&mut self) -> Result<f64, SamplingError> {
        self.sys.refresh_cpu_usage();
        let usage = f64::from(self.sys.global_cpu_usage());
        if usage.is_finite() {
            Ok(usage)
        } else {
            Err(SamplingError::CpuUnavailable)
        }
    }

    fn read_memory(&mut self) -> Result<f64, SamplingError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let used = total.saturating_sub(self.sys.available_memory());
        ratio_percent(used, total).ok_or(SamplingError::MemoryUnavailable)
    }

    fn read_disk(&self) -> Result<f64, SamplingError> {
        let disks = Disks::new_with_refreshed_list();
        let spaces: Vec<DiskSpace> = disks
            .list()
            .iter()
            .map(|d| DiskSpace {
                mount_point: d.mount_point().to_path_buf(),
                total: d.total_space(),
                available: d.available_space(),
            })
            .collect();
        disk_usage_for(&self.disk_path, &spaces)
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Sampler for SystemSampler {
    fn sample(&mut self) -> Result<SystemSnapshot, SamplingError> {
        let _span = tracing::debug_span!("sampler.sample").entered();

        let cpu = self.read_cpu()?;
        let memory = self.read_memory()?;
        let disk = self.read_disk()?;
        let snapshot = SystemSnapshot::new(cpu, memory, disk);
        debug!(
            cpu = snapshot.cpu_percent(),
            memory = snapshot.memory_percent(),
            disk = snapshot.disk_percent(),
            "sampled"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(mount: &str, total: u64, available: u64) -> DiskSpace {
        DiskSpace {
            mount_point: PathBuf::from(mount),
            total,
            available,
        }
    }

    #[test]
    fn picks_the_most_specific_mount() {
        let disks = vec![space("/", 1000, 500), space("/home", 200, 150)];
        let usage = disk_usage_for(Path::new("/home/user"), &disks).unwrap();
        assert_eq!(usage, 25.0);
        let usage = disk_usage_for(Path::new("/var/log"), &disks).unwrap();
        assert_eq!(usage, 50.0);
    }

    #[test]
    fn mount_prefix_is_matched_by_component() {
        let disks = vec![space("/", 100, 100), space("/home", 100, 0)];
        let usage = disk_usage_for(Path::new("/homework"), &disks).unwrap();
        assert_eq!(usage, 0.0);
    }

    #[test]
    fn missing_mount_is_reported() {
        let disks = vec![space("/data", 100, 50)];
        let err = disk_usage_for(Path::new("/"), &disks).unwrap_err();
        assert_eq!(err, SamplingError::DiskNotFound(PathBuf::from("/")));
        assert!(err.is_retryable());
    }

    #[test]
    fn zero_capacity_mount_is_unavailable() {
        let disks = vec![space("/", 0, 0)];
        let err = disk_usage_for(Path::new("/"), &disks).unwrap_err();
        assert_eq!(err, SamplingError::DiskUnavailable(PathBuf::from("/")));
    }

    #[test]
    fn live_sample_stays_in_range() {
        let mut sampler = SystemSampler::default();
        // Root may be missing from the mount list in some sandboxes.
        if let Ok(snapshot) = sampler.sample() {
            for v in [
                snapshot.cpu_percent(),
                snapshot.memory_percent(),
                snapshot.disk_percent(),
            ] {
                assert!((0.0..=100.0).contains(&v));
            }
        }
    }
}
