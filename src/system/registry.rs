use std::sync::{Mutex, PoisonError};

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;

use super::process::ProcessRecord;
use crate::format::ratio_percent;

/// Something that can enumerate the live process table.
///
/// Records come back in enumeration order; the registry relies on that order
/// to break CPU ties.
pub trait ProcessSource {
    fn enumerate(&mut self) -> Vec<ProcessRecord>;
}

/// Process table read through sysinfo, enumerated in ascending pid order.
pub struct SysinfoProcessSource {
    sys: System,
}

impl Default for SysinfoProcessSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProcessSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        SysinfoProcessSource { sys }
    }
}

impl ProcessSource for SysinfoProcessSource {
    fn enumerate(&mut self) -> Vec<ProcessRecord> {
        self.sys.refresh_memory();
        // Exited processes are dropped by the refresh, so a process that
        // vanishes mid-listing simply produces no record.
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        let total_memory = self.sys.total_memory();
        let mut records: Vec<ProcessRecord> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                ProcessRecord::new(
                    pid.as_u32(),
                    process.name().to_string_lossy(),
                    Some(f64::from(process.cpu_usage())),
                    ratio_percent(process.memory(), total_memory),
                )
            })
            .collect();
        records.sort_by_key(|r| r.pid);
        records
    }
}

/// Trimmed, lowercased filter text; `None` when the filter is blank.
pub fn normalize_filter(filter: &str) -> Option<String> {
    let trimmed = filter.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Stable sort, highest CPU first. Equal readings keep their relative order.
pub fn sort_by_cpu_desc(records: &mut [ProcessRecord]) {
    records.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
}

pub fn filter_by_name(records: Vec<ProcessRecord>, filter: &str) -> Vec<ProcessRecord> {
    match normalize_filter(filter) {
        Some(needle) => records
            .into_iter()
            .filter(|r| r.name_matches(&needle))
            .collect(),
        None => records,
    }
}

/// Sorted, optionally filtered listings of the live process table.
///
/// The source sits behind a mutex: overlapping `list` calls run one after the
/// other and never interleave their enumerate/sort/filter stages.
pub struct ProcessRegistry {
    source: Mutex<Box<dyn ProcessSource + Send>>,
}

impl ProcessRegistry {
    pub fn new(source: impl ProcessSource + Send + 'static) -> Self {
        ProcessRegistry {
            source: Mutex::new(Box::new(source)),
        }
    }

    pub fn system() -> Self {
        Self::new(SysinfoProcessSource::new())
    }

    pub fn list(&self, filter: &str) -> Vec<ProcessRecord> {
        let _span = tracing::debug_span!("registry.list").entered();

        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = source.enumerate();
        let enumerated = records.len();
        sort_by_cpu_desc(&mut records);
        let records = filter_by_name(records, filter);
        drop(source);

        debug!(enumerated, listed = records.len(), "listed processes");
        records
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::system()
    }
}
