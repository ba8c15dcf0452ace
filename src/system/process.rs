use serde::Serialize;

use crate::format::non_negative_percent;

/// Point-in-time view of one OS process. Listings build fresh records; a
/// record is never updated in place.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl ProcessRecord {
    /// Missing readings are passed as `None` and recorded as `0.0`.
    pub fn new(
        pid: u32,
        name: impl Into<String>,
        cpu_percent: Option<f64>,
        memory_percent: Option<f64>,
    ) -> Self {
        ProcessRecord {
            pid,
            name: name.into(),
            cpu_percent: non_negative_percent(cpu_percent.unwrap_or(0.0)),
            memory_percent: non_negative_percent(memory_percent.unwrap_or(0.0)),
        }
    }

    pub fn name_matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}
