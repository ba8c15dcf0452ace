use std::ops::ControlFlow;
use std::time::Duration;

use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::system::process::ProcessRecord;
use crate::system::registry::ProcessRegistry;
use crate::system::sampler::Sampler;
use crate::system::snapshot::SystemSnapshot;
use crate::system::window::SlidingWindow;

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(2000);

/// One window per metric, written only by the scheduler.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    pub cpu: SlidingWindow<f64>,
    pub memory: SlidingWindow<f64>,
    pub disk: SlidingWindow<f64>,
}

impl MetricSeries {
    pub fn new(capacity: usize) -> Self {
        MetricSeries {
            cpu: SlidingWindow::new(capacity),
            memory: SlidingWindow::new(capacity),
            disk: SlidingWindow::new(capacity),
        }
    }

    pub fn push(&mut self, snapshot: &SystemSnapshot) {
        self.cpu.push(snapshot.cpu_percent());
        self.memory.push(snapshot.memory_percent());
        self.disk.push(snapshot.disk_percent());
    }

    pub fn capacity(&self) -> usize {
        self.cpu.capacity()
    }

    pub fn values(&self) -> SeriesValues {
        SeriesValues {
            cpu: self.cpu.values(),
            memory: self.memory.values(),
            disk: self.disk.values(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesValues {
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub disk: Vec<f64>,
}

/// Everything one tick produced. Chart series and process table always come
/// from the same tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickUpdate {
    pub tick: u64,
    pub snapshot: Option<SystemSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_error: Option<String>,
    pub series: SeriesValues,
    pub processes: Vec<ProcessRecord>,
}

/// Drives periodic sampling and process listing at a fixed period.
pub struct Scheduler {
    period: Duration,
    sampler: Box<dyn Sampler + Send>,
    registry: ProcessRegistry,
    series: MetricSeries,
    ticks: u64,
}

impl Scheduler {
    pub fn new(
        period: Duration,
        capacity: usize,
        sampler: impl Sampler + Send + 'static,
        registry: ProcessRegistry,
    ) -> Self {
        Scheduler {
            // tokio intervals reject a zero period
            period: period.max(Duration::from_millis(1)),
            sampler: Box::new(sampler),
            registry,
            series: MetricSeries::new(capacity),
            ticks: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn series(&self) -> &MetricSeries {
        &self.series
    }

    /// Out-of-band listing, independent of the timer.
    pub fn refresh_processes(&self, filter: &str) -> Vec<ProcessRecord> {
        self.registry.list(filter)
    }

    pub fn tick(&mut self, filter: &str) -> TickUpdate {
        self.ticks += 1;
        let _span = tracing::debug_span!("scheduler.tick", tick = self.ticks).entered();

        let (snapshot, sampling_error) = match self.sampler.sample() {
            Ok(snapshot) => {
                self.series.push(&snapshot);
                (Some(snapshot), None)
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "sampling failed, skipping metric update");
                (None, Some(err.to_string()))
            }
        };

        let processes = self.registry.list(filter);
        debug!(processes = processes.len(), sampled = snapshot.is_some(), "tick complete");

        TickUpdate {
            tick: self.ticks,
            snapshot,
            sampling_error,
            series: self.series.values(),
            processes,
        }
    }

    /// Ticks every period and hands each update to `deliver` until it breaks
    /// or `iterations` updates have been delivered. The first tick fires
    /// immediately.
    pub async fn run<F>(&mut self, filter: &str, iterations: Option<usize>, mut deliver: F)
    where
        F: FnMut(&TickUpdate) -> ControlFlow<()>,
    {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut delivered = 0usize;
        while iterations.is_none_or(|limit| delivered < limit) {
            interval.tick().await;
            let update = self.tick(filter);
            delivered += 1;
            if deliver(&update).is_break() {
                break;
            }
        }
    }
}
