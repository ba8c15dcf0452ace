use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// One sampling period elapsed.
    Tick,
    Resize,
}

/// Terminal input and the sampling clock on one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    pump: JoinHandle<()>,
}

impl EventHandler {
    /// The first `Tick` arrives one `period` from now; startup has already
    /// applied a tick of its own.
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(pump(tx, period));
        Self { rx, pump }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump(tx: UnboundedSender<Event>, period: Duration) {
    let mut input = EventStream::new();
    let mut clock = tokio::time::interval_at(Instant::now() + period, period);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            read = input.next() => match read {
                Some(Ok(raw)) => translate(raw),
                Some(Err(err)) => {
                    warn!(error = %err, "terminal input failed");
                    return;
                }
                None => return,
            },
            _ = clock.tick() => Some(Event::Tick),
        };

        // receiver gone: the UI loop has exited
        if let Some(event) = event
            && tx.send(event).is_err()
        {
            return;
        }
    }
}

/// Keeps the terminal events the UI reacts to; mouse, focus and paste are
/// dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}
