use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::debug;

use crate::view::{StatusKind, View};

pub const STATUS_HIDE_DELAY: Duration = Duration::from_secs(5);

/// Shows transient status messages. Every message schedules its own hide
/// timer; a timer only hides the region if no newer message was shown since.
pub struct StatusNotifier {
    view: Arc<dyn View>,
    delay: Duration,
    shown: Arc<Mutex<u64>>,
}

impl StatusNotifier {
    pub fn new(view: Arc<dyn View>) -> Self {
        Self::with_delay(view, STATUS_HIDE_DELAY)
    }

    pub fn with_delay(view: Arc<dyn View>, delay: Duration) -> Self {
        Self {
            view,
            delay,
            shown: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns the hide timer's handle; dropping it does not cancel the timer.
    pub async fn show(&self, message: &str, kind: StatusKind) -> JoinHandle<()> {
        let generation = {
            let mut shown = self.shown.lock().await;
            *shown += 1;
            self.view.show_status(message, kind).await;
            *shown
        };

        let view = Arc::clone(&self.view);
        let shown = Arc::clone(&self.shown);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let current = shown.lock().await;
            if *current == generation {
                view.hide_status().await;
            } else {
                debug!("status: hide timer {generation} superseded by {}", *current);
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;
