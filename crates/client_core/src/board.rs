use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::protocol::{MessageResponse, MutationKind};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::{
    error::ClientError,
    markup::build_listing,
    notifier::StatusNotifier,
    view::{StatusKind, UiEvent, View},
    ActivityApi,
};

pub const REJECTED_FALLBACK: &str = "An error occurred";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_FAILED: &str = "Failed to unregister. Please try again.";

fn failure_message(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Register => SIGNUP_FAILED,
        MutationKind::Unregister => UNREGISTER_FAILED,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered { activities: usize },
    Failed,
    /// A newer refresh was issued while this one was in flight.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Succeeded,
    Rejected,
    Failed,
    /// Blank email; nothing was sent.
    Skipped,
}

/// Drives the activity page: loads and renders the list, handles user events
/// and reports their outcome in the status region.
pub struct ActivityBoard {
    api: Arc<dyn ActivityApi>,
    view: Arc<dyn View>,
    notifier: StatusNotifier,
    issued_refreshes: AtomicU64,
    render_gate: Mutex<()>,
}

impl ActivityBoard {
    pub fn new(api: Arc<dyn ActivityApi>, view: Arc<dyn View>) -> Self {
        let notifier = StatusNotifier::new(Arc::clone(&view));
        Self::with_notifier(api, view, notifier)
    }

    pub fn with_notifier(
        api: Arc<dyn ActivityApi>,
        view: Arc<dyn View>,
        notifier: StatusNotifier,
    ) -> Self {
        Self {
            api,
            view,
            notifier,
            issued_refreshes: AtomicU64::new(0),
            render_gate: Mutex::new(()),
        }
    }

    /// Fetches the full collection and replaces the list with it. Results of a
    /// refresh that is no longer the latest issued one are dropped.
    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = self.issued_refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.api.list_activities().await;

        let _gate = self.render_gate.lock().await;
        let latest = self.issued_refreshes.load(Ordering::SeqCst);
        if latest != generation {
            debug!("activities: dropping refresh {generation}, latest is {latest}");
            return RefreshOutcome::Superseded;
        }

        match fetched {
            Ok(collection) => {
                let activities = collection.len();
                self.view.render(build_listing(collection)).await;
                RefreshOutcome::Rendered { activities }
            }
            Err(err) => {
                error!("activities: error fetching activities: {err}");
                self.view.show_load_failure().await;
                RefreshOutcome::Failed
            }
        }
    }

    pub async fn dispatch(&self, event: UiEvent) -> MutationOutcome {
        match event {
            UiEvent::RegisterSubmitted { activity, email } => {
                self.register(&activity, &email).await
            }
            UiEvent::RemoveClicked { activity, email } => self.unregister(&activity, &email).await,
        }
    }

    pub async fn register(&self, activity: &str, email: &str) -> MutationOutcome {
        let email = email.trim();
        if email.is_empty() {
            return MutationOutcome::Skipped;
        }
        let result = self.api.signup(activity, email).await;
        if result.is_ok() {
            self.view.clear_registration_email(activity).await;
        }
        self.report(MutationKind::Register, result).await
    }

    pub async fn unregister(&self, activity: &str, email: &str) -> MutationOutcome {
        let result = self.api.unregister(activity, email).await;
        self.report(MutationKind::Unregister, result).await
    }

    async fn report(
        &self,
        kind: MutationKind,
        result: Result<MessageResponse, ClientError>,
    ) -> MutationOutcome {
        match result {
            Ok(body) => {
                self.notifier.show(&body.message, StatusKind::Success).await;
                self.refresh().await;
                MutationOutcome::Succeeded
            }
            Err(err) if err.is_rejection() => {
                warn!("activities: {kind:?} rejected: {err}");
                let message = err.detail().unwrap_or(REJECTED_FALLBACK);
                self.notifier.show(message, StatusKind::Error).await;
                MutationOutcome::Rejected
            }
            Err(err) => {
                error!("activities: {kind:?} failed: {err}");
                self.notifier
                    .show(failure_message(kind), StatusKind::Error)
                    .await;
                MutationOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
