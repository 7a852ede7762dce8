//! Document boundary: everything the board does to the visible page goes
//! through [`View`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::error;

use crate::markup::{ActivityListing, SelectOption, LOADING_HTML, LOAD_FAILURE_HTML};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// User actions resolved against the controls currently on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    RegisterSubmitted { activity: String, email: String },
    RemoveClicked { activity: String, email: String },
}

#[async_trait]
pub trait View: Send + Sync {
    /// Replaces the whole activity list and the whole selection control.
    async fn render(&self, listing: ActivityListing);
    /// Replaces the activity list with the static failure message; the
    /// selection control is left as it was.
    async fn show_load_failure(&self);
    async fn clear_registration_email(&self, activity: &str);
    async fn show_status(&self, message: &str, kind: StatusKind);
    async fn hide_status(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegion {
    pub text: String,
    pub kind: Option<StatusKind>,
    pub hidden: bool,
}

impl Default for StatusRegion {
    fn default() -> Self {
        Self {
            text: String::new(),
            kind: None,
            hidden: true,
        }
    }
}

impl StatusRegion {
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    pub fn visible_message(&self) -> Option<(&str, StatusKind)> {
        match self.kind {
            Some(kind) if !self.hidden => Some((self.text.as_str(), kind)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentState {
    pub list_html: String,
    pub listing: Option<ActivityListing>,
    pub options: Vec<SelectOption>,
    pub options_html: String,
    pub email_inputs: HashMap<String, String>,
    pub status: StatusRegion,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self {
            list_html: LOADING_HTML.to_string(),
            listing: None,
            options: Vec::new(),
            options_html: String::new(),
            email_inputs: HashMap::new(),
            status: StatusRegion::default(),
        }
    }
}

/// In-memory page: the activity list area, the selection control, one email
/// input per registration form and the status region.
#[derive(Default)]
pub struct DocumentView {
    state: Mutex<DocumentState>,
}

impl DocumentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> DocumentState {
        self.state.lock().await.clone()
    }

    pub async fn status(&self) -> StatusRegion {
        self.state.lock().await.status.clone()
    }

    pub async fn email_input(&self, activity: &str) -> Option<String> {
        self.state.lock().await.email_inputs.get(activity).cloned()
    }

    /// Types into the registration form of `activity`. Returns false when no
    /// such form is on the page.
    pub async fn type_email(&self, activity: &str, email: &str) -> bool {
        let mut state = self.state.lock().await;
        match state.email_inputs.get_mut(activity) {
            Some(input) => {
                *input = email.to_string();
                true
            }
            None => false,
        }
    }

    pub async fn submit_registration(&self, activity: &str) -> Option<UiEvent> {
        let state = self.state.lock().await;
        let email = state.email_inputs.get(activity)?;
        Some(UiEvent::RegisterSubmitted {
            activity: activity.to_string(),
            email: email.clone(),
        })
    }

    /// Resolves a click on the removal control for `email` in `activity`.
    /// Controls that are no longer on the page produce nothing.
    pub async fn click_remove(&self, activity: &str, email: &str) -> Option<UiEvent> {
        let state = self.state.lock().await;
        let row = state
            .listing
            .as_ref()?
            .card(activity)?
            .participants
            .iter()
            .find(|row| row.email == email)?;
        Some(UiEvent::RemoveClicked {
            activity: row.activity.clone(),
            email: row.email.clone(),
        })
    }
}

#[async_trait]
impl View for DocumentView {
    async fn render(&self, listing: ActivityListing) {
        let mut state = self.state.lock().await;
        let (list_html, options_html) = match (listing.to_html(), listing.options_html()) {
            (Ok(list_html), Ok(options_html)) => (list_html, options_html),
            (Err(err), _) | (_, Err(err)) => {
                error!("activities: failed to render listing: {err}");
                state.list_html = LOAD_FAILURE_HTML.to_string();
                state.listing = None;
                state.email_inputs.clear();
                return;
            }
        };
        state.list_html = list_html;
        state.options = listing.options.clone();
        state.options_html = options_html;
        state.email_inputs = listing
            .cards
            .iter()
            .map(|card| (card.name.clone(), String::new()))
            .collect();
        state.listing = Some(listing);
    }

    async fn show_load_failure(&self) {
        let mut state = self.state.lock().await;
        state.list_html = LOAD_FAILURE_HTML.to_string();
        state.listing = None;
        state.email_inputs.clear();
    }

    async fn clear_registration_email(&self, activity: &str) {
        if let Some(input) = self.state.lock().await.email_inputs.get_mut(activity) {
            input.clear();
        }
    }

    async fn show_status(&self, message: &str, kind: StatusKind) {
        let mut state = self.state.lock().await;
        state.status = StatusRegion {
            text: message.to_string(),
            kind: Some(kind),
            hidden: false,
        };
    }

    async fn hide_status(&self) {
        self.state.lock().await.status.hidden = true;
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
