use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::ActivityCollection,
    error::ErrorResponse,
    protocol::{MessageResponse, MutationKind, ACTIVITIES_PATH, EMAIL_QUERY_KEY},
};
use tracing::{debug, info, warn};
use url::Url;

mod board;
pub mod error;
pub mod markup;
mod notifier;
pub mod view;

pub use board::{
    ActivityBoard, MutationOutcome, RefreshOutcome, REJECTED_FALLBACK, SIGNUP_FAILED,
    UNREGISTER_FAILED,
};
pub use error::ClientError;
pub use notifier::{StatusNotifier, STATUS_HIDE_DELAY};
pub use view::{DocumentView, StatusKind, UiEvent, View};

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[async_trait]
pub trait ActivityApi: Send + Sync {
    async fn list_activities(&self) -> Result<ActivityCollection>;
    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse>;
    async fn unregister(&self, activity: &str, email: &str) -> Result<MessageResponse>;
}

pub struct HttpActivityApi {
    http: Client,
    base_url: Url,
}

impl HttpActivityApi {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self> {
        let base_url = Url::parse(server_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::UnsupportedBaseUrl(server_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        // URL parsing folds `.`, `..` and their `%2E` spellings into the
        // surrounding path, so such a segment would address another route.
        if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ClientError::UnaddressableSegment((*dots).to_string()));
        }
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ClientError::UnsupportedBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `{base}/activities/{activity}/{signup|unregister}?email={email}` with the
    /// activity encoded as a single path segment.
    pub fn mutation_url(&self, kind: MutationKind, activity: &str, email: &str) -> Result<Url> {
        let mut url = self.endpoint(&[ACTIVITIES_PATH, activity, kind.action_segment()])?;
        url.query_pairs_mut().append_pair(EMAIL_QUERY_KEY, email);
        Ok(url)
    }

    async fn mutate(
        &self,
        kind: MutationKind,
        activity: &str,
        email: &str,
    ) -> Result<MessageResponse> {
        let url = self.mutation_url(kind, activity, email)?;
        let request = match kind {
            MutationKind::Register => self.http.post(url),
            MutationKind::Unregister => self.http.delete(url),
        };
        let res = request.send().await?;
        let body: MessageResponse = read_json(res).await?;
        info!("activities: {kind:?} accepted activity={activity}");
        Ok(body)
    }
}

#[async_trait]
impl ActivityApi for HttpActivityApi {
    async fn list_activities(&self) -> Result<ActivityCollection> {
        let url = self.endpoint(&[ACTIVITIES_PATH])?;
        let res = self.http.get(url).send().await?;
        let collection: ActivityCollection = read_json(res).await?;
        if collection.is_empty() {
            warn!("activities: server returned no activities");
        } else {
            debug!("activities: fetched {} activities", collection.len());
        }
        Ok(collection)
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<MessageResponse> {
        self.mutate(MutationKind::Register, activity, email).await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<MessageResponse> {
        self.mutate(MutationKind::Unregister, activity, email).await
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let bytes = res.bytes().await?;
    if !status.is_success() {
        // A body that is not JSON at all did not come from the API.
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        let detail = serde_json::from_value::<ErrorResponse>(body)
            .ok()
            .and_then(|body| body.detail_message().map(str::to_owned));
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
#[path = "tests/mock_server.rs"]
mod mock_server;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
