use serde::{Deserialize, Serialize};

pub const ACTIVITIES_PATH: &str = "activities";
pub const SIGNUP_SEGMENT: &str = "signup";
pub const UNREGISTER_SEGMENT: &str = "unregister";
pub const EMAIL_QUERY_KEY: &str = "email";

/// Success body of the signup and unregister endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Register,
    Unregister,
}

impl MutationKind {
    pub fn action_segment(self) -> &'static str {
        match self {
            Self::Register => SIGNUP_SEGMENT,
            Self::Unregister => UNREGISTER_SEGMENT,
        }
    }
}
