use super::session::{Session, TokenPair};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub phone_number: String,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub otp: String,
}

/// The backend answers login either with the session itself or wrapped in a
/// `{ "data": ... }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Wrapped { data: Session },
    Bare(Session),
}

impl LoginResponse {
    pub fn into_session(self) -> Session {
        match self {
            LoginResponse::Wrapped { data } => data,
            LoginResponse::Bare(session) => session,
        }
    }
}

/// Same envelope tolerance for the refresh endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RefreshResponse {
    Wrapped { data: TokenPair },
    Bare(TokenPair),
}

impl RefreshResponse {
    pub fn into_tokens(self) -> TokenPair {
        match self {
            RefreshResponse::Wrapped { data } => data,
            RefreshResponse::Bare(tokens) => tokens,
        }
    }
}
