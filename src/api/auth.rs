//! Calls to the `/Auth` resource, including the token refresh exchange.
//!
//! These go straight to the transport. Refresh and logout carry the caller's
//! access token explicitly because the backend identifies the session by it;
//! every other auth call is anonymous.

use super::client::HttpTransport;
use super::models::ApiRequest;
use crate::error::{ApiError, Result};
use crate::models::{LoginRequest, LoginResponse, OtpRequest, RefreshResponse, Session, TokenPair};
use std::sync::Arc;

pub const AUTH_PREFIX: &str = "/Auth/";
pub const SEND_OTP_PATH: &str = "/Auth/send/otp";
pub const RESEND_OTP_PATH: &str = "/Auth/resend/otp";
pub const LOGIN_PATH: &str = "/Auth/login";
pub const REFRESH_PATH: &str = "/Auth/refresh-token";
pub const LOGOUT_PATH: &str = "/Auth/logout";

#[derive(Clone)]
pub struct AuthApi {
    transport: Arc<dyn HttpTransport>,
}

impl AuthApi {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn send_otp(&self, phone_number: &str) -> Result<()> {
        self.post_otp(SEND_OTP_PATH, phone_number).await
    }

    pub async fn resend_otp(&self, phone_number: &str) -> Result<()> {
        self.post_otp(RESEND_OTP_PATH, phone_number).await
    }

    /// Exchange a phone number and one-time code for a session.
    pub async fn login(&self, phone_number: &str, otp: &str) -> Result<Session> {
        let request = ApiRequest::post(LOGIN_PATH).json(&LoginRequest {
            phone_number: phone_number.to_string(),
            otp: otp.to_string(),
        })?;
        let response = self.transport.send(request).await?.error_for_status()?;
        let session = response.json::<LoginResponse>()?.into_session();
        if !session.is_complete() {
            return Err(ApiError::Decode(
                "login response did not include both tokens".to_string(),
            ));
        }
        Ok(session)
    }

    /// Exchange the current pair for a new one. Rejections come back as
    /// `ApiError::Status` exactly as the server sent them.
    pub async fn refresh_token(&self, tokens: &TokenPair) -> Result<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(tokens)?
            .with_bearer(&tokens.access_token)?;
        let response = self.transport.send(request).await?.error_for_status()?;
        let fresh = response.json::<RefreshResponse>()?.into_tokens();
        if !fresh.is_complete() {
            return Err(ApiError::Decode(
                "refresh response did not include both tokens".to_string(),
            ));
        }
        Ok(fresh)
    }

    pub async fn logout(&self, access_token: &str) -> Result<()> {
        let request = ApiRequest::post(LOGOUT_PATH).with_bearer(access_token)?;
        self.transport.send(request).await?.error_for_status()?;
        Ok(())
    }

    async fn post_otp(&self, path: &str, phone_number: &str) -> Result<()> {
        let request = ApiRequest::post(path).json(&OtpRequest {
            phone_number: phone_number.to_string(),
        })?;
        self.transport.send(request).await?.error_for_status()?;
        Ok(())
    }
}
