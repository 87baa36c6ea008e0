//! The authenticated request pipeline.
//!
//! Every API call goes through [`AuthenticatedClient::send`]: the bearer token
//! is attached, and a 401 triggers one refresh followed by one replay. When
//! the session cannot be salvaged the client logs out, falling back to a
//! forced logout that needs no network at all.

mod context;

pub use context::RequestContext;

use crate::api::{ApiRequest, ApiResponse, AuthApi, HttpTransport};
use crate::error::{ApiError, Result};
use crate::models::{Session, TokenPair};
use crate::navigation::Navigator;
use crate::session::SessionStore;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

type SharedRefresh = Shared<BoxFuture<'static, Result<TokenPair>>>;

#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    auth: AuthApi,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    // At most one refresh runs at a time; concurrent 401s await this one.
    refresh: Mutex<Option<SharedRefresh>>,
}

impl AuthenticatedClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                auth: AuthApi::new(transport.clone()),
                transport,
                store,
                navigator,
                refresh: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.inner.store
    }

    pub fn auth(&self) -> &AuthApi {
        &self.inner.auth
    }

    /// Send a request through the pipeline.
    ///
    /// A 2xx response is returned as-is; anything else becomes
    /// `ApiError::Status`. On a 401 the session is refreshed and the request
    /// replayed once. If recovery fails the error that started it is
    /// returned, never an error from the cleanup.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let context = RequestContext::new(request.route());
        let outgoing = self.inner.attach(&request, &context)?;
        tracing::debug!(
            method = %outgoing.method,
            route = %context.route,
            authenticated = outgoing.bearer().is_some(),
            "sending request"
        );

        let response = self.inner.transport.send(outgoing.clone()).await?;
        if response.is_success() {
            return Ok(response);
        }
        if response.status != 401 || context.is_refresh_request {
            return Err(response.into_error());
        }

        let rejected = response.into_error();
        self.inner
            .recover(&request, &context, outgoing.bearer(), rejected)
            .await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(ApiRequest::post(path).json(body)?).await?.json()
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(ApiRequest::put(path).json(body)?).await?.json()
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }

    pub async fn send_otp(&self, phone_number: &str) -> Result<()> {
        self.inner.auth.send_otp(phone_number).await
    }

    pub async fn resend_otp(&self, phone_number: &str) -> Result<()> {
        self.inner.auth.resend_otp(phone_number).await
    }

    /// Verify the one-time code and make the returned session current.
    pub async fn login(&self, phone_number: &str, otp: &str) -> Result<Session> {
        let session = self.inner.auth.login(phone_number, otp).await?;
        self.inner
            .store
            .set_current(session.clone())
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        tracing::info!(user_id = %session.id, "logged in");
        Ok(session)
    }

    /// Refresh the token pair now instead of waiting for a 401.
    pub async fn refresh(&self) -> Result<TokenPair> {
        let session = self
            .inner
            .store
            .get_current()
            .filter(Session::is_complete)
            .ok_or_else(|| ApiError::InvalidRequest("Not logged in".to_string()))?;
        self.inner.refresh(session.tokens()).await
    }

    /// Log out on the server, then locally. Falls back to a forced logout if
    /// the server call fails.
    pub async fn logout(&self) {
        let token = self.inner.store.access_token();
        self.inner.end_session(token).await;
    }

    /// Clear the session and go to login without touching the network.
    pub fn force_logout(&self) {
        self.inner.force_logout();
    }
}

impl Inner {
    fn attach(&self, request: &ApiRequest, context: &RequestContext) -> Result<ApiRequest> {
        match self.store.access_token() {
            Some(token) if context.should_attach_token() => request.with_bearer(&token),
            _ => Ok(request.clone()),
        }
    }

    async fn recover(
        self: &Arc<Self>,
        request: &ApiRequest,
        context: &RequestContext,
        sent_token: Option<&str>,
        rejected: ApiError,
    ) -> Result<ApiResponse> {
        let session = match self.store.get_current() {
            Some(session) if session.is_complete() => session,
            session => {
                tracing::info!(route = %context.route, "unauthorized without a refreshable session");
                let token = session
                    .map(|s| s.access_token)
                    .filter(|t| !t.is_empty());
                self.end_session_detached(token).await;
                return Err(rejected);
            }
        };

        // The session changed after this request was sent, so its current
        // token has not been tried yet
        let untried = match sent_token {
            Some(sent) => sent != session.access_token,
            None => context.should_attach_token(),
        };
        if untried {
            tracing::debug!(route = %context.route, "replaying with the current token");
            return self.replay(request, context, &session.access_token).await;
        }

        let fresh = self.refresh(session.tokens()).await?;
        self.replay(request, context, &fresh.access_token).await
    }

    async fn replay(
        &self,
        request: &ApiRequest,
        context: &RequestContext,
        access_token: &str,
    ) -> Result<ApiResponse> {
        let retried = if context.should_attach_token() {
            request.with_bearer(access_token)?
        } else {
            request.clone()
        };
        tracing::debug!(route = %context.route, "replaying request");
        self.transport.send(retried).await?.error_for_status()
    }

    async fn refresh(self: &Arc<Self>, tokens: TokenPair) -> Result<TokenPair> {
        let shared = {
            let mut slot = self.refresh.lock().await;
            match slot.as_ref() {
                Some(in_flight) if in_flight.peek().is_none() => {
                    tracing::debug!("joining in-flight token refresh");
                    in_flight.clone()
                }
                _ => {
                    // Spawned so the refresh and any logout fallback finish
                    // even when every waiting caller is dropped
                    let task = tokio::spawn(Self::run_refresh(self.clone(), tokens));
                    let fresh = task
                        .map(|joined| {
                            joined.unwrap_or_else(|e| {
                                Err(ApiError::Transport(format!("token refresh task failed: {}", e)))
                            })
                        })
                        .boxed()
                        .shared();
                    *slot = Some(fresh.clone());
                    fresh
                }
            }
        };
        shared.await
    }

    async fn run_refresh(inner: Arc<Self>, tokens: TokenPair) -> Result<TokenPair> {
        tracing::info!("access token rejected, refreshing session");
        match inner.auth.refresh_token(&tokens).await {
            Ok(fresh) => {
                match inner
                    .store
                    .update_tokens(fresh.access_token.clone(), fresh.refresh_token.clone())
                {
                    Ok(_) => {
                        tracing::info!("session refreshed");
                        Ok(fresh)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "session ended while refreshing");
                        Err(ApiError::Status {
                            status: 401,
                            message: "Session ended while refreshing".to_string(),
                        })
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, ending session");
                inner.end_session(Some(tokens.access_token)).await;
                Err(e)
            }
        }
    }

    /// [`Inner::end_session`] on its own task, so a dropped caller cannot
    /// leave the session half ended.
    async fn end_session_detached(self: &Arc<Self>, access_token: Option<String>) {
        let inner = self.clone();
        let task = tokio::spawn(async move { inner.end_session(access_token).await });
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "logout task failed");
        }
    }

    /// Graceful logout with forced logout as the fallback. Never fails.
    async fn end_session(&self, access_token: Option<String>) {
        if let Some(token) = access_token {
            match self.auth.logout(&token).await {
                Ok(()) => {
                    tracing::info!("logged out");
                    self.store.clear();
                    self.navigator.redirect_to_login();
                    return;
                }
                Err(e) => tracing::warn!(error = %e, "logout failed, forcing logout"),
            }
        }
        self.force_logout();
    }

    fn force_logout(&self) {
        tracing::info!("forcing logout");
        self.store.clear();
        self.navigator.redirect_to_login();
    }
}
