use crate::api::auth::{AUTH_PREFIX, LOGOUT_PATH, REFRESH_PATH};

/// What the interceptor needs to know about one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub route: String,
    pub is_auth_request: bool,
    pub is_refresh_request: bool,
    pub is_logout_request: bool,
}

impl RequestContext {
    pub fn new(route: &str) -> Self {
        let normalized = format!("/{}", route.trim_start_matches('/'));
        let normalized = normalized.trim_end_matches('/');
        Self {
            route: normalized.to_string(),
            is_auth_request: normalized.starts_with(AUTH_PREFIX),
            is_refresh_request: normalized == REFRESH_PATH,
            is_logout_request: normalized == LOGOUT_PATH,
        }
    }

    /// Auth endpoints stay anonymous, except refresh and logout which must
    /// still identify the caller.
    pub fn should_attach_token(&self) -> bool {
        !self.is_auth_request || self.is_refresh_request || self.is_logout_request
    }
}
