#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use talabia::error::Result;
use talabia::models::Session;
use talabia::session::{MemorySessionStorage, SessionStore, SESSION_KEY};
use talabia::{ApiRequest, ApiResponse, AuthenticatedClient, HttpTransport, Navigator};

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync;

/// Transport that answers from a closure and remembers every request.
pub struct FakeBackend {
    handler: Box<Handler>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
    route_delays: Vec<(String, Duration)>,
}

impl FakeBackend {
    pub fn new(handler: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delay: None,
            route_delays: Vec::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay only requests to `route`; overrides the global delay.
    pub fn with_route_delay(mut self, route: &str, delay: Duration) -> Self {
        self.route_delays.push((route.to_string(), delay));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, route: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.route() == route)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = self
            .route_delays
            .iter()
            .find(|(route, _)| route == request.route())
            .map(|(_, delay)| *delay)
            .or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(&request)
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn session(access: &str, refresh: &str) -> Session {
    Session {
        id: "user-42".to_string(),
        name: Some("Mona Admin".to_string()),
        phone_number: Some("+966500000000".to_string()),
        email: Some("mona@talabia.test".to_string()),
        image: None,
        role: Some("Admin".to_string()),
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        is_verified: true,
        notifications_enabled: false,
    }
}

pub fn ok(body: serde_json::Value) -> Result<ApiResponse> {
    Ok(ApiResponse::new(200, body.to_string()))
}

pub fn status(code: u16) -> Result<ApiResponse> {
    Ok(ApiResponse::new(code, json!({ "message": format!("status {}", code) }).to_string()))
}

pub fn tokens_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({ "accessToken": access, "refreshToken": refresh })
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub storage: Arc<MemorySessionStorage>,
    pub store: Arc<SessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: AuthenticatedClient,
}

impl Harness {
    pub fn new(backend: FakeBackend, current: Option<Session>) -> Self {
        let storage = Arc::new(match &current {
            Some(s) => MemorySessionStorage::with_value(SESSION_KEY, &serde_json::to_string(s).unwrap()),
            None => MemorySessionStorage::new(),
        });
        let store = Arc::new(SessionStore::new(storage.clone()));
        let backend = Arc::new(backend);
        let navigator = Arc::new(RecordingNavigator::default());
        let client = AuthenticatedClient::new(backend.clone(), store.clone(), navigator.clone());
        Self {
            backend,
            storage,
            store,
            navigator,
            client,
        }
    }
}
