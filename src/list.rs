//! Paginated list fetching with a timeout ceiling and latest-wins loading.

use crate::error::{ApiError, Result};
use crate::interceptor::AuthenticatedClient;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_LIST_TIMEOUT_SECS: u64 = 30;

/// Page position expressed the way tables report it: offset of the first row
/// and rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn from_offset(first: u32, rows: u32) -> Self {
        let page_size = if rows == 0 { DEFAULT_PAGE_SIZE } else { rows };
        Self {
            page: first / page_size + 1,
            page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: PageRequest,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new(page: PageRequest) -> Self {
        Self { page, search: None }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// `resource?pageNumber=..&pageSize=..[&search=..]`
    pub fn to_path(&self, resource: &str) -> String {
        let mut path = format!(
            "{}?pageNumber={}&pageSize={}",
            resource.trim_end_matches('/'),
            self.page.page,
            self.page.page_size
        );
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            path.push_str("&search=");
            path.push_str(&urlencoding::encode(search));
        }
        path
    }
}

#[derive(Clone)]
pub struct ListClient {
    client: AuthenticatedClient,
    timeout: Duration,
}

impl ListClient {
    pub fn new(client: AuthenticatedClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetch one page. A request still pending after the timeout counts as
    /// failed.
    pub async fn fetch(&self, resource: &str, query: &ListQuery) -> Result<Value> {
        let path = query.to_path(resource);
        match timeout(self.timeout, self.client.get_json::<Value>(&path)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(path = %path, timeout_secs = self.timeout.as_secs(), "list request timed out");
                Err(ApiError::Timeout)
            }
        }
    }
}

/// Runs at most one list load at a time. Starting a new load aborts the
/// previous one so its response can never be delivered.
pub struct LatestOnly {
    lists: ListClient,
    current: Option<JoinHandle<()>>,
}

impl LatestOnly {
    pub fn new(lists: ListClient) -> Self {
        Self {
            lists,
            current: None,
        }
    }

    /// Start loading `resource`; the receiver yields the result unless a later
    /// load (or drop) cancels this one first, in which case it yields `Err`.
    pub fn load(
        &mut self,
        resource: &str,
        query: ListQuery,
    ) -> oneshot::Receiver<Result<Value>> {
        self.cancel();

        let (tx, rx) = oneshot::channel();
        let lists = self.lists.clone();
        let resource = resource.to_string();
        self.current = Some(tokio::spawn(async move {
            let result = lists.fetch(&resource, &query).await;
            let _ = tx.send(result);
        }));
        rx
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            if !handle.is_finished() {
                tracing::debug!("cancelling superseded list load");
            }
            handle.abort();
        }
    }
}

impl Drop for LatestOnly {
    fn drop(&mut self) {
        self.cancel();
    }
}
