pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod list;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod session;
pub mod ui;

pub use api::{ApiRequest, ApiResponse, AuthApi, HttpTransport, ReqwestTransport};
pub use error::{ApiError, SessionError, StorageError};
pub use interceptor::{AuthenticatedClient, RequestContext};
pub use navigation::{LoginRedirect, Navigator};
pub use session::SessionStore;
