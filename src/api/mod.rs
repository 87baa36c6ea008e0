pub mod auth;
pub mod client;
pub mod models;

pub use auth::AuthApi;
pub use client::{HttpTransport, ReqwestTransport};
pub use models::{ApiRequest, ApiResponse};
