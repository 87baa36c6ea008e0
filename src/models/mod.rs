mod auth;
mod session;

pub use auth::{LoginRequest, LoginResponse, OtpRequest, RefreshResponse};
pub use session::{Session, TokenPair};
