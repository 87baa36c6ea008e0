use colored::*;

/// Where the user is sent once their session can no longer be used.
///
/// Implementations must not fail; this is the last step of forced logout.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Terminal version of the login redirect: tells the user to sign in again.
/// Whatever they were trying to reach is not remembered.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoginRedirect;

impl Navigator for LoginRedirect {
    fn redirect_to_login(&self) {
        eprintln!(
            "{}",
            "Your session has ended. Run `talabia login <phone>` to sign in again.".yellow()
        );
    }
}
