//! User-facing notification sink.
//!
//! The pipeline emits one notification per failed call before propagating the
//! error; the embedding UI supplies the real sink (toast, message bar).

/// Fallback messages used when the server response carries no detail.
pub mod messages {
    pub const SESSION_EXPIRED: &str = "Session expired, please sign in again";
    pub const NO_PERMISSION: &str = "You do not have permission to perform this action";
    pub const BAD_REQUEST: &str = "Invalid request parameters";
    pub const SERVER_ERROR: &str = "Server error";
    pub const NETWORK_FAILURE: &str = "Network connection failed";
}

pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Default sink that logs notifications through `tracing`.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notification = message, "User notification");
    }
}
