//! Classification of raw probe outcomes
//!
//! A raw outcome is either an HTTP status line such as `"200 OK"` or a
//! transport error description. Classification is pure: the same input
//! always yields the same [`Classification`].

/// Reported in place of any transport error that was a timeout.
pub const TIMEOUT_TEXT: &str = "Request timeout exceeded";

/// Reported in place of any transport error caused by name resolution.
pub const NO_SUCH_HOST_TEXT: &str = "No such host";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    Redirect,
    ClientOrServerError,
    TransportFailure,
}

impl StatusCategory {
    pub fn is_available(self) -> bool {
        matches!(self, StatusCategory::Success | StatusCategory::Redirect)
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCategory::Success => write!(f, "SUCCESS"),
            StatusCategory::Redirect => write!(f, "REDIRECT"),
            StatusCategory::ClientOrServerError => write!(f, "HTTP_ERROR"),
            StatusCategory::TransportFailure => write!(f, "TRANSPORT_FAILURE"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub is_available: bool,
    pub category: StatusCategory,
    pub text: String,
}

/// Classify a raw status line or transport error description.
pub fn classify(raw: &str) -> Classification {
    let category = if raw.starts_with('2') {
        StatusCategory::Success
    } else if raw.starts_with('3') {
        StatusCategory::Redirect
    } else if raw.starts_with('4') || raw.starts_with('5') {
        StatusCategory::ClientOrServerError
    } else {
        StatusCategory::TransportFailure
    };

    let text = match category {
        StatusCategory::TransportFailure => normalize_transport_error(raw),
        _ => raw.to_string(),
    };

    Classification {
        is_available: category.is_available(),
        category,
        text,
    }
}

/// Collapse timeout and name-resolution failures into fixed messages.
/// Anything else passes through untouched.
pub fn normalize_transport_error(message: &str) -> String {
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("timed out") {
        TIMEOUT_TEXT.to_string()
    } else if lowered.contains("no such host")
        || lowered.contains("dns error")
        || lowered.contains("failed to lookup address")
        || lowered.contains("name or service not known")
    {
        NO_SUCH_HOST_TEXT.to_string()
    } else {
        message.to_string()
    }
}
