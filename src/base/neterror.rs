use thiserror::Error;

/// Errors surfaced by the cookie jar and its storage engines.
///
/// Codes follow Chromium's `net_error_list.h` where a matching entry exists;
/// cookie storage errors use a custom range starting at -10000.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // URL / header errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Invalid header name or value")]
    InvalidHeader,

    // Cookie errors
    #[error("Cookie name prefix requirements not met")]
    CookieInvalidPrefix,
    #[error("Cookie domain is a public suffix")]
    CookiePublicSuffix,
    #[error("Invalid cookie data: {reason}")]
    CookieInvalidData { reason: String },
    #[error("Cookie store I/O failure at {path}: {message}")]
    CookieStoreIo { path: String, message: String },

    #[error("Unknown error code {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::InvalidUrl => -300,
            // Custom codes
            NetError::InvalidHeader => -10000,
            NetError::CookieInvalidPrefix => -10001,
            NetError::CookiePublicSuffix => -10002,
            NetError::CookieInvalidData { .. } => -10003,
            NetError::CookieStoreIo { .. } => -10004,
            NetError::Unknown(code) => *code,
        }
    }

    /// Create an invalid data error.
    pub fn cookie_invalid_data(reason: impl Into<String>) -> Self {
        NetError::CookieInvalidData {
            reason: reason.into(),
        }
    }

    /// Create a storage I/O error for the file at `path`.
    pub fn cookie_store_io(path: impl Into<String>, message: impl Into<String>) -> Self {
        NetError::CookieStoreIo {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a storage engine rather than from input.
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, NetError::CookieStoreIo { .. })
    }
}

/// Only field-less variants can be rebuilt from a code; the rest map to
/// [`NetError::Unknown`].
impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -300 => NetError::InvalidUrl,
            -10000 => NetError::InvalidHeader,
            -10001 => NetError::CookieInvalidPrefix,
            -10002 => NetError::CookiePublicSuffix,
            _ => NetError::Unknown(code),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        NetError::cookie_invalid_data(err.to_string())
    }
}
