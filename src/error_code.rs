//! 错误分类：将 HTTP 状态码映射为稳定的错误类别。
//!
//! HTTP status classification for structured API errors.
//!
//! Every status code maps to at most one [`ErrorClass`]. The specific classes
//! (404, 401, 403, 429) take precedence over the generic client bucket, and
//! 2xx/3xx (or anything outside 400..=599) map to no class at all.
//!
//! ## Classes
//!
//! | Status        | Class            | Retryable |
//! |---------------|------------------|-----------|
//! | 401           | `Unauthorized`   | no        |
//! | 403           | `Forbidden`      | no        |
//! | 404           | `NotFound`       | no        |
//! | 429           | `RateLimited`    | yes       |
//! | other 4xx     | `InvalidRequest` | no        |
//! | 5xx           | `Internal`       | yes       |
//!
//! ## Example
//!
//! ```rust
//! use opencode_sdk::error_code::ErrorClass;
//!
//! assert_eq!(ErrorClass::from_http_status(404), Some(ErrorClass::NotFound));
//! assert_eq!(ErrorClass::from_http_status(418), Some(ErrorClass::InvalidRequest));
//! assert_eq!(ErrorClass::from_http_status(204), None);
//! assert!(ErrorClass::RateLimited.retryable());
//! ```

use std::fmt;

/// Sentinel classification of a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// 404
    NotFound,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 429
    RateLimited,
    /// Any other 4xx
    InvalidRequest,
    /// Any 5xx
    Internal,
}

impl ErrorClass {
    /// All classes, in precedence order.
    pub const ALL: [ErrorClass; 6] = [
        Self::NotFound,
        Self::Unauthorized,
        Self::Forbidden,
        Self::RateLimited,
        Self::InvalidRequest,
        Self::Internal,
    ];

    /// Maps an HTTP status code to its class. Total over `u16`.
    pub fn from_http_status(status: u16) -> Option<Self> {
        match status {
            404 => Some(Self::NotFound),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            429 => Some(Self::RateLimited),
            400..=499 => Some(Self::InvalidRequest),
            500..=599 => Some(Self::Internal),
            _ => None,
        }
    }

    /// Returns the standard name (e.g., `"not_found"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate_limited",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal",
        }
    }

    /// Whether a response of this class may be retried by the executor.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Internal)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
