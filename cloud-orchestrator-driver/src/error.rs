use std::fmt;

use serde::{Deserialize, Serialize};

/// Uniform error returned by every driver operation.
///
/// Produced exclusively by a provider's [`ErrorNormalizer`](crate::ErrorNormalizer)
/// (or by the driver layer itself for unmapped vendor values). Callers should
/// never need to inspect vendor-native error shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Vendor error code, empty when the failure did not come from the vendor API.
    pub code: String,
    /// Human readable message with vendor diagnostic noise removed.
    pub message: String,
}

impl ResponseError {
    /// Code used when a vendor value has no entry in a mapping table.
    pub const UNMAPPED_VALUE: &'static str = "UnmappedValue";
    /// Code used when a mapping table fails validation.
    pub const INVALID_MAPPING: &'static str = "InvalidMapping";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Generic constructor: copies the raw message and leaves the code empty.
    pub fn create(err: &impl fmt::Display) -> Self {
        Self {
            code: String::new(),
            message: err.to_string(),
        }
    }

    pub(crate) fn unmapped(table: &str, raw: &str) -> Self {
        Self::new(
            Self::UNMAPPED_VALUE,
            format!("{table}: no mapping for vendor value '{raw}'"),
        )
    }

    pub(crate) fn invalid_mapping(table: &str, detail: impl fmt::Display) -> Self {
        Self::new(Self::INVALID_MAPPING, format!("{table}: {detail}"))
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ResponseError {}

/// Driver-layer result type.
pub type Result<T> = std::result::Result<T, ResponseError>;

/// Raw error raised by a vendor transport, before normalization.
///
/// Closed set of known shapes. Normalizers match on the variant of their own
/// vendor and treat everything else through the generic constructor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Structured error returned by an Alibaba Cloud API.
    #[error("{0}")]
    Alibaba(AlibabaSdkError),

    /// Structured error returned by a Tencent Cloud API.
    #[error("{0}")]
    Tencent(TencentSdkError),

    /// Error envelope returned by the Cloudflare API.
    #[error("{0}")]
    Cloudflare(CloudflareApiError),

    /// Connection level failure or retryable gateway status.
    #[error("network error: {0}")]
    Network(String),

    /// The HTTP exchange timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// HTTP 429.
    #[error("rate limited{}", .retry_after.map(|s| format!(" (retry after {s}s)")).unwrap_or_default())]
    RateLimited {
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The request parameters could not be encoded.
    #[error("failed to serialize request: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Transport-level failures worth another attempt.
    pub(crate) fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. }
        )
    }
}

/// Alibaba Cloud SDK error.
///
/// `message` keeps the SDK wire format, `code: <http status>, <message> request id: <id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlibabaSdkError {
    pub code: String,
    pub message: String,
    pub status_code: u16,
    pub request_id: Option<String>,
}

impl AlibabaSdkError {
    /// Builds the error the way the SDK formats it from an API error body.
    pub fn from_api(
        status_code: u16,
        code: impl Into<String>,
        api_message: &str,
        request_id: Option<String>,
    ) -> Self {
        let message = format!(
            "code: {status_code}, {api_message} request id: {}",
            request_id.as_deref().unwrap_or_default()
        );
        Self {
            code: code.into(),
            message,
            status_code,
            request_id,
        }
    }
}

impl fmt::Display for AlibabaSdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SDKError: {} {}", self.code, self.message)
    }
}

/// Tencent Cloud SDK error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TencentSdkError {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

impl fmt::Display for TencentSdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[TencentCloudSDKError] Code={}, Message={}, RequestId={}",
            self.code,
            self.message,
            self.request_id.as_deref().unwrap_or_default()
        )
    }
}

/// One entry of the Cloudflare `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareErrorItem {
    pub code: i64,
    pub message: String,
}

/// Unsuccessful Cloudflare API envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareApiError {
    pub status_code: u16,
    pub errors: Vec<CloudflareErrorItem>,
}

impl fmt::Display for CloudflareApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.first() {
            Some(item) => write!(
                f,
                "HTTP status {}: {} ({})",
                self.status_code, item.message, item.code
            ),
            None => write!(f, "HTTP status {}: unknown error", self.status_code),
        }
    }
}
