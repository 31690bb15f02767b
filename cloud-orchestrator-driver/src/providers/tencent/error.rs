//! Tencent Cloud error normalization

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ClientError, ResponseError};
use crate::traits::ErrorNormalizer;

static REQUEST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[request id:.+?\]").expect("request id pattern is valid"));

/// Maps Tencent SDK errors to `{code, message}`.
///
/// Reference: <https://www.tencentcloud.com/document/api/213/33281>
#[derive(Debug, Clone, Copy, Default)]
pub struct TencentErrorNormalizer;

impl ErrorNormalizer for TencentErrorNormalizer {
    fn normalize(&self, err: &ClientError) -> ResponseError {
        match err {
            ClientError::Tencent(sdk) => {
                let stripped = REQUEST_ID.replace_all(&sdk.message, "");
                let message = stripped.lines().next().unwrap_or_default().trim_end();
                ResponseError::new(sdk.code.clone(), message)
            }
            other => ResponseError::create(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TencentSdkError;

    fn sdk_error(code: &str, message: &str) -> ClientError {
        ClientError::Tencent(TencentSdkError {
            code: code.to_string(),
            message: message.to_string(),
            request_id: Some("r-1".to_string()),
        })
    }

    #[test]
    fn strips_request_id_and_trailing_lines() {
        let err = sdk_error(
            "InvalidInstanceId.NotFound",
            "The instance `ins-xxx` does not exist.[request id:6ef6-11]\nmore diagnostics",
        );
        let normalized = TencentErrorNormalizer.normalize(&err);
        assert_eq!(normalized.code, "InvalidInstanceId.NotFound");
        assert_eq!(normalized.message, "The instance `ins-xxx` does not exist.");
    }

    #[test]
    fn idempotent() {
        let err = sdk_error("AuthFailure", "signature expired [request id:a]\nx");
        assert_eq!(
            TencentErrorNormalizer.normalize(&err),
            TencentErrorNormalizer.normalize(&err)
        );
    }

    #[test]
    fn plain_message_kept() {
        let err = sdk_error("LimitExceeded", "quota exceeded");
        assert_eq!(TencentErrorNormalizer.normalize(&err).message, "quota exceeded");
    }

    #[test]
    fn foreign_variants_use_generic_constructor() {
        let err = ClientError::Parse("eof".to_string());
        assert_eq!(
            TencentErrorNormalizer.normalize(&err),
            ResponseError::create(&err)
        );
    }
}
