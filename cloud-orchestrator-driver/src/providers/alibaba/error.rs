//! Alibaba Cloud error normalization

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ClientError, ResponseError};
use crate::traits::ErrorNormalizer;

/// `code: <http status>, <message> request id: <id>` plus any trailing lines.
static SDK_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^code: \d+, (.+?) request id.*$").expect("SDK message pattern is valid")
});

/// Maps Alibaba SDK errors to `{code, message}`.
///
/// Reference: <https://api.aliyun.com/document/Ecs/2014-05-26/errorCode>
#[derive(Debug, Clone, Copy, Default)]
pub struct AlibabaErrorNormalizer;

impl ErrorNormalizer for AlibabaErrorNormalizer {
    fn normalize(&self, err: &ClientError) -> ResponseError {
        match err {
            ClientError::Alibaba(sdk) => {
                ResponseError::new(sdk.code.clone(), strip_sdk_wrapper(&sdk.message))
            }
            other => ResponseError::create(other),
        }
    }
}

fn strip_sdk_wrapper(message: &str) -> String {
    SDK_MESSAGE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| message.to_string(), |m| m.as_str().to_string())
}
