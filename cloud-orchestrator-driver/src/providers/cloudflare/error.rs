//! Cloudflare error normalization

use crate::error::{ClientError, ResponseError};
use crate::traits::ErrorNormalizer;

/// Maps Cloudflare envelopes to `{code, message}`: the first error item's
/// numeric code and message.
///
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudflareErrorNormalizer;

impl ErrorNormalizer for CloudflareErrorNormalizer {
    fn normalize(&self, err: &ClientError) -> ResponseError {
        match err {
            ClientError::Cloudflare(api) => match api.errors.first() {
                Some(item) => ResponseError::new(item.code.to_string(), item.message.clone()),
                None => ResponseError::new(api.status_code.to_string(), "Unknown error"),
            },
            other => ResponseError::create(other),
        }
    }
}
