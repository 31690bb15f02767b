//! Tencent Cloud TC3-HMAC-SHA256 signing

use chrono::{DateTime, Utc};

use crate::providers::common::{hmac_sha256, sha256_hex};

use super::TencentTransport;

const ALGORITHM: &str = "TC3-HMAC-SHA256";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";
pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub(crate) struct SignInput<'a> {
    pub host: &'a str,
    pub service: &'a str,
    pub action: &'a str,
    pub payload: &'a str,
    pub timestamp: i64,
}

impl TencentTransport {
    /// Builds the `Authorization` header value.
    /// See <https://www.tencentcloud.com/document/api/213/33224>
    pub(crate) fn sign(&self, input: &SignInput<'_>) -> String {
        let SignInput {
            host,
            service,
            action,
            payload,
            timestamp,
        } = input;

        let date = DateTime::from_timestamp(*timestamp, 0)
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d")
            .to_string();

        // 1. Canonical request
        let canonical_headers = format!(
            "content-type:{CONTENT_TYPE}\nhost:{host}\nx-tc-action:{}\n",
            action.to_lowercase()
        );
        let canonical_request = format!(
            "POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{}",
            sha256_hex(payload.as_bytes())
        );

        // 2. String to sign
        let credential_scope = format!("{date}/{service}/tc3_request");
        let string_to_sign = format!(
            "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        // 3. Derived key chain
        let secret_date = hmac_sha256(
            format!("TC3{}", self.secret_key).as_bytes(),
            date.as_bytes(),
        );
        let secret_service = hmac_sha256(&secret_date, service.as_bytes());
        let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
        let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.secret_id
        )
    }
}
