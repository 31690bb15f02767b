//! Alibaba Cloud RPC transport (reconstructed on the general HTTP helpers)

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AlibabaSdkError, ClientError};
use crate::http_client::HttpUtils;
use crate::providers::common::{create_http_client, url_encode};
use crate::transport::{ApiRequest, Transport, TransportOptions};
use crate::types::RequestParam;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use super::sign::SignInput;
use super::{DEFAULT_REGION, EMPTY_BODY_SHA256, PROVIDER_NAME};

/// Signs and sends Alibaba Cloud RPC calls.
///
/// Host: the configured endpoint, otherwise `<product>.<region>.aliyuncs.com`.
pub struct AlibabaTransport {
    client: Client,
    pub(crate) access_key_id: String,
    pub(crate) access_key_secret: String,
    region_id: String,
    endpoint: String,
    max_retries: u32,
}

impl AlibabaTransport {
    pub fn new(param: &RequestParam, options: TransportOptions) -> Self {
        Self {
            client: create_http_client(&options),
            access_key_id: param.secret_id.clone(),
            access_key_secret: param.secret_key.clone(),
            region_id: param.region_id.clone(),
            endpoint: param.endpoint.clone(),
            max_retries: options.max_retries,
        }
    }

    fn host(&self, service: &str) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }
        let region = if self.region_id.is_empty() {
            DEFAULT_REGION
        } else {
            &self.region_id
        };
        format!("{service}.{region}.aliyuncs.com")
    }
}

#[async_trait]
impl Transport for AlibabaTransport {
    async fn call(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let query_string = serialize_to_query_string(&request.params);
        let host = self.host(request.service);
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        let authorization = self.sign(&SignInput {
            host: &host,
            action: &request.action,
            version: request.version,
            query_string: &query_string,
            timestamp: &timestamp,
            nonce: &nonce,
        });

        let url = if query_string.is_empty() {
            format!("https://{host}/")
        } else {
            format!("https://{host}/?{query_string}")
        };

        log::debug!(
            "[{PROVIDER_NAME}] {} as {}",
            request.describe(),
            mask_secret(&self.access_key_id)
        );

        // Parameters live in the query string; the body stays empty
        let builder = self
            .client
            .post(&url)
            .header("Host", &host)
            .header("x-acs-action", &request.action)
            .header("x-acs-version", request.version)
            .header("x-acs-date", &timestamp)
            .header("x-acs-signature-nonce", &nonce)
            .header("x-acs-content-sha256", EMPTY_BODY_SHA256)
            .header("Authorization", authorization);

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            builder,
            PROVIDER_NAME,
            &request.describe(),
            self.max_retries,
        )
        .await?;

        if status >= 400 {
            if let Ok(value) = serde_json::from_str::<Value>(&response_text)
                && let Some(err) = api_error(status, &value)
            {
                log::error!("[{PROVIDER_NAME}] API error: {} - {}", err.code, err.message);
                return Err(ClientError::Alibaba(err));
            }
            return Err(ClientError::Network(format!(
                "HTTP {status}: {}",
                truncate_for_log(&response_text)
            )));
        }

        let value: Value = HttpUtils::parse_json(&response_text, PROVIDER_NAME)?;

        if let Some(err) = api_error(status, &value) {
            log::error!("[{PROVIDER_NAME}] API error: {} - {}", err.code, err.message);
            return Err(ClientError::Alibaba(err));
        }

        Ok(value)
    }
}

/// An error body carries both `Code` and `Message`.
fn api_error(status: u16, value: &Value) -> Option<AlibabaSdkError> {
    let code = value.get("Code").and_then(Value::as_str)?;
    let message = value.get("Message").and_then(Value::as_str)?;
    let request_id = value
        .get("RequestId")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(AlibabaSdkError::from_api(status, code, message, request_id))
}

/// Flatten a JSON value into `key -> value` pairs.
///
/// Nested objects use `Parent.Child`, arrays use 1-based `List.1`, `null` is skipped.
pub(crate) fn flatten_value(prefix: &str, value: &Value, result: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let new_key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_value(&new_key, v, result);
            }
        }
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                flatten_value(&format!("{prefix}.{}", i + 1), v, result);
            }
        }
        Value::String(s) => {
            result.insert(prefix.to_string(), s.clone());
        }
        Value::Number(n) => {
            result.insert(prefix.to_string(), n.to_string());
        }
        Value::Bool(b) => {
            result.insert(prefix.to_string(), b.to_string());
        }
        Value::Null => {}
    }
}

/// Sorted, RFC3986 encoded query string, as the signature expects it.
pub(crate) fn serialize_to_query_string(params: &Value) -> String {
    let mut flat_map = BTreeMap::new();
    flatten_value("", params, &mut flat_map);

    flat_map
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
