//! Tencent Cloud API 3.0 transport

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::error::{ClientError, TencentSdkError};
use crate::http_client::{HttpUtils, backoff_delay};
use crate::providers::common::create_http_client;
use crate::transport::{ApiRequest, Transport, TransportOptions};
use crate::types::RequestParam;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use super::sign::{CONTENT_TYPE, SignInput};
use super::{PROVIDER_NAME, ROOT_DOMAIN};

/// Throttling code, retried like a transient failure.
const RATE_LIMIT_CODE: &str = "RequestLimitExceeded";

/// Signs and sends Tencent Cloud API calls.
///
/// Host: the configured endpoint; otherwise `<service>.<region>.tencentcloudapi.com`,
/// or `<service>.tencentcloudapi.com` when no region is set or the region is an
/// edge zone (`-ec` suffix).
pub struct TencentTransport {
    client: Client,
    pub(crate) secret_id: String,
    pub(crate) secret_key: String,
    region_id: String,
    endpoint: String,
    max_retries: u32,
}

impl TencentTransport {
    pub fn new(param: &RequestParam, options: TransportOptions) -> Self {
        Self {
            client: create_http_client(&options),
            secret_id: param.secret_id.clone(),
            secret_key: param.secret_key.clone(),
            region_id: param.region_id.clone(),
            endpoint: param.endpoint.clone(),
            max_retries: options.max_retries,
        }
    }

    pub(crate) fn host(&self, service: &str) -> String {
        if !self.endpoint.is_empty() {
            self.endpoint.clone()
        } else if !self.region_id.is_empty() && !self.region_id.ends_with("-ec") {
            format!("{service}.{}.{ROOT_DOMAIN}", self.region_id)
        } else {
            format!("{service}.{ROOT_DOMAIN}")
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
        host: &str,
        payload: &str,
    ) -> Result<Value, ClientError> {
        let timestamp = Utc::now().timestamp();
        let authorization = self.sign(&SignInput {
            host,
            service: request.service,
            action: &request.action,
            payload,
            timestamp,
        });

        let mut builder = self
            .client
            .post(format!("https://{host}"))
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", host)
            .header("X-TC-Action", &request.action)
            .header("X-TC-Version", request.version)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("Authorization", authorization);
        if !self.region_id.is_empty() {
            builder = builder.header("X-TC-Region", &self.region_id);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            builder.body(payload.to_string()),
            PROVIDER_NAME,
            &request.describe(),
            self.max_retries,
        )
        .await?;

        let body = match serde_json::from_str::<Value>(&response_text) {
            Ok(body) => body,
            Err(_) if status >= 400 => {
                return Err(ClientError::Network(format!(
                    "HTTP {status}: {}",
                    truncate_for_log(&response_text)
                )));
            }
            Err(e) => {
                log::error!("[{PROVIDER_NAME}] JSON parse failed: {e}");
                return Err(ClientError::Parse(e.to_string()));
            }
        };

        let response = into_response(body)?;
        if let Some(err) = api_error(&response) {
            log::error!("[{PROVIDER_NAME}] API error: {} - {}", err.code, err.message);
            return Err(ClientError::Tencent(err));
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for TencentTransport {
    async fn call(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let payload = if request.params.is_null() {
            "{}".to_string()
        } else {
            serde_json::to_string(&request.params)
                .map_err(|e| ClientError::Serialization(e.to_string()))?
        };
        let host = self.host(request.service);

        log::debug!(
            "[{PROVIDER_NAME}] {} on {host} as {}",
            request.describe(),
            mask_secret(&self.secret_id)
        );
        log::debug!("[{PROVIDER_NAME}] Request Body: {}", truncate_for_log(&payload));

        let mut attempt = 0;
        loop {
            match self.send(&request, &host, &payload).await {
                Err(ClientError::Tencent(err))
                    if err.code == RATE_LIMIT_CODE && attempt < self.max_retries =>
                {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "[{PROVIDER_NAME}] {} throttled (attempt {}/{}), retrying in {:.1}s",
                        request.action,
                        attempt + 1,
                        self.max_retries,
                        delay.as_secs_f32()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// Unwraps `{"Response": {...}}`.
fn into_response(mut body: Value) -> Result<Value, ClientError> {
    body.get_mut("Response")
        .map(Value::take)
        .filter(Value::is_object)
        .ok_or_else(|| ClientError::Parse("missing Response object".to_string()))
}

/// `Response.Error` present means the call failed.
fn api_error(response: &Value) -> Option<TencentSdkError> {
    let error = response.get("Error")?;
    let field = |name: &str| {
        error
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Some(TencentSdkError {
        code: field("Code"),
        message: field("Message"),
        request_id: response
            .get("RequestId")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
