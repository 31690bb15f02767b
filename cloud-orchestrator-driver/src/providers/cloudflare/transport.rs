//! Cloudflare API v4 transport (bearer token)

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::{ClientError, CloudflareApiError, CloudflareErrorItem};
use crate::http_client::HttpUtils;
use crate::providers::common::create_http_client;
use crate::transport::{ApiRequest, Transport, TransportOptions};
use crate::types::RequestParam;
use crate::utils::log_sanitizer::truncate_for_log;

use super::{CF_API_BASE, PROVIDER_NAME};

/// Sends Cloudflare REST calls and returns the full response envelope.
///
/// `GET` parameters go into the query string, other methods send them as the
/// JSON body. A configured `endpoint` replaces `api.cloudflare.com`.
pub struct CloudflareTransport {
    client: Client,
    api_token: String,
    base_url: String,
    max_retries: u32,
}

impl CloudflareTransport {
    pub fn new(param: &RequestParam, options: TransportOptions) -> Self {
        let base_url = if param.endpoint.is_empty() {
            CF_API_BASE.to_string()
        } else {
            format!("https://{}/client/v4", param.endpoint)
        };
        Self {
            client: create_http_client(&options),
            api_token: param.secret_key.clone(),
            base_url,
            max_retries: options.max_retries,
        }
    }

    fn url(&self, request: &ApiRequest) -> String {
        let mut url = format!("{}{}", self.base_url, request.action);
        if request.method == Method::GET {
            let query = query_string(&request.params);
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
        }
        url
    }
}

#[async_trait]
impl Transport for CloudflareTransport {
    async fn call(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let url = self.url(&request);
        log::debug!("[{PROVIDER_NAME}] {} {url}", request.method);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header("Authorization", format!("Bearer {}", self.api_token));
        if request.method != Method::GET && !request.params.is_null() {
            log::debug!(
                "[{PROVIDER_NAME}] Request Body: {}",
                truncate_for_log(&request.params.to_string())
            );
            builder = builder.json(&request.params);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            builder,
            PROVIDER_NAME,
            &request.describe(),
            self.max_retries,
        )
        .await?;

        let body: Value = match serde_json::from_str(&response_text) {
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

        let success = body.get("success").and_then(Value::as_bool) == Some(true);
        if status >= 400 || !success {
            let err = api_error(status, &body);
            log::error!("[{PROVIDER_NAME}] API error: {err}");
            return Err(ClientError::Cloudflare(err));
        }

        Ok(body)
    }
}

/// `key=value` pairs of a flat JSON object; nulls are skipped.
fn query_string(params: &Value) -> String {
    let Some(map) = params.as_object() else {
        return String::new();
    };
    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value)
            ))
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn api_error(status_code: u16, body: &Value) -> CloudflareApiError {
    let errors = body
        .get("errors")
        .cloned()
        .and_then(|errors| serde_json::from_value::<Vec<CloudflareErrorItem>>(errors).ok())
        .unwrap_or_default();
    CloudflareApiError {
        status_code,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(param: &RequestParam) -> CloudflareTransport {
        CloudflareTransport::new(param, TransportOptions::default())
    }

    #[test]
    fn get_parameters_become_query_string() {
        let t = transport(&RequestParam::new("", "token"));
        let req = ApiRequest::rest(
            Method::GET,
            "/zones",
            json!({ "name": "example.com", "page": 2, "per_page": 50, "status": null }),
        );
        assert_eq!(
            t.url(&req),
            "https://api.cloudflare.com/client/v4/zones?name=example.com&page=2&per_page=50"
        );
    }

    #[test]
    fn body_methods_keep_path_only() {
        let t = transport(&RequestParam::new("", "token"));
        let req = ApiRequest::rest(Method::POST, "/zones", json!({ "name": "a b.com" }));
        assert_eq!(t.url(&req), "https://api.cloudflare.com/client/v4/zones");
    }

    #[test]
    fn endpoint_override() {
        let t = transport(&RequestParam::new("", "token").endpoint("cf.internal"));
        let req = ApiRequest::rest(Method::DELETE, "/zones/z1", Value::Null);
        assert_eq!(t.url(&req), "https://cf.internal/client/v4/zones/z1");
    }

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(
            query_string(&json!({ "name": "a b&c" })),
            "name=a%20b%26c"
        );
        assert_eq!(query_string(&Value::Null), "");
    }

    #[test]
    fn error_envelope_is_parsed() {
        let body = json!({
            "success": false,
            "errors": [{ "code": 81044, "message": "Record does not exist." }],
            "messages": [],
            "result": null
        });
        let err = api_error(404, &body);
        assert_eq!(err.status_code, 404);
        assert_eq!(err.errors[0].code, 81044);
    }

    #[test]
    fn malformed_errors_become_empty_list() {
        let err = api_error(500, &json!({ "success": false, "errors": "boom" }));
        assert!(err.errors.is_empty());
    }
}
