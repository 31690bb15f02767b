//! Vendor transport seam.
//!
//! Drivers never build HTTP requests themselves. They hand an [`ApiRequest`]
//! to a [`Transport`] (request signing, one HTTP exchange, HTTP-level retry)
//! and read back the decoded JSON payload or a [`ClientError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::ClientError;

/// One vendor API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Product / endpoint prefix, e.g. `ecs`, `cvm`, `dnspod`.
    pub service: &'static str,
    /// API version; empty for REST APIs.
    pub version: &'static str,
    /// RPC action name, or request path for REST APIs (starts with `/`).
    pub action: String,
    /// RPC parameters, query parameters (`GET`) or JSON body.
    pub params: Value,
}

impl ApiRequest {
    /// An RPC style call (Alibaba / Tencent): always `POST`.
    pub fn rpc(
        service: &'static str,
        version: &'static str,
        action: impl Into<String>,
        params: Value,
    ) -> Self {
        Self {
            method: Method::POST,
            service,
            version,
            action: action.into(),
            params,
        }
    }

    /// A REST call (Cloudflare).
    pub fn rest(method: Method, path: impl Into<String>, params: Value) -> Self {
        Self {
            method,
            service: "",
            version: "",
            action: path.into(),
            params,
        }
    }

    /// Short description for logs: the action, or `METHOD path`.
    pub fn describe(&self) -> String {
        if self.action.starts_with('/') {
            format!("{} {}", self.method, self.action)
        } else {
            format!("{}/{} {}", self.service, self.version, self.action)
        }
    }
}

/// Issues signed vendor API calls.
///
/// Success yields the decoded payload: the `Response` object for Tencent, the
/// whole body for Alibaba, the whole envelope for Cloudflare.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: ApiRequest) -> Result<Value, ClientError>;
}

/// HTTP settings shared by the built-in transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Automatic retries for transient failures (0 disables retrying).
    pub max_retries: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_retries: 2,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rpc_requests_are_post() {
        let req = ApiRequest::rpc("ecs", "2014-05-26", "DescribeInstances", json!({}));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.describe(), "ecs/2014-05-26 DescribeInstances");
    }

    #[test]
    fn rest_description_uses_method_and_path() {
        let req = ApiRequest::rest(Method::DELETE, "/zones/abc", Value::Null);
        assert_eq!(req.describe(), "DELETE /zones/abc");
    }

    #[test]
    fn default_options() {
        let opts = TransportOptions::default();
        assert_eq!(opts.max_retries, 2);
        assert_eq!(opts.connect_timeout, Duration::from_secs(5));
        assert_eq!(opts.request_timeout, Duration::from_secs(10));
    }
}
