//! Alibaba Cloud: ECS, SWAS and Alidns drivers

mod alidns;
mod ecs;
mod error;
mod sign;
mod swas;
mod transport;
mod types;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::traits::ErrorNormalizer;
use crate::transport::{ApiRequest, Transport, TransportOptions};
use crate::types::RequestParam;

pub use alidns::AlibabaAlidnsDriver;
pub use ecs::AlibabaEcsDriver;
pub use error::AlibabaErrorNormalizer;
pub use swas::AlibabaSwasDriver;
pub use transport::AlibabaTransport;

pub(crate) const PROVIDER_NAME: &str = "alibaba";
/// Region used when the request parameters do not name one.
pub(crate) const DEFAULT_REGION: &str = "cn-hangzhou";
/// SHA256 of an empty body
pub(crate) const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// An Alibaba Cloud OpenAPI product: endpoint prefix and API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Product {
    pub service: &'static str,
    pub version: &'static str,
}

pub(crate) const ECS: Product = Product {
    service: "ecs",
    version: "2014-05-26",
};
pub(crate) const SWAS: Product = Product {
    service: "swas",
    version: "2020-06-01",
};
pub(crate) const ALIDNS: Product = Product {
    service: "alidns",
    version: "2015-01-09",
};

/// Alibaba Cloud client bound to one set of request parameters.
///
/// Cheap to clone; clones share the transport.
///
/// ```rust,no_run
/// use cloud_orchestrator_driver::{AlibabaClient, RequestParam};
///
/// let client = AlibabaClient::builder(
///     RequestParam::new("your-access-key-id", "your-access-key-secret").region("cn-hangzhou"),
/// )
/// .max_retries(3)
/// .build();
/// ```
#[derive(Clone)]
pub struct AlibabaClient {
    param: RequestParam,
    transport: Arc<dyn Transport>,
}

/// Builder for [`AlibabaClient`] with configurable HTTP behavior.
pub struct AlibabaClientBuilder {
    param: RequestParam,
    options: TransportOptions,
}

impl AlibabaClientBuilder {
    fn new(param: RequestParam) -> Self {
        Self {
            param,
            options: TransportOptions::default(),
        }
    }

    /// Maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.options.max_retries = retries;
        self
    }

    /// Connect timeout (default: 5s).
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Whole-request timeout (default: 10s).
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = timeout;
        self
    }

    pub fn build(self) -> AlibabaClient {
        let transport = AlibabaTransport::new(&self.param, self.options);
        AlibabaClient::with_transport(self.param, Arc::new(transport))
    }
}

impl AlibabaClient {
    /// Client with default settings (2 retries, 5s connect / 10s request timeout).
    pub fn new(param: RequestParam) -> Self {
        Self::builder(param).build()
    }

    pub fn builder(param: RequestParam) -> AlibabaClientBuilder {
        AlibabaClientBuilder::new(param)
    }

    /// Client over a caller supplied transport.
    pub fn with_transport(param: RequestParam, transport: Arc<dyn Transport>) -> Self {
        Self { param, transport }
    }

    pub fn param(&self) -> &RequestParam {
        &self.param
    }

    pub(crate) fn region_id(&self) -> &str {
        if self.param.region_id.is_empty() {
            DEFAULT_REGION
        } else {
            &self.param.region_id
        }
    }

    /// Issue one RPC call and decode its body, normalizing any failure.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        product: Product,
        action: &str,
        params: Value,
    ) -> Result<T> {
        let request = ApiRequest::rpc(product.service, product.version, action, params);
        let value = self.transport.call(request).await.map_err(|e| {
            let normalized = AlibabaErrorNormalizer.normalize(&e);
            log::error!("[{PROVIDER_NAME}] {action} failed: {normalized}");
            normalized
        })?;

        serde_json::from_value(value).map_err(|e| {
            log::error!("[{PROVIDER_NAME}] {action} response mismatch: {e}");
            AlibabaErrorNormalizer.normalize(&ClientError::Parse(e.to_string()))
        })
    }
}
