//! Tencent Cloud: CVM, Lighthouse and `DNSPod` drivers

mod cvm;
mod dnspod;
mod error;
mod lighthouse;
mod sign;
mod transport;
mod types;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, ResponseError, Result};
use crate::traits::ErrorNormalizer;
use crate::transport::{ApiRequest, Transport, TransportOptions};
use crate::types::RequestParam;

pub use cvm::TencentCvmDriver;
pub use dnspod::TencentDnspodDriver;
pub use error::TencentErrorNormalizer;
pub use lighthouse::TencentLighthouseDriver;
pub use transport::TencentTransport;

pub(crate) const PROVIDER_NAME: &str = "tencent";
pub(crate) const ROOT_DOMAIN: &str = "tencentcloudapi.com";

/// A Tencent Cloud API product: service name and API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Product {
    pub service: &'static str,
    pub version: &'static str,
}

pub(crate) const CVM: Product = Product {
    service: "cvm",
    version: "2017-03-12",
};
pub(crate) const CBS: Product = Product {
    service: "cbs",
    version: "2017-03-12",
};
pub(crate) const LIGHTHOUSE: Product = Product {
    service: "lighthouse",
    version: "2020-03-24",
};
pub(crate) const DNSPOD: Product = Product {
    service: "dnspod",
    version: "2021-03-23",
};

/// Tencent Cloud client bound to one set of request parameters.
///
/// ```rust,no_run
/// use cloud_orchestrator_driver::{RequestParam, TencentClient};
///
/// let client = TencentClient::new(
///     RequestParam::new("your-secret-id", "your-secret-key").region("ap-guangzhou"),
/// );
/// ```
#[derive(Clone)]
pub struct TencentClient {
    param: RequestParam,
    transport: Arc<dyn Transport>,
}

/// Builder for [`TencentClient`].
pub struct TencentClientBuilder {
    param: RequestParam,
    options: TransportOptions,
}

impl TencentClientBuilder {
    fn new(param: RequestParam) -> Self {
        Self {
            param,
            options: TransportOptions::default(),
        }
    }

    /// Retries for network failures and `RequestLimitExceeded` (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.options.max_retries = retries;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = timeout;
        self
    }

    pub fn build(self) -> TencentClient {
        let transport = TencentTransport::new(&self.param, self.options);
        TencentClient::with_transport(self.param, Arc::new(transport))
    }
}

impl TencentClient {
    pub fn new(param: RequestParam) -> Self {
        Self::builder(param).build()
    }

    pub fn builder(param: RequestParam) -> TencentClientBuilder {
        TencentClientBuilder::new(param)
    }

    pub fn with_transport(param: RequestParam, transport: Arc<dyn Transport>) -> Self {
        Self { param, transport }
    }

    pub fn param(&self) -> &RequestParam {
        &self.param
    }

    /// Issue one API call and decode the `Response` object.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        product: Product,
        action: &str,
        params: Value,
    ) -> Result<T> {
        let value = self
            .call_raw(product, action, params)
            .await
            .map_err(|e| failure(action, &e))?;
        decode(action, value)
    }

    /// Like [`call`](Self::call) but keeps the raw [`ClientError`] so the
    /// caller can recognise specific vendor codes before normalizing.
    pub(crate) async fn call_raw(
        &self,
        product: Product,
        action: &str,
        params: Value,
    ) -> std::result::Result<Value, ClientError> {
        let request = ApiRequest::rpc(product.service, product.version, action, params);
        self.transport.call(request).await
    }
}

/// Normalize and log a failure returned by [`TencentClient::call_raw`].
pub(crate) fn failure(action: &str, err: &ClientError) -> ResponseError {
    let normalized = TencentErrorNormalizer.normalize(err);
    log::error!("[{PROVIDER_NAME}] {action} failed: {normalized}");
    normalized
}

/// Decode a `Response` object into `T`.
pub(crate) fn decode<T: DeserializeOwned>(action: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        log::error!("[{PROVIDER_NAME}] {action} response mismatch: {e}");
        TencentErrorNormalizer.normalize(&ClientError::Parse(e.to_string()))
    })
}
