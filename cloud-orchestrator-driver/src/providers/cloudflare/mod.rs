//! Cloudflare DNS driver

mod dns;
mod error;
mod transport;
mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{ClientError, Result};
use crate::traits::ErrorNormalizer;
use crate::transport::{ApiRequest, Transport, TransportOptions};
use crate::types::RequestParam;

pub use dns::CloudflareDnsDriver;
pub use error::CloudflareErrorNormalizer;
pub use transport::CloudflareTransport;

use types::CloudflareResponse;

pub(crate) const PROVIDER_NAME: &str = "cloudflare";
pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Largest page the Zones API accepts.
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;
/// Largest page the DNS Records API accepts.
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// Cloudflare client bound to one API token.
///
/// `secret_key` carries the token; `secret_id`, when set, is the account id
/// new zones are created under.
#[derive(Clone)]
pub struct CloudflareClient {
    param: RequestParam,
    transport: Arc<dyn Transport>,
}

/// Builder for [`CloudflareClient`].
pub struct CloudflareClientBuilder {
    param: RequestParam,
    options: TransportOptions,
}

impl CloudflareClientBuilder {
    fn new(param: RequestParam) -> Self {
        Self {
            param,
            options: TransportOptions::default(),
        }
    }

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

    pub fn build(self) -> CloudflareClient {
        let transport = CloudflareTransport::new(&self.param, self.options);
        CloudflareClient::with_transport(self.param, Arc::new(transport))
    }
}

impl CloudflareClient {
    pub fn new(param: RequestParam) -> Self {
        Self::builder(param).build()
    }

    pub fn builder(param: RequestParam) -> CloudflareClientBuilder {
        CloudflareClientBuilder::new(param)
    }

    pub fn with_transport(param: RequestParam, transport: Arc<dyn Transport>) -> Self {
        Self { param, transport }
    }

    pub fn param(&self) -> &RequestParam {
        &self.param
    }

    /// Issue one call and decode the envelope, normalizing any failure.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Value,
    ) -> Result<CloudflareResponse<T>> {
        let request = ApiRequest::rest(method, path, params);
        let description = request.describe();

        let value = self.transport.call(request).await.map_err(|e| {
            let normalized = CloudflareErrorNormalizer.normalize(&e);
            log::error!("[{PROVIDER_NAME}] {description} failed: {normalized}");
            normalized
        })?;

        serde_json::from_value(value).map_err(|e| {
            log::error!("[{PROVIDER_NAME}] {description} response mismatch: {e}");
            CloudflareErrorNormalizer.normalize(&ClientError::Parse(e.to_string()))
        })
    }

    /// `result` of a call that must carry one.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Value,
    ) -> Result<T> {
        self.request(method, path, params)
            .await?
            .result
            .ok_or_else(|| {
                CloudflareErrorNormalizer
                    .normalize(&ClientError::Parse("missing result field".to_string()))
            })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(Method::GET, path, Value::Null).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.fetch(Method::POST, path, body).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.fetch(Method::PUT, path, body).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let _: CloudflareResponse<Value> = self.request(Method::DELETE, path, Value::Null).await?;
        Ok(())
    }

    /// Every page of a list endpoint, in vendor order.
    pub(crate) async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        per_page: u32,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let resp: CloudflareResponse<Vec<T>> = self
                .request(
                    Method::GET,
                    path,
                    json!({ "page": page, "per_page": per_page }),
                )
                .await?;

            let batch = resp.result.unwrap_or_default();
            let fetched = batch.len();
            items.extend(batch);

            let total_pages = resp.result_info.map_or(0, |info| info.total_pages);
            if fetched == 0 || page >= total_pages {
                return Ok(items);
            }
            page += 1;
        }
    }

    /// Finds a zone id by its domain name.
    pub(crate) async fn find_zone_id(&self, domain: &str) -> Result<Option<String>> {
        let resp: CloudflareResponse<Vec<types::CloudflareZone>> = self
            .request(Method::GET, "/zones", json!({ "name": domain }))
            .await?;
        Ok(resp
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|zone| zone.id))
    }
}
