//! Vendor driver implementations

/// Shared utilities used by the vendor modules.
pub(crate) mod common;

#[cfg(feature = "alibaba")]
mod alibaba;
#[cfg(feature = "cloudflare")]
mod cloudflare;
#[cfg(feature = "tencent")]
mod tencent;

#[cfg(feature = "alibaba")]
pub use alibaba::{
    AlibabaAlidnsDriver, AlibabaClient, AlibabaClientBuilder, AlibabaEcsDriver,
    AlibabaErrorNormalizer, AlibabaSwasDriver, AlibabaTransport,
};
#[cfg(feature = "cloudflare")]
pub use cloudflare::{
    CloudflareClient, CloudflareClientBuilder, CloudflareDnsDriver, CloudflareErrorNormalizer,
    CloudflareTransport,
};
#[cfg(feature = "tencent")]
pub use tencent::{
    TencentClient, TencentClientBuilder, TencentCvmDriver, TencentDnspodDriver,
    TencentErrorNormalizer, TencentLighthouseDriver, TencentTransport,
};
