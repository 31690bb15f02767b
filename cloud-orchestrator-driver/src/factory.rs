//! Driver factory functions.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ResponseError, Result};
use crate::traits::{ComputeDriver, DnsDriver};
use crate::types::RequestParam;

#[cfg(feature = "alibaba")]
use crate::providers::{AlibabaAlidnsDriver, AlibabaEcsDriver, AlibabaSwasDriver};
#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareDnsDriver;
#[cfg(feature = "tencent")]
use crate::providers::{TencentCvmDriver, TencentDnspodDriver, TencentLighthouseDriver};

/// Compute drivers enabled via feature flags.
///
/// Serialized in kebab-case (`"tencent-lighthouse"`), the same string the
/// driver reports from [`ComputeDriver::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComputeDriverKind {
    #[cfg(feature = "alibaba")]
    AlibabaEcs,
    #[cfg(feature = "alibaba")]
    AlibabaSwas,
    #[cfg(feature = "tencent")]
    TencentCvm,
    #[cfg(feature = "tencent")]
    TencentLighthouse,
}

impl ComputeDriverKind {
    pub const ALL: &'static [Self] = &[
        #[cfg(feature = "alibaba")]
        Self::AlibabaEcs,
        #[cfg(feature = "alibaba")]
        Self::AlibabaSwas,
        #[cfg(feature = "tencent")]
        Self::TencentCvm,
        #[cfg(feature = "tencent")]
        Self::TencentLighthouse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "alibaba")]
            Self::AlibabaEcs => "alibaba-ecs",
            #[cfg(feature = "alibaba")]
            Self::AlibabaSwas => "alibaba-swas",
            #[cfg(feature = "tencent")]
            Self::TencentCvm => "tencent-cvm",
            #[cfg(feature = "tencent")]
            Self::TencentLighthouse => "tencent-lighthouse",
        }
    }
}

/// DNS drivers enabled via feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DnsDriverKind {
    #[cfg(feature = "alibaba")]
    AlibabaAlidns,
    #[cfg(feature = "tencent")]
    TencentDnspod,
    #[cfg(feature = "cloudflare")]
    CloudflareDns,
}

impl DnsDriverKind {
    pub const ALL: &'static [Self] = &[
        #[cfg(feature = "alibaba")]
        Self::AlibabaAlidns,
        #[cfg(feature = "tencent")]
        Self::TencentDnspod,
        #[cfg(feature = "cloudflare")]
        Self::CloudflareDns,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            #[cfg(feature = "alibaba")]
            Self::AlibabaAlidns => "alibaba-alidns",
            #[cfg(feature = "tencent")]
            Self::TencentDnspod => "tencent-dnspod",
            #[cfg(feature = "cloudflare")]
            Self::CloudflareDns => "cloudflare-dns",
        }
    }
}

macro_rules! impl_kind_str {
    ($kind:ident) => {
        impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $kind {
            type Err = ResponseError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|kind| kind.as_str() == s)
                    .ok_or_else(|| ResponseError::unmapped(stringify!($kind), s))
            }
        }
    };
}

impl_kind_str!(ComputeDriverKind);
impl_kind_str!(DnsDriverKind);

/// Creates a [`ComputeDriver`] bound to `param`.
///
/// # Examples
///
/// ```rust,no_run
/// use cloud_orchestrator_driver::{ComputeDriverKind, RequestParam, create_compute_driver};
///
/// let driver = create_compute_driver(
///     ComputeDriverKind::TencentCvm,
///     RequestParam::new("your-secret-id", "your-secret-key").region("ap-guangzhou"),
/// )
/// .unwrap();
/// ```
pub fn create_compute_driver(
    kind: ComputeDriverKind,
    param: RequestParam,
) -> Result<Arc<dyn ComputeDriver>> {
    log::debug!("creating compute driver {kind}");
    match kind {
        #[cfg(feature = "alibaba")]
        ComputeDriverKind::AlibabaEcs => Ok(Arc::new(AlibabaEcsDriver::new(param)?)),
        #[cfg(feature = "alibaba")]
        ComputeDriverKind::AlibabaSwas => Ok(Arc::new(AlibabaSwasDriver::new(param)?)),
        #[cfg(feature = "tencent")]
        ComputeDriverKind::TencentCvm => Ok(Arc::new(TencentCvmDriver::new(param)?)),
        #[cfg(feature = "tencent")]
        ComputeDriverKind::TencentLighthouse => {
            Ok(Arc::new(TencentLighthouseDriver::new(param)?))
        }
    }
}

/// Creates a [`DnsDriver`] bound to `param`.
///
/// For Cloudflare `secret_key` is the API token and `secret_id` the optional
/// account id.
pub fn create_dns_driver(kind: DnsDriverKind, param: RequestParam) -> Result<Arc<dyn DnsDriver>> {
    log::debug!("creating dns driver {kind}");
    match kind {
        #[cfg(feature = "alibaba")]
        DnsDriverKind::AlibabaAlidns => Ok(Arc::new(AlibabaAlidnsDriver::new(param)?)),
        #[cfg(feature = "tencent")]
        DnsDriverKind::TencentDnspod => Ok(Arc::new(TencentDnspodDriver::new(param)?)),
        #[cfg(feature = "cloudflare")]
        DnsDriverKind::CloudflareDns => Ok(Arc::new(CloudflareDnsDriver::new(param)?)),
    }
}
