//! # cloud-orchestrator-driver
//!
//! A provider-agnostic driver layer for cloud compute instances and DNS
//! zones/records.
//!
//! ## Supported Drivers
//!
//! | Service | Vendor / product | Driver | Feature Flag |
//! |---------|------------------|--------|--------------|
//! | Compute | Alibaba Cloud ECS | [`AlibabaEcsDriver`] | `alibaba` |
//! | Compute | Alibaba Cloud Simple Application Server | [`AlibabaSwasDriver`] | `alibaba` |
//! | Compute | Tencent Cloud CVM (disks through CBS) | [`TencentCvmDriver`] | `tencent` |
//! | Compute | Tencent Cloud Lighthouse | [`TencentLighthouseDriver`] | `tencent` |
//! | DNS | Alibaba Cloud DNS | [`AlibabaAlidnsDriver`] | `alibaba` |
//! | DNS | Tencent Cloud `DNSPod` | [`TencentDnspodDriver`] | `tencent` |
//! | DNS | Cloudflare | [`CloudflareDnsDriver`] | `cloudflare` |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: every vendor above.
//! - **`alibaba`**, **`tencent`**, **`cloudflare`**: a single vendor.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS backend.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloud_orchestrator_driver::{
//!     ComputeDriverKind, DnsDriverKind, RequestParam, Zone, create_compute_driver,
//!     create_dns_driver,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let param = RequestParam::new("your-secret-id", "your-secret-key").region("ap-guangzhou");
//!
//!     let compute = create_compute_driver(ComputeDriverKind::TencentCvm, param.clone())?;
//!     for node in compute.list_nodes().await? {
//!         println!("{} {:?} {}", node.id, node.state, node.public_ip);
//!     }
//!
//!     let dns = create_dns_driver(DnsDriverKind::TencentDnspod, param)?;
//!     for record in dns.list_records(&Zone::with_domain("example.com")).await? {
//!         println!("{} {:?} -> {}", record.name, record.record_type, record.value);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Empty Results
//!
//! Every trait operation has a default body returning an empty list, `None`
//! or `()` without any network call. An empty result without an error may
//! therefore mean "not supported by this driver", "not found" or "nothing to
//! return".
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ResponseError>`](ResponseError). Vendor
//! errors pass through the vendor's [`ErrorNormalizer`], which keeps the vendor
//! error code and strips request ids and SDK wrapping from the message.
//! Vendor values missing from a driver's mapping tables (an unknown instance
//! state, say) fail with code [`ResponseError::UNMAPPED_VALUE`].
//!
//! Transient transport failures (network, timeout, HTTP 429) are retried with
//! exponential backoff inside the transport; drivers never retry.

mod error;
mod factory;
mod http_client;
mod mapping;
mod providers;
mod traits;
mod transport;
mod types;
mod utils;

pub use error::{
    AlibabaSdkError, ClientError, CloudflareApiError, CloudflareErrorItem, ResponseError, Result,
    TencentSdkError,
};

pub use factory::{ComputeDriverKind, DnsDriverKind, create_compute_driver, create_dns_driver};

pub use mapping::MappingTable;

pub use traits::{ComputeDriver, DnsDriver, ErrorNormalizer, NullComputeDriver, NullDnsDriver};

pub use transport::{ApiRequest, Transport, TransportOptions};

pub use types::{
    Architecture, Location, Node, NodeCreateOpts, NodeImage, NodeResizeOpts, NodeSize, NodeState,
    OsType, Record, RecordType, RequestParam, StorageVolume, StorageVolumeState, VolumeSnapshot,
    Zone,
};

pub use utils::datetime;

#[cfg(feature = "alibaba")]
pub use providers::{
    AlibabaAlidnsDriver, AlibabaClient, AlibabaClientBuilder, AlibabaEcsDriver,
    AlibabaErrorNormalizer, AlibabaSwasDriver, AlibabaTransport,
};

#[cfg(feature = "tencent")]
pub use providers::{
    TencentClient, TencentClientBuilder, TencentCvmDriver, TencentDnspodDriver,
    TencentErrorNormalizer, TencentLighthouseDriver, TencentTransport,
};

#[cfg(feature = "cloudflare")]
pub use providers::{
    CloudflareClient, CloudflareClientBuilder, CloudflareDnsDriver, CloudflareErrorNormalizer,
    CloudflareTransport,
};
