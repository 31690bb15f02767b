use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ResponseError;

// ============ Construction parameters ============

/// Parameters bound to a driver at construction time.
///
/// Never refreshed or rotated during the driver's lifetime.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParam {
    /// Access key id (Alibaba / Tencent), account id (Cloudflare, optional).
    #[serde(default)]
    pub secret_id: String,
    /// Access key secret (Alibaba / Tencent), API token (Cloudflare).
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub region_id: String,
    /// Full host name overriding the derived endpoint.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub service: String,
}

impl RequestParam {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = region_id.into();
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }
}

impl fmt::Debug for RequestParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestParam")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .field("region_id", &self.region_id)
            .field("endpoint", &self.endpoint)
            .field("service", &self.service)
            .finish()
    }
}

// ============ Enumerations ============

/// Defines a string-valued enumeration with `as_str`, `Display` and `FromStr`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $value)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ResponseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(ResponseError::unmapped(stringify!($name), other)),
                }
            }
        }
    };
}

string_enum! {
    /// Lifecycle state of a compute node.
    pub enum NodeState {
        Pending => "pending",
        Starting => "starting",
        Running => "running",
        Rebooting => "rebooting",
        Stopping => "stopping",
        Stopped => "stopped",
        Suspended => "suspended",
        Terminating => "terminating",
        Terminated => "terminated",
        Error => "error",
    }
}

string_enum! {
    /// State of a block volume or volume snapshot.
    pub enum StorageVolumeState {
        Available => "available",
        Creating => "creating",
        InUse => "inuse",
        Restoring => "restoring",
        Deleting => "deleting",
        Error => "error",
    }
}

string_enum! {
    pub enum OsType {
        Linux => "linux",
        Windows => "windows",
    }
}

string_enum! {
    pub enum Architecture {
        X86 => "x86_64",
        Arm => "arm64",
    }
}

string_enum! {
    /// DNS resource record type.
    pub enum RecordType {
        A => "A",
        Aaaa => "AAAA",
        Cname => "CNAME",
        Mx => "MX",
        Txt => "TXT",
        Ns => "NS",
        Srv => "SRV",
        Caa => "CAA",
        Ptr => "PTR",
        Spf => "SPF",
        Https => "HTTPS",
        Svcb => "SVCB",
        /// Explicit URL forwarding (HTTP redirect).
        RedirectUrl => "REDIRECT_URL",
        /// Implicit URL forwarding (framed).
        ForwardUrl => "FORWARD_URL",
    }
}

// ============ Compute domain ============

/// A compute instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    pub state: Option<NodeState>,
    pub public_ip: String,
    pub private_ip: String,
    pub size: Option<NodeSize>,
    pub image: Option<NodeImage>,
    pub location: Option<Location>,
}

impl Node {
    /// Reference to an existing node by id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A purchasable compute configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSize {
    pub id: String,
    pub name: String,
    pub architecture: Option<Architecture>,
    pub gpu: u32,
    pub cpu: u32,
    /// Memory in MiB.
    pub ram: u64,
    /// Disk in GB.
    pub disk: u64,
}

impl NodeSize {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A bootable OS image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeImage {
    pub id: String,
    pub name: String,
    pub os_type: Option<OsType>,
}

impl NodeImage {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A provider region or availability zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

impl Location {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }
}

/// A block device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageVolume {
    pub id: String,
    pub name: String,
    /// Vendor disk category, e.g. `cloud_essd` or `CLOUD_PREMIUM`.
    pub volume_type: String,
    /// Size in GB.
    pub size: u64,
}

/// A point-in-time copy of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSnapshot {
    pub id: String,
    pub name: String,
    pub state: Option<StorageVolumeState>,
    /// Size in GB.
    pub size: u64,
    /// Id of the volume the snapshot was taken from, when the vendor reports it.
    #[serde(default)]
    pub volume_id: String,
}

/// Desired configuration of a new node. No defaults are applied locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeCreateOpts {
    pub name: String,
    pub size: NodeSize,
    pub image: NodeImage,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResizeOpts {
    pub size: NodeSize,
}

// ============ DNS domain ============

/// A DNS zone (hosted domain).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub domain: String,
    pub puny_code: String,
    pub dns_servers: Vec<String>,
    pub min_ttl: u32,
    pub description: String,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_time: Option<DateTime<Utc>>,
}

impl Zone {
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }
}

/// A resource record. `id` is unique within its zone only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub record_type: Option<RecordType>,
    pub value: String,
    pub ttl: u32,
    pub priority: u32,
    /// Routing line, provider specific (empty means the provider default).
    pub line: String,
}

impl Record {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_round_trips_through_str() {
        for rt in RecordType::ALL {
            assert_eq!(rt.as_str().parse::<RecordType>().unwrap(), *rt);
        }
    }

    #[test]
    fn unknown_enum_string_is_unmapped() {
        let err = "exploded".parse::<NodeState>().unwrap_err();
        assert_eq!(err.code, ResponseError::UNMAPPED_VALUE);
    }

    #[test]
    fn enums_serialize_as_strings() {
        assert_eq!(
            serde_json::to_value(NodeState::Running).unwrap(),
            serde_json::json!("running")
        );
        assert_eq!(
            serde_json::to_value(RecordType::RedirectUrl).unwrap(),
            serde_json::json!("REDIRECT_URL")
        );
        assert_eq!(
            serde_json::to_value(Architecture::Arm).unwrap(),
            serde_json::json!("arm64")
        );
    }

    #[test]
    fn request_param_debug_redacts_secret() {
        let rq = RequestParam::new("AKID", "super-secret").region("ap-guangzhou");
        let dbg = format!("{rq:?}");
        assert!(dbg.contains("AKID"));
        assert!(dbg.contains("ap-guangzhou"));
        assert!(!dbg.contains("super-secret"));
    }

    #[test]
    fn request_param_deserializes_camel_case() {
        let rq: RequestParam = serde_json::from_str(
            r#"{"secretId":"id","secretKey":"key","regionId":"cn-hangzhou"}"#,
        )
        .unwrap();
        assert_eq!(rq.secret_id, "id");
        assert_eq!(rq.region_id, "cn-hangzhou");
        assert!(rq.endpoint.is_empty());
    }

    #[test]
    fn zone_create_time_serializes_rfc3339() {
        let zone = Zone {
            domain: "example.com".into(),
            create_time: DateTime::from_timestamp(1_700_000_000, 0),
            ..Zone::default()
        };
        let json = serde_json::to_value(&zone).unwrap();
        assert_eq!(json["createTime"], "2023-11-14T22:13:20+00:00");

        let without = serde_json::to_value(Zone::with_domain("a.com")).unwrap();
        assert!(without.get("createTime").is_none());
    }
}
