//! Tencent Cloud API response structures (contents of the `Response` object)
//!
//! Tencent documents many fields as "may return null"; those go through
//! `nullable` so `null` reads like an absent field.

use serde::{Deserialize, Serialize};

use crate::utils::lenient::{null_as_default as nullable, string_from_any, u64_from_any};

/// Request filter, `{"Name": "disk-id", "Values": [...]}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter<'a> {
    pub name: &'a str,
    pub values: Vec<&'a str>,
}

// ============ CVM / CBS ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeCvmInstancesResponse {
    pub total_count: usize,
    #[serde(deserialize_with = "nullable")]
    pub instance_set: Vec<CvmInstance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CvmInstance {
    pub instance_id: String,
    pub instance_name: String,
    pub instance_state: String,
    pub instance_type: String,
    pub image_id: String,
    #[serde(deserialize_with = "nullable")]
    pub os_name: String,
    #[serde(rename = "CPU")]
    pub cpu: u32,
    /// GB
    pub memory: u64,
    pub placement: Placement,
    #[serde(deserialize_with = "nullable")]
    pub public_ip_addresses: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub private_ip_addresses: Vec<String>,
    pub system_disk: CvmDisk,
    #[serde(deserialize_with = "nullable")]
    pub data_disks: Vec<CvmDisk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Placement {
    pub zone: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CvmDisk {
    #[serde(deserialize_with = "nullable")]
    pub disk_id: String,
    pub disk_type: String,
    /// GB
    pub disk_size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceIdSetResponse {
    #[serde(deserialize_with = "nullable")]
    pub instance_id_set: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstancesStatusResponse {
    #[serde(deserialize_with = "nullable")]
    pub instance_status_set: Vec<InstanceStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceStatus {
    pub instance_state: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstanceVncUrlResponse {
    pub instance_vnc_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeSnapshotsResponse {
    #[serde(deserialize_with = "nullable")]
    pub snapshot_set: Vec<SnapshotInfo>,
}

/// CBS and Lighthouse share this shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SnapshotInfo {
    pub snapshot_id: String,
    #[serde(deserialize_with = "nullable")]
    pub snapshot_name: String,
    pub snapshot_state: String,
    /// GB
    pub disk_size: u64,
    #[serde(deserialize_with = "nullable")]
    pub disk_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SnapshotIdResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeImagesResponse {
    pub total_count: usize,
    #[serde(deserialize_with = "nullable")]
    pub image_set: Vec<CvmImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CvmImage {
    pub image_id: String,
    pub image_name: String,
    /// Distribution, e.g. `CentOS`, `Ubuntu`, `Windows`
    pub platform: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeZoneInstanceConfigInfosResponse {
    #[serde(deserialize_with = "nullable")]
    pub instance_type_quota_set: Vec<InstanceTypeQuota>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceTypeQuota {
    pub instance_type: String,
    pub cpu: u32,
    /// GB
    pub memory: u64,
    pub gpu: u32,
    /// e.g. `Intel Xeon Cascade Lake(2.5GHz/3.1GHz)`, `Ampere Altra(2.8GHz)`
    #[serde(deserialize_with = "nullable")]
    pub cpu_type: String,
    #[serde(deserialize_with = "nullable")]
    pub local_disk_type_list: Vec<LocalDiskType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LocalDiskType {
    pub min_size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeCvmZonesResponse {
    #[serde(deserialize_with = "nullable")]
    pub zone_set: Vec<ZoneInfo>,
}

/// Also an entry of Lighthouse `ZoneInfoSet`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ZoneInfo {
    pub zone: String,
    pub zone_name: String,
}

// ============ Lighthouse ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeLighthouseInstancesResponse {
    pub total_count: usize,
    #[serde(deserialize_with = "nullable")]
    pub instance_set: Vec<LighthouseInstance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LighthouseInstance {
    pub instance_id: String,
    pub instance_name: String,
    pub instance_state: String,
    pub bundle_id: String,
    pub blueprint_id: String,
    #[serde(rename = "CPU")]
    pub cpu: u32,
    /// GB
    pub memory: u64,
    pub zone: String,
    #[serde(deserialize_with = "nullable")]
    pub os_name: String,
    /// `LINUX_UNIX` or `WINDOWS`
    pub platform_type: String,
    #[serde(deserialize_with = "nullable")]
    pub public_addresses: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub private_addresses: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeBlueprintsResponse {
    #[serde(deserialize_with = "nullable")]
    pub blueprint_set: Vec<Blueprint>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Blueprint {
    pub blueprint_id: String,
    pub display_title: String,
    pub blueprint_name: String,
    pub platform_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeBundlesResponse {
    #[serde(deserialize_with = "nullable")]
    pub bundle_set: Vec<Bundle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Bundle {
    pub bundle_id: String,
    pub bundle_display_label: String,
    #[serde(rename = "CPU")]
    pub cpu: u32,
    /// GB, may be fractional
    pub memory: f64,
    pub system_disk_size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeLighthouseZonesResponse {
    #[serde(deserialize_with = "nullable")]
    pub zone_info_set: Vec<ZoneInfo>,
}

// ============ DNSPod ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDomainListResponse {
    #[serde(deserialize_with = "nullable")]
    pub domain_list: Vec<DnspodDomain>,
    #[serde(deserialize_with = "nullable")]
    pub domain_count_info: DomainCountInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DomainCountInfo {
    pub all_total: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DnspodDomain {
    #[serde(deserialize_with = "string_from_any")]
    pub domain_id: String,
    pub name: String,
    pub punycode: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "EffectiveDNS", deserialize_with = "nullable")]
    pub effective_dns: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub remark: String,
    /// `2021-05-21 11:07:16`, Beijing time
    pub created_on: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDomainResponse {
    pub domain_info: DnspodDomainInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DnspodDomainInfo {
    #[serde(deserialize_with = "string_from_any")]
    pub domain_id: String,
    pub domain: String,
    pub punycode: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(deserialize_with = "nullable")]
    pub dnspod_ns_list: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub remark: String,
    pub created_on: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateDomainResponse {
    pub domain_info: CreatedDomain,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreatedDomain {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    pub domain: String,
    pub punycode: String,
    #[serde(deserialize_with = "nullable")]
    pub grade_ns_list: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeRecordListResponse {
    #[serde(deserialize_with = "nullable")]
    pub record_list: Vec<DnspodRecord>,
    #[serde(deserialize_with = "nullable")]
    pub record_count_info: RecordCountInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecordCountInfo {
    pub total_count: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DnspodRecord {
    #[serde(deserialize_with = "string_from_any")]
    pub record_id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "MX", deserialize_with = "u64_from_any")]
    pub mx: u64,
    pub line: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeRecordResponse {
    pub record_info: DnspodRecordInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DnspodRecordInfo {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    pub sub_domain: String,
    pub record_type: String,
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "MX", deserialize_with = "u64_from_any")]
    pub mx: u64,
    pub record_line: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecordIdResponse {
    #[serde(deserialize_with = "string_from_any")]
    pub record_id: String,
}
