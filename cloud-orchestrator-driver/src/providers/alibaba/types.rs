//! Alibaba Cloud API response structures

use serde::Deserialize;

use crate::utils::lenient::u64_from_any;

// ============ ECS ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstancesResponse {
    pub total_count: usize,
    pub instances: EcsInstances,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsInstances {
    pub instance: Vec<EcsInstance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsInstance {
    pub instance_id: String,
    pub instance_name: String,
    pub status: String,
    #[serde(rename = "OSType")]
    pub os_type: String,
    #[serde(rename = "OSName")]
    pub os_name: String,
    pub image_id: String,
    pub instance_type: String,
    pub zone_id: String,
    pub region_id: String,
    pub cpu: u32,
    /// MiB
    pub memory: u64,
    pub public_ip_address: IpAddressSet,
    pub inner_ip_address: IpAddressSet,
    pub eip_address: EipAddress,
    pub vpc_attributes: VpcAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IpAddressSet {
    pub ip_address: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EipAddress {
    pub ip_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcAttributes {
    pub private_ip_address: IpAddressSet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateInstanceResponse {
    pub instance_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstanceVncUrlResponse {
    pub vnc_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDisksResponse {
    pub disks: EcsDisks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsDisks {
    pub disk: Vec<EcsDisk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsDisk {
    pub disk_id: String,
    pub disk_name: String,
    /// `cloud_essd`, `cloud_efficiency`, ...
    pub category: String,
    /// `system` or `data`
    #[serde(rename = "Type")]
    pub disk_type: String,
    #[serde(deserialize_with = "u64_from_any")]
    pub size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeSnapshotsResponse {
    pub snapshots: EcsSnapshots,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsSnapshots {
    pub snapshot: Vec<EcsSnapshot>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsSnapshot {
    pub snapshot_id: String,
    pub snapshot_name: String,
    /// `progressing`, `accomplished` or `failed`
    pub status: String,
    #[serde(deserialize_with = "u64_from_any")]
    pub source_disk_size: u64,
    pub source_disk_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateSnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeImagesResponse {
    pub images: EcsImages,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsImages {
    pub image: Vec<EcsImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsImage {
    pub image_id: String,
    pub image_name: String,
    #[serde(rename = "OSType")]
    pub os_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstanceTypesResponse {
    pub instance_types: EcsInstanceTypes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsInstanceTypes {
    pub instance_type: Vec<EcsInstanceType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsInstanceType {
    pub instance_type_id: String,
    pub instance_type_family: String,
    /// `X86` or `ARM`
    pub cpu_architecture: String,
    #[serde(rename = "GPUAmount")]
    pub gpu_amount: u32,
    pub cpu_core_count: u32,
    /// GiB, may be fractional
    pub memory_size: f64,
    #[serde(deserialize_with = "u64_from_any")]
    pub local_storage_capacity: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeRegionsResponse {
    pub regions: EcsRegions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EcsRegions {
    pub region: Vec<AlibabaRegion>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlibabaRegion {
    pub region_id: String,
    pub local_name: String,
}

// ============ SWAS ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListInstancesResponse {
    pub total_count: usize,
    pub instances: Vec<SwasInstance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SwasInstance {
    pub instance_id: String,
    pub instance_name: String,
    pub status: String,
    pub public_ip_address: String,
    pub inner_ip_address: String,
    pub plan_id: String,
    pub image_id: String,
    pub region_id: String,
    pub image: SwasInstanceImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SwasInstanceImage {
    pub image_name: String,
    pub os_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListImagesResponse {
    pub images: Vec<SwasImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SwasImage {
    pub image_id: String,
    pub image_name: String,
    pub os_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListPlansResponse {
    pub plans: Vec<SwasPlan>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SwasPlan {
    pub plan_id: String,
    pub core: u32,
    /// GiB, may be fractional
    pub memory: f64,
    pub disk_size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListRegionsResponse {
    pub regions: Vec<AlibabaRegion>,
}

// ============ Alidns ============

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDomainsResponse {
    pub total_count: usize,
    pub domains: AlidnsDomains,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlidnsDomains {
    pub domain: Vec<AlidnsDomain>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DnsServers {
    pub dns_server: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlidnsDomain {
    pub domain_id: String,
    pub domain_name: String,
    pub puny_code: String,
    pub dns_servers: DnsServers,
    /// Milliseconds since epoch
    pub create_timestamp: i64,
    pub remark: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDomainInfoResponse {
    pub domain_id: String,
    pub domain_name: String,
    pub puny_code: String,
    pub dns_servers: DnsServers,
    pub min_ttl: u32,
    pub remark: String,
    /// e.g. `2019-01-30T05:48Z`
    pub create_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AddDomainResponse {
    pub domain_id: String,
    pub domain_name: String,
    pub puny_code: String,
    pub dns_servers: DnsServers,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDomainRecordsResponse {
    pub total_count: usize,
    pub domain_records: AlidnsRecords,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlidnsRecords {
    pub record: Vec<AlidnsRecord>,
}

/// Also the body of `DescribeDomainRecordInfo`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AlidnsRecord {
    pub record_id: String,
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    pub priority: u32,
    pub line: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RecordIdResponse {
    pub record_id: String,
}
