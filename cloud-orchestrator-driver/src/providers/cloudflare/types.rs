//! Cloudflare API v4 payloads

use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint; `success` and `errors` are
/// checked by the transport.
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub result: Option<T>,
    pub result_info: Option<CloudflareResultInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CloudflareResultInfo {
    pub total_pages: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    pub name_servers: Vec<String>,
    pub created_on: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully qualified record name.
    pub name: String,
    pub content: String,
    /// `1` means automatic.
    pub ttl: u32,
    pub priority: Option<u32>,
}

/// Body of `POST /zones`.
#[derive(Debug, Serialize)]
pub struct CreateZoneBody<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub zone_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountRef<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AccountRef<'a> {
    pub id: &'a str,
}

/// Body of record create (`POST`) and overwrite (`PUT`).
#[derive(Debug, Serialize)]
pub struct RecordBody<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: String,
    pub content: &'a str,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}
