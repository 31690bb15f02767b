//! Cloudflare DNS driver
//!
//! Zones are addressed by id. When a [`Zone`] carries only its domain the id
//! is looked up first. Record names travel fully qualified on the wire and are
//! returned relative to the zone (`@`, `www`) when the zone domain is known.

use async_trait::async_trait;

use crate::error::{ResponseError, Result};
use crate::mapping::MappingTable;
use crate::providers::common::{full_name_to_relative, relative_to_full_name, vendor_record_type};
use crate::traits::DnsDriver;
use crate::types::{Record, RecordType, RequestParam, Zone};
use crate::utils::datetime::parse_vendor_time;

use super::types::{AccountRef, CloudflareDnsRecord, CloudflareZone, CreateZoneBody, RecordBody};
use super::{CloudflareClient, MAX_PAGE_SIZE_RECORDS, MAX_PAGE_SIZE_ZONES};

const RECORD_TYPES: &[(&str, RecordType)] = &[
    ("A", RecordType::A),
    ("AAAA", RecordType::Aaaa),
    ("CNAME", RecordType::Cname),
    ("MX", RecordType::Mx),
    ("TXT", RecordType::Txt),
    ("NS", RecordType::Ns),
    ("SRV", RecordType::Srv),
    ("CAA", RecordType::Caa),
    ("PTR", RecordType::Ptr),
    ("SPF", RecordType::Spf),
    ("HTTPS", RecordType::Https),
    ("SVCB", RecordType::Svcb),
];

pub struct CloudflareDnsDriver {
    client: CloudflareClient,
    record_types: MappingTable<RecordType>,
}

impl CloudflareDnsDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(CloudflareClient::new(param))
    }

    pub fn with_client(client: CloudflareClient) -> Result<Self> {
        Ok(Self {
            client,
            record_types: MappingTable::new("cloudflare.record_type", RECORD_TYPES)?,
        })
    }

    /// The zone's id, looked up by domain when the caller did not supply one.
    async fn zone_id(&self, zone: &Zone) -> Result<Option<String>> {
        if !zone.id.is_empty() {
            return Ok(Some(zone.id.clone()));
        }
        if zone.domain.is_empty() {
            return Ok(None);
        }
        self.client.find_zone_id(&zone.domain).await
    }

    async fn require_zone_id(&self, zone: &Zone) -> Result<String> {
        self.zone_id(zone).await?.ok_or_else(|| {
            ResponseError::create(&format!("zone '{}' not found", zone.domain))
        })
    }

    fn to_record(&self, record: CloudflareDnsRecord, zone_name: &str) -> Result<Record> {
        Ok(Record {
            record_type: self.record_types.lookup_opt(Some(&record.record_type))?,
            name: if zone_name.is_empty() {
                record.name
            } else {
                full_name_to_relative(&record.name, zone_name)
            },
            id: record.id,
            value: record.content,
            ttl: record.ttl,
            priority: record.priority.unwrap_or_default(),
            line: String::new(),
        })
    }

    fn record_body<'a>(&self, zone: &Zone, record: &'a Record) -> Result<RecordBody<'a>> {
        Ok(RecordBody {
            record_type: vendor_record_type(&self.record_types, record)?,
            name: if zone.domain.is_empty() {
                record.name.clone()
            } else {
                relative_to_full_name(&record.name, &zone.domain)
            },
            content: &record.value,
            ttl: record.ttl,
            priority: matches!(record.record_type, Some(RecordType::Mx | RecordType::Srv))
                .then_some(record.priority),
        })
    }
}

fn to_zone(zone: CloudflareZone) -> Zone {
    Zone {
        create_time: parse_vendor_time(&zone.created_on),
        id: zone.id,
        domain: zone.name,
        dns_servers: zone.name_servers,
        ..Zone::default()
    }
}

fn to_json<T: serde::Serialize>(body: &T) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ResponseError::create(&e))
}

#[async_trait]
impl DnsDriver for CloudflareDnsDriver {
    fn id(&self) -> &'static str {
        "cloudflare-dns"
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones: Vec<CloudflareZone> =
            self.client.get_all("/zones", MAX_PAGE_SIZE_ZONES).await?;
        Ok(zones.into_iter().map(to_zone).collect())
    }

    async fn detail_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let Some(zone_id) = self.zone_id(zone).await? else {
            return Ok(None);
        };
        let detail: CloudflareZone = self.client.get(&format!("/zones/{zone_id}")).await?;
        Ok(Some(to_zone(detail)))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let account_id = &self.client.param().secret_id;
        let body = CreateZoneBody {
            name: &zone.domain,
            zone_type: "full",
            account: (!account_id.is_empty()).then_some(AccountRef { id: account_id }),
        };

        let created: CloudflareZone = self.client.post("/zones", to_json(&body)?).await?;
        Ok(Some(to_zone(created)))
    }

    /// Zones have no writable field in this model; confirms the zone exists.
    async fn update_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let zone_id = self.require_zone_id(zone).await?;
        let _: CloudflareZone = self.client.get(&format!("/zones/{zone_id}")).await?;
        Ok(Some(zone.clone()))
    }

    async fn delete_zone(&self, zone: &Zone) -> Result<()> {
        let zone_id = self.require_zone_id(zone).await?;
        self.client.delete(&format!("/zones/{zone_id}")).await
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        let Some(zone_id) = self.zone_id(zone).await? else {
            return Ok(Vec::new());
        };
        let records: Vec<CloudflareDnsRecord> = self
            .client
            .get_all(
                &format!("/zones/{zone_id}/dns_records"),
                MAX_PAGE_SIZE_RECORDS,
            )
            .await?;

        records
            .into_iter()
            .map(|record| self.to_record(record, &zone.domain))
            .collect()
    }

    async fn detail_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let Some(zone_id) = self.zone_id(zone).await? else {
            return Ok(None);
        };
        let detail: CloudflareDnsRecord = self
            .client
            .get(&format!("/zones/{zone_id}/dns_records/{}", record.id))
            .await?;
        self.to_record(detail, &zone.domain).map(Some)
    }

    async fn create_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let zone_id = self.require_zone_id(zone).await?;
        let body = to_json(&self.record_body(zone, record)?)?;

        let created: CloudflareDnsRecord = self
            .client
            .post(&format!("/zones/{zone_id}/dns_records"), body)
            .await?;
        self.to_record(created, &zone.domain).map(Some)
    }

    /// Overwrites the record identified by `record.id`.
    async fn update_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let zone_id = self.require_zone_id(zone).await?;
        let body = to_json(&self.record_body(zone, record)?)?;

        let updated: CloudflareDnsRecord = self
            .client
            .put(&format!("/zones/{zone_id}/dns_records/{}", record.id), body)
            .await?;
        self.to_record(updated, &zone.domain).map(Some)
    }

    async fn delete_record(&self, zone: &Zone, record: &Record) -> Result<()> {
        let zone_id = self.require_zone_id(zone).await?;
        self.client
            .delete(&format!("/zones/{zone_id}/dns_records/{}", record.id))
            .await
    }
}
