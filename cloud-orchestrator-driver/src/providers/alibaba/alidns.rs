//! Alibaba Cloud DNS (Alidns) driver

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mapping::MappingTable;
use crate::providers::common::{Page, collect_pages, vendor_record_type};
use crate::traits::DnsDriver;
use crate::types::{Record, RecordType, RequestParam, Zone};
use crate::utils::datetime::{parse_unix_timestamp, parse_vendor_time};

use super::types::{
    AddDomainResponse, AlidnsRecord, DescribeDomainInfoResponse, DescribeDomainRecordsResponse,
    DescribeDomainsResponse, RecordIdResponse,
};
use super::{ALIDNS, AlibabaClient};

const DOMAIN_PAGE_SIZE: u32 = 100;
const RECORD_PAGE_SIZE: u32 = 500;

const RECORD_TYPES: &[(&str, RecordType)] = &[
    ("A", RecordType::A),
    ("AAAA", RecordType::Aaaa),
    ("CNAME", RecordType::Cname),
    ("MX", RecordType::Mx),
    ("TXT", RecordType::Txt),
    ("NS", RecordType::Ns),
    ("SRV", RecordType::Srv),
    ("CAA", RecordType::Caa),
    ("HTTPS", RecordType::Https),
    ("SVCB", RecordType::Svcb),
    ("REDIRECT_URL", RecordType::RedirectUrl),
    ("FORWARD_URL", RecordType::ForwardUrl),
];

pub struct AlibabaAlidnsDriver {
    client: AlibabaClient,
    record_types: MappingTable<RecordType>,
}

impl AlibabaAlidnsDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(AlibabaClient::new(param))
    }

    pub fn with_client(client: AlibabaClient) -> Result<Self> {
        Ok(Self {
            client,
            record_types: MappingTable::new("alidns.record_type", RECORD_TYPES)?,
        })
    }

    fn to_record(&self, record: AlidnsRecord) -> Result<Record> {
        Ok(Record {
            record_type: self.record_types.lookup_opt(Some(&record.record_type))?,
            id: record.record_id,
            name: record.rr,
            value: record.value,
            ttl: record.ttl,
            priority: record.priority,
            line: record.line,
        })
    }

    /// Fields shared by `AddDomainRecord` and `UpdateDomainRecord`.
    fn record_params(&self, record: &Record) -> Result<Value> {
        let mut params = json!({
            "RR": record.name,
            "Type": vendor_record_type(&self.record_types, record)?,
            "Value": record.value,
            "TTL": record.ttl,
        });
        if record.record_type == Some(RecordType::Mx) {
            params["Priority"] = record.priority.into();
        }
        if !record.line.is_empty() {
            params["Line"] = record.line.clone().into();
        }
        Ok(params)
    }
}

#[async_trait]
impl DnsDriver for AlibabaAlidnsDriver {
    fn id(&self) -> &'static str {
        "alibaba-alidns"
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let domains = collect_pages(move |index| async move {
            let resp: DescribeDomainsResponse = self
                .client
                .call(
                    ALIDNS,
                    "DescribeDomains",
                    json!({ "PageSize": DOMAIN_PAGE_SIZE, "PageNumber": index + 1 }),
                )
                .await?;
            Ok(Page {
                items: resp.domains.domain,
                total: resp.total_count,
            })
        })
        .await?;

        Ok(domains
            .into_iter()
            .map(|domain| Zone {
                id: domain.domain_id,
                domain: domain.domain_name,
                puny_code: domain.puny_code,
                dns_servers: domain.dns_servers.dns_server,
                description: domain.remark,
                create_time: Some(domain.create_timestamp)
                    .filter(|ts| *ts > 0)
                    .and_then(parse_unix_timestamp),
                ..Zone::default()
            })
            .collect())
    }

    async fn detail_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let resp: DescribeDomainInfoResponse = self
            .client
            .call(
                ALIDNS,
                "DescribeDomainInfo",
                json!({ "DomainName": zone.domain }),
            )
            .await?;

        Ok(Some(Zone {
            create_time: parse_vendor_time(&resp.create_time),
            id: resp.domain_id,
            domain: resp.domain_name,
            puny_code: resp.puny_code,
            dns_servers: resp.dns_servers.dns_server,
            min_ttl: resp.min_ttl,
            description: resp.remark,
        }))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let resp: AddDomainResponse = self
            .client
            .call(ALIDNS, "AddDomain", json!({ "DomainName": zone.domain }))
            .await?;

        Ok(Some(Zone {
            id: resp.domain_id,
            domain: resp.domain_name,
            puny_code: resp.puny_code,
            dns_servers: resp.dns_servers.dns_server,
            ..Zone::default()
        }))
    }

    /// Only the remark (`description`) is updatable.
    async fn update_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let _: Value = self
            .client
            .call(
                ALIDNS,
                "UpdateDomainRemark",
                json!({ "DomainName": zone.domain, "Remark": zone.description }),
            )
            .await?;
        Ok(Some(zone.clone()))
    }

    async fn delete_zone(&self, zone: &Zone) -> Result<()> {
        let _: Value = self
            .client
            .call(ALIDNS, "DeleteDomain", json!({ "DomainName": zone.domain }))
            .await?;
        Ok(())
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        let records = collect_pages(move |index| async move {
            let resp: DescribeDomainRecordsResponse = self
                .client
                .call(
                    ALIDNS,
                    "DescribeDomainRecords",
                    json!({
                        "DomainName": zone.domain,
                        "PageSize": RECORD_PAGE_SIZE,
                        "PageNumber": index + 1,
                    }),
                )
                .await?;
            Ok(Page {
                items: resp.domain_records.record,
                total: resp.total_count,
            })
        })
        .await?;

        records
            .into_iter()
            .map(|record| self.to_record(record))
            .collect()
    }

    async fn detail_record(&self, _zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let resp: AlidnsRecord = self
            .client
            .call(
                ALIDNS,
                "DescribeDomainRecordInfo",
                json!({ "RecordId": record.id }),
            )
            .await?;
        self.to_record(resp).map(Some)
    }

    async fn create_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let mut params = self.record_params(record)?;
        params["DomainName"] = zone.domain.clone().into();

        let resp: RecordIdResponse = self.client.call(ALIDNS, "AddDomainRecord", params).await?;

        Ok(Some(Record {
            id: resp.record_id,
            ..record.clone()
        }))
    }

    async fn update_record(&self, _zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let mut params = self.record_params(record)?;
        params["RecordId"] = record.id.clone().into();

        let _: RecordIdResponse = self
            .client
            .call(ALIDNS, "UpdateDomainRecord", params)
            .await?;
        Ok(Some(record.clone()))
    }

    async fn delete_record(&self, _zone: &Zone, record: &Record) -> Result<()> {
        let _: Value = self
            .client
            .call(
                ALIDNS,
                "DeleteDomainRecord",
                json!({ "RecordId": record.id }),
            )
            .await?;
        Ok(())
    }
}
