//! Tencent Cloud `DNSPod` driver

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{ClientError, ResponseError, Result};
use crate::mapping::MappingTable;
use crate::providers::common::{Page, collect_pages, vendor_record_type};
use crate::traits::DnsDriver;
use crate::types::{Record, RecordType, RequestParam, Zone};
use crate::utils::datetime::parse_vendor_time;

use super::types::{
    CreateDomainResponse, DescribeDomainListResponse, DescribeDomainResponse,
    DescribeRecordListResponse, DescribeRecordResponse, RecordIdResponse,
};
use super::{DNSPOD, Product, TencentClient, decode, failure};

const DOMAIN_LIMIT: u32 = 3000;
const RECORD_LIMIT: u32 = 3000;

/// `DNSPod`'s default routing line.
const DEFAULT_LINE: &str = "默认";

/// Returned instead of an empty list when an account has no domains.
const NO_DATA_OF_DOMAIN: &str = "ResourceNotFound.NoDataOfDomain";
/// Returned instead of an empty list when a domain has no records.
const NO_DATA_OF_RECORD: &str = "ResourceNotFound.NoDataOfRecord";

const RECORD_TYPES: &[(&str, RecordType)] = &[
    ("A", RecordType::A),
    ("AAAA", RecordType::Aaaa),
    ("CNAME", RecordType::Cname),
    ("MX", RecordType::Mx),
    ("TXT", RecordType::Txt),
    ("NS", RecordType::Ns),
    ("SRV", RecordType::Srv),
    ("CAA", RecordType::Caa),
    ("SPF", RecordType::Spf),
    ("HTTPS", RecordType::Https),
    ("SVCB", RecordType::Svcb),
    ("显性URL", RecordType::RedirectUrl),
    ("隐性URL", RecordType::ForwardUrl),
];

pub struct TencentDnspodDriver {
    client: TencentClient,
    record_types: MappingTable<RecordType>,
}

impl TencentDnspodDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(TencentClient::new(param))
    }

    pub fn with_client(client: TencentClient) -> Result<Self> {
        Ok(Self {
            client,
            record_types: MappingTable::new("dnspod.record_type", RECORD_TYPES)?,
        })
    }

    /// List call where `empty_code` means "nothing to list".
    async fn call_list<T: DeserializeOwned + Default>(
        &self,
        product: Product,
        action: &str,
        params: Value,
        empty_code: &str,
    ) -> Result<T> {
        match self.client.call_raw(product, action, params).await {
            Ok(value) => decode(action, value),
            Err(ClientError::Tencent(err)) if err.code == empty_code => Ok(T::default()),
            Err(err) => Err(failure(action, &err)),
        }
    }

    /// Fields shared by `CreateRecord` and `ModifyRecord`.
    fn record_params(&self, zone: &Zone, record: &Record) -> Result<Value> {
        let line = if record.line.is_empty() {
            DEFAULT_LINE
        } else {
            &record.line
        };
        let mut params = json!({
            "Domain": zone.domain,
            "SubDomain": record.name,
            "RecordType": vendor_record_type(&self.record_types, record)?,
            "RecordLine": line,
            "Value": record.value,
            "TTL": record.ttl,
        });
        if record.record_type == Some(RecordType::Mx) {
            params["MX"] = record.priority.into();
        }
        Ok(params)
    }
}

/// `DNSPod` record ids are integers on the wire.
fn numeric_record_id(record: &Record) -> Result<u64> {
    record
        .id
        .parse()
        .map_err(|_| ResponseError::create(&format!("invalid record id '{}'", record.id)))
}

fn priority(mx: u64) -> u32 {
    u32::try_from(mx).unwrap_or_default()
}

#[async_trait]
impl DnsDriver for TencentDnspodDriver {
    fn id(&self) -> &'static str {
        "tencent-dnspod"
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let domains = collect_pages(move |index| async move {
            let resp: DescribeDomainListResponse = self
                .call_list(
                    DNSPOD,
                    "DescribeDomainList",
                    json!({ "Offset": index * DOMAIN_LIMIT, "Limit": DOMAIN_LIMIT }),
                    NO_DATA_OF_DOMAIN,
                )
                .await?;
            Ok(Page {
                items: resp.domain_list,
                total: resp.domain_count_info.all_total,
            })
        })
        .await?;

        Ok(domains
            .into_iter()
            .map(|domain| Zone {
                create_time: parse_vendor_time(&domain.created_on),
                id: domain.domain_id,
                domain: domain.name,
                puny_code: domain.punycode,
                dns_servers: domain.effective_dns,
                min_ttl: domain.ttl,
                description: domain.remark,
            })
            .collect())
    }

    async fn detail_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let resp: DescribeDomainResponse = self
            .client
            .call(DNSPOD, "DescribeDomain", json!({ "Domain": zone.domain }))
            .await?;
        let info = resp.domain_info;

        Ok(Some(Zone {
            create_time: parse_vendor_time(&info.created_on),
            id: info.domain_id,
            domain: info.domain,
            puny_code: info.punycode,
            dns_servers: info.dnspod_ns_list,
            min_ttl: info.ttl,
            description: info.remark,
        }))
    }

    async fn create_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let resp: CreateDomainResponse = self
            .client
            .call(DNSPOD, "CreateDomain", json!({ "Domain": zone.domain }))
            .await?;
        let info = resp.domain_info;

        Ok(Some(Zone {
            id: info.id,
            domain: info.domain,
            puny_code: info.punycode,
            dns_servers: info.grade_ns_list,
            ..Zone::default()
        }))
    }

    /// Only the remark (`description`) is updatable.
    async fn update_zone(&self, zone: &Zone) -> Result<Option<Zone>> {
        let _: Value = self
            .client
            .call(
                DNSPOD,
                "ModifyDomainRemark",
                json!({ "Domain": zone.domain, "Remark": zone.description }),
            )
            .await?;
        Ok(Some(zone.clone()))
    }

    async fn delete_zone(&self, zone: &Zone) -> Result<()> {
        let _: Value = self
            .client
            .call(DNSPOD, "DeleteDomain", json!({ "Domain": zone.domain }))
            .await?;
        Ok(())
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        let records = collect_pages(move |index| async move {
            let resp: DescribeRecordListResponse = self
                .call_list(
                    DNSPOD,
                    "DescribeRecordList",
                    json!({
                        "Domain": zone.domain,
                        "Offset": index * RECORD_LIMIT,
                        "Limit": RECORD_LIMIT,
                    }),
                    NO_DATA_OF_RECORD,
                )
                .await?;
            Ok(Page {
                items: resp.record_list,
                total: resp.record_count_info.total_count,
            })
        })
        .await?;

        records
            .into_iter()
            .map(|record| {
                Ok(Record {
                    record_type: self.record_types.lookup_opt(Some(&record.record_type))?,
                    id: record.record_id,
                    name: record.name,
                    value: record.value,
                    ttl: record.ttl,
                    priority: priority(record.mx),
                    line: record.line,
                })
            })
            .collect()
    }

    async fn detail_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let resp: DescribeRecordResponse = self
            .client
            .call(
                DNSPOD,
                "DescribeRecord",
                json!({ "Domain": zone.domain, "RecordId": numeric_record_id(record)? }),
            )
            .await?;
        let info = resp.record_info;

        Ok(Some(Record {
            record_type: self.record_types.lookup_opt(Some(&info.record_type))?,
            id: info.id,
            name: info.sub_domain,
            value: info.value,
            ttl: info.ttl,
            priority: priority(info.mx),
            line: info.record_line,
        }))
    }

    async fn create_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let params = self.record_params(zone, record)?;
        let resp: RecordIdResponse = self.client.call(DNSPOD, "CreateRecord", params).await?;

        Ok(Some(Record {
            id: resp.record_id,
            ..record.clone()
        }))
    }

    async fn update_record(&self, zone: &Zone, record: &Record) -> Result<Option<Record>> {
        let mut params = self.record_params(zone, record)?;
        params["RecordId"] = numeric_record_id(record)?.into();

        let _: RecordIdResponse = self.client.call(DNSPOD, "ModifyRecord", params).await?;
        Ok(Some(record.clone()))
    }

    async fn delete_record(&self, zone: &Zone, record: &Record) -> Result<()> {
        let _: Value = self
            .client
            .call(
                DNSPOD,
                "DeleteRecord",
                json!({ "Domain": zone.domain, "RecordId": numeric_record_id(record)? }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> TencentDnspodDriver {
        TencentDnspodDriver::new(RequestParam::new("id", "key")).unwrap()
    }

    #[test]
    fn url_forwarding_uses_chinese_labels() {
        let d = driver();
        assert_eq!(
            d.record_types.vendor_value(RecordType::RedirectUrl).unwrap(),
            "显性URL"
        );
        assert_eq!(
            d.record_types.lookup("隐性URL").unwrap(),
            RecordType::ForwardUrl
        );
    }

    #[test]
    fn record_params_defaults_line_and_sets_mx() {
        let d = driver();
        let zone = Zone::with_domain("example.com");
        let record = Record {
            name: "@".into(),
            record_type: Some(RecordType::Mx),
            value: "mx.example.com".into(),
            ttl: 600,
            priority: 10,
            ..Record::default()
        };

        let params = d.record_params(&zone, &record).unwrap();
        assert_eq!(params["RecordLine"], DEFAULT_LINE);
        assert_eq!(params["MX"], 10);
        assert_eq!(params["RecordType"], "MX");

        let a = Record {
            record_type: Some(RecordType::A),
            line: "电信".into(),
            ..record
        };
        let params = d.record_params(&zone, &a).unwrap();
        assert_eq!(params["RecordLine"], "电信");
        assert!(params.get("MX").is_none());
    }

    #[test]
    fn ptr_records_are_not_supported() {
        let record = Record {
            record_type: Some(RecordType::Ptr),
            ..Record::default()
        };
        let err = driver()
            .record_params(&Zone::with_domain("example.com"), &record)
            .unwrap_err();
        assert_eq!(err.code, ResponseError::UNMAPPED_VALUE);
    }

    #[test]
    fn record_ids_must_be_numeric() {
        assert_eq!(numeric_record_id(&Record::with_id("1234")).unwrap(), 1234);
        assert!(numeric_record_id(&Record::with_id("rec-1")).is_err());
    }
}
