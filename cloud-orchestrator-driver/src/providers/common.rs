//! Helpers shared by the vendor modules

use std::fmt::Write;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::error::{ResponseError, Result};
use crate::mapping::MappingTable;
use crate::transport::TransportOptions;
use crate::types::{Record, RecordType};

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// Creates a `reqwest` client with the transport timeouts applied.
pub fn create_http_client(options: &TransportOptions) -> Client {
    Client::builder()
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout)
        .build()
        .expect("Failed to create HTTP client")
}

// ============ Hashing ============

pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// ============ Encoding ============

/// RFC3986 percent encoding (unreserved characters kept as is).
pub fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                let _ = write!(result, "%{byte:02X}");
            }
        }
    }
    result
}

// ============ Paging ============

/// One page of a vendor listing plus the total the vendor reports.
pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Fetches pages (0-based index) until the reported total is reached or a
/// page comes back empty.
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut index = 0;
    loop {
        let page = fetch(index).await?;
        let fetched = page.items.len();
        items.extend(page.items);
        if fetched == 0 || items.len() >= page.total {
            return Ok(items);
        }
        index += 1;
    }
}

// ============ Domain names ============

/// Drop the trailing root dot.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// `www.example.com` + `example.com` -> `www`; the apex becomes `@`.
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full.eq_ignore_ascii_case(&zone) {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// `www` + `example.com` -> `www.example.com`; `@` and empty become the apex.
/// Names already inside the zone are left alone.
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    let name = normalize_domain_name(relative_name);

    if name == "@" || name.is_empty() {
        zone
    } else if name.eq_ignore_ascii_case(&zone) || name.ends_with(&format!(".{zone}")) {
        name
    } else {
        format!("{name}.{zone}")
    }
}

/// Vendor memory in GiB (possibly fractional) to MiB.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn gib_to_mib(gib: f64) -> u64 {
    (gib.max(0.0) * 1024.0).round() as u64
}

// ============ Records ============

/// Vendor spelling of the record's type; a record without a type is rejected
/// before any request is made.
pub(crate) fn vendor_record_type(
    table: &MappingTable<RecordType>,
    record: &Record,
) -> Result<&'static str> {
    match record.record_type {
        Some(record_type) => table.vendor_value(record_type),
        None => Err(ResponseError::create(&"record type is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encode_rfc3986() {
        assert_eq!(url_encode("abc-_.~"), "abc-_.~");
        assert_eq!(url_encode("a b"), "a%20b");
        assert_eq!(url_encode("[\"i-1\"]"), "%5B%22i-1%22%5D");
        assert_eq!(url_encode("默"), "%E9%BB%98");
    }

    #[test]
    fn sha256_of_empty_body() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn relative_names() {
        assert_eq!(full_name_to_relative("www.example.com", "example.com"), "www");
        assert_eq!(full_name_to_relative("example.com.", "example.com"), "@");
        assert_eq!(full_name_to_relative("other.org", "example.com"), "other.org");
    }

    #[test]
    fn full_names() {
        assert_eq!(relative_to_full_name("www", "example.com"), "www.example.com");
        assert_eq!(relative_to_full_name("@", "example.com"), "example.com");
        assert_eq!(relative_to_full_name("", "example.com"), "example.com");
        assert_eq!(
            relative_to_full_name("www.example.com", "example.com"),
            "www.example.com"
        );
    }

    #[test]
    fn memory_gib_to_mib() {
        assert_eq!(gib_to_mib(0.5), 512);
        assert_eq!(gib_to_mib(16.0), 16384);
        assert_eq!(gib_to_mib(-1.0), 0);
    }

    #[tokio::test]
    async fn pages_until_total() {
        let mut requested = Vec::new();
        let items = collect_pages(|index| {
            requested.push(index);
            let start = index * 2;
            async move {
                Ok(Page {
                    items: (start..(start + 2).min(5)).collect(),
                    total: 5,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, [0, 1, 2, 3, 4]);
        assert_eq!(requested, [0, 1, 2]);
    }

    #[tokio::test]
    async fn paging_stops_on_empty_page() {
        let mut calls = 0;
        let items: Vec<u32> = collect_pages(|_| {
            calls += 1;
            async { Ok(Page { items: vec![], total: 10 }) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls, 1);
    }

    #[test]
    fn record_type_is_required() {
        let table = MappingTable::new("test.record_type", &[("A", RecordType::A)]).unwrap();
        let mut record = Record::with_id("1");
        assert!(vendor_record_type(&table, &record).is_err());

        record.record_type = Some(RecordType::A);
        assert_eq!(vendor_record_type(&table, &record).unwrap(), "A");

        record.record_type = Some(RecordType::Svcb);
        let err = vendor_record_type(&table, &record).unwrap_err();
        assert_eq!(err.code, ResponseError::UNMAPPED_VALUE);
    }
}
