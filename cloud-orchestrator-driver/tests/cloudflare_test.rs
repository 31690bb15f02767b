//! Cloudflare DNS driver tests against a scripted transport.
//!
//! Live tests are ignored by default:
//! ```bash
//! CLOUDFLARE_API_TOKEN=xxx TEST_DOMAIN=example.com \
//!     cargo test -p cloud-orchestrator-driver --test cloudflare_test -- --ignored --nocapture
//! ```

#![cfg(feature = "cloudflare")]

mod common;

use std::sync::Arc;

use common::{MockTransport, cloudflare_error, live_param, test_param};
use cloud_orchestrator_driver::{
    CloudflareClient, CloudflareDnsDriver, DnsDriver, Record, RecordType, Zone,
};
use reqwest::Method;
use serde_json::{Value, json};

fn driver(mock: &Arc<MockTransport>) -> CloudflareDnsDriver {
    CloudflareDnsDriver::with_client(CloudflareClient::with_transport(test_param(), mock.clone()))
        .unwrap()
}

fn envelope(result: Value) -> Value {
    json!({ "success": true, "errors": [], "messages": [], "result": result })
}

fn page(result: Value, page: u32, total_pages: u32) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result,
        "result_info": { "page": page, "per_page": 100, "total_pages": total_pages }
    })
}

fn zone_with_id() -> Zone {
    Zone {
        id: "023e105f4ecef8ad9ca31a8372d0c353".into(),
        ..Zone::with_domain("example.com")
    }
}

const RECORDS_PATH: &str = "GET /zones/023e105f4ecef8ad9ca31a8372d0c353/dns_records";

#[tokio::test]
async fn test_cloudflare_create_then_list_zone() {
    let mock = MockTransport::new();
    let zone = json!({
        "id": "023e105f4ecef8ad9ca31a8372d0c353",
        "name": "example.com",
        "status": "pending",
        "name_servers": ["bob.ns.cloudflare.com", "lola.ns.cloudflare.com"],
        "created_on": "2024-01-01T05:20:00.12345Z"
    });
    mock.respond("POST /zones", envelope(zone.clone())).await;
    mock.respond("GET /zones", page(json!([zone]), 1, 1)).await;

    let driver = driver(&mock);
    let created = require_some!(require_ok!(
        driver.create_zone(&Zone::with_domain("example.com")).await
    ));
    assert_eq!(created.id, "023e105f4ecef8ad9ca31a8372d0c353");
    assert!(created.create_time.is_some());

    let zones = require_ok!(driver.list_zones().await);
    let listed = require_some!(zones.iter().find(|z| z.id == created.id));
    assert_eq!(listed.domain, "example.com");
    assert_eq!(listed.dns_servers.len(), 2);

    let post = &mock.calls_to("POST /zones").await[0];
    assert_eq!(post.method, Method::POST);
    assert_eq!(post.params["name"], "example.com");
    assert_eq!(post.params["type"], "full");
    assert_eq!(post.params["account"]["id"], "test-secret-id");
}

#[tokio::test]
async fn test_cloudflare_list_records_follows_pages() {
    let mock = MockTransport::new();
    mock.respond(
        RECORDS_PATH,
        page(
            json!([
                { "id": "r1", "type": "A", "name": "example.com", "content": "192.0.2.1", "ttl": 1 },
                { "id": "r2", "type": "A", "name": "www.example.com", "content": "192.0.2.2", "ttl": 300 }
            ]),
            1,
            2,
        ),
    )
    .await;
    mock.respond(
        RECORDS_PATH,
        page(
            json!([
                { "id": "r3", "type": "MX", "name": "example.com", "content": "mx.example.com",
                  "ttl": 3600, "priority": 10 }
            ]),
            2,
            2,
        ),
    )
    .await;

    let records = require_ok!(driver(&mock).list_records(&zone_with_id()).await);

    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["@", "www", "@"]);
    assert_eq!(records[2].record_type, Some(RecordType::Mx));
    assert_eq!(records[2].priority, 10);

    let calls = mock.calls_to(RECORDS_PATH).await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].params["page"], 1);
    assert_eq!(calls[1].params["page"], 2);
    assert_eq!(calls[1].params["per_page"], 100);
}

#[tokio::test]
async fn test_cloudflare_zone_id_looked_up_by_domain() {
    let mock = MockTransport::new();
    mock.respond(
        "GET /zones",
        page(
            json!([{ "id": "023e105f4ecef8ad9ca31a8372d0c353", "name": "example.com" }]),
            1,
            1,
        ),
    )
    .await;
    mock.respond(RECORDS_PATH, page(json!([]), 1, 0)).await;

    let records = require_ok!(
        driver(&mock)
            .list_records(&Zone::with_domain("example.com"))
            .await
    );
    assert!(records.is_empty());

    let lookup = &mock.calls_to("GET /zones").await[0];
    assert_eq!(lookup.params["name"], "example.com");
}

#[tokio::test]
async fn test_cloudflare_mutation_on_unknown_zone_fails() {
    let mock = MockTransport::new();
    mock.respond("GET /zones", page(json!([]), 1, 0)).await;

    let record = Record {
        name: "www".into(),
        record_type: Some(RecordType::A),
        value: "192.0.2.1".into(),
        ttl: 1,
        ..Record::default()
    };
    let err = driver(&mock)
        .create_record(&Zone::with_domain("missing.example"), &record)
        .await
        .unwrap_err();
    assert!(err.message.contains("missing.example"));

    let calls = mock.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
}

#[tokio::test]
async fn test_cloudflare_unknown_record_is_normalized() {
    let mock = MockTransport::new();
    mock.fail(
        &format!("{RECORDS_PATH}/missing"),
        cloudflare_error(404, 81044, "Record does not exist."),
    )
    .await;

    let err = driver(&mock)
        .detail_record(&zone_with_id(), &Record::with_id("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.code, "81044");
    assert_eq!(err.message, "Record does not exist.");
}

#[tokio::test]
async fn test_cloudflare_update_record_puts_full_name() {
    let mock = MockTransport::new();
    mock.respond(
        "PUT /zones/023e105f4ecef8ad9ca31a8372d0c353/dns_records/r2",
        envelope(json!({
            "id": "r2", "type": "CNAME", "name": "www.example.com",
            "content": "example.com", "ttl": 300
        })),
    )
    .await;

    let record = Record {
        id: "r2".into(),
        name: "www".into(),
        record_type: Some(RecordType::Cname),
        value: "example.com".into(),
        ttl: 300,
        ..Record::default()
    };
    let updated = require_some!(require_ok!(
        driver(&mock).update_record(&zone_with_id(), &record).await
    ));
    assert_eq!(updated, record);

    let put = &mock.calls().await[0];
    assert_eq!(put.params["name"], "www.example.com");
    assert_eq!(put.params["type"], "CNAME");
}

#[tokio::test]
async fn test_cloudflare_detail_unknown_zone_is_none() {
    let mock = MockTransport::new();
    mock.respond("GET /zones", page(json!([]), 1, 0)).await;

    let detail = require_ok!(
        driver(&mock)
            .detail_zone(&Zone::with_domain("missing.example"))
            .await
    );
    assert!(detail.is_none());
}

// ============ Live ============

#[tokio::test]
#[ignore]
async fn test_cloudflare_live_list_records() {
    skip_if_no_credentials!("CLOUDFLARE_API_TOKEN", "TEST_DOMAIN");

    let param = require_some!(live_param("CLOUDFLARE_ACCOUNT_ID", "CLOUDFLARE_API_TOKEN"));
    let domain = std::env::var("TEST_DOMAIN").unwrap();
    let driver = CloudflareDnsDriver::new(param).unwrap();

    let zone = require_some!(
        require_ok!(driver.detail_zone(&Zone::with_domain(&domain)).await),
        "zone {domain} not found"
    );
    let records = require_ok!(driver.list_records(&zone).await, "list_records failed");
    println!("list_records ok, {} records", records.len());
}
