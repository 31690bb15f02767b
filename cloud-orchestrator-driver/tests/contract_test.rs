//! Driver contract tests shared by every vendor.

#![cfg(feature = "all-providers")]

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{MockTransport, alibaba_error, cloudflare_error, tencent_error, test_param};
use cloud_orchestrator_driver::{
    AlibabaClient, AlibabaEcsDriver, AlibabaErrorNormalizer, AlibabaSwasDriver, ClientError,
    CloudflareApiError, CloudflareErrorNormalizer, ComputeDriver, ComputeDriverKind, DnsDriver,
    DnsDriverKind, ErrorNormalizer, Node, NodeCreateOpts, NodeResizeOpts, NullComputeDriver,
    NullDnsDriver, Record, ResponseError, StorageVolume, TencentClient, TencentCvmDriver,
    TencentErrorNormalizer, TencentLighthouseDriver, VolumeSnapshot, Zone, create_compute_driver,
    create_dns_driver,
};
use serde_json::json;

fn normalizers() -> [(&'static str, &'static dyn ErrorNormalizer); 3] {
    [
        ("alibaba", &AlibabaErrorNormalizer as &dyn ErrorNormalizer),
        ("tencent", &TencentErrorNormalizer as &dyn ErrorNormalizer),
        ("cloudflare", &CloudflareErrorNormalizer as &dyn ErrorNormalizer),
    ]
}

// ============ Null defaults ============

#[tokio::test]
async fn test_null_drivers_return_null_values() {
    let compute: Arc<dyn ComputeDriver> = Arc::new(NullComputeDriver);
    let node = Node::with_id("i-1");

    assert!(compute.list_nodes().await.unwrap().is_empty());
    assert!(compute.detail_node("i-1").await.unwrap().is_none());
    assert!(
        compute
            .create_node(&NodeCreateOpts::default())
            .await
            .unwrap()
            .is_none()
    );
    compute.reboot_node(&node).await.unwrap();
    compute.start_node(&node).await.unwrap();
    compute.stop_node(&node).await.unwrap();
    assert!(compute.get_node_public_ip(&node).await.unwrap().is_none());
    assert!(compute.get_node_private_ip(&node).await.unwrap().is_none());
    assert!(compute.list_snapshots(&node).await.unwrap().is_empty());
    compute
        .destroy_snapshot(&node, &VolumeSnapshot::default())
        .await
        .unwrap();
    compute
        .apply_snapshot(&node, &VolumeSnapshot::default())
        .await
        .unwrap();
    compute
        .detach_volume(&node, &StorageVolume::default())
        .await
        .unwrap();
    assert!(compute.list_images().await.unwrap().is_empty());
    assert!(compute.list_sizes().await.unwrap().is_empty());
    compute
        .resize_node(&node, &NodeResizeOpts::default())
        .await
        .unwrap();
    assert!(compute.list_locations().await.unwrap().is_empty());

    let dns: Arc<dyn DnsDriver> = Arc::new(NullDnsDriver);
    let zone = Zone::with_domain("example.com");
    let record = Record::with_id("1");

    assert!(dns.list_zones().await.unwrap().is_empty());
    assert!(dns.detail_zone(&zone).await.unwrap().is_none());
    assert!(dns.create_zone(&zone).await.unwrap().is_none());
    assert!(dns.update_zone(&zone).await.unwrap().is_none());
    dns.delete_zone(&zone).await.unwrap();
    assert!(dns.list_records(&zone).await.unwrap().is_empty());
    assert!(dns.detail_record(&zone, &record).await.unwrap().is_none());
    assert!(dns.create_record(&zone, &record).await.unwrap().is_none());
    assert!(dns.update_record(&zone, &record).await.unwrap().is_none());
    dns.delete_record(&zone, &record).await.unwrap();
}

/// A driver that only knows how to list nodes.
struct ListOnlyDriver;

#[async_trait]
impl ComputeDriver for ListOnlyDriver {
    fn id(&self) -> &'static str {
        "list-only"
    }

    async fn list_nodes(&self) -> cloud_orchestrator_driver::Result<Vec<Node>> {
        Ok(vec![Node::with_id("i-1")])
    }
}

#[tokio::test]
async fn test_partial_driver_keeps_defaults() {
    let driver = ListOnlyDriver;
    assert_eq!(driver.list_nodes().await.unwrap().len(), 1);
    assert!(driver.detail_node("i-1").await.unwrap().is_none());
    assert!(driver.list_sizes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_vendor_operations_make_no_calls() {
    let mock = MockTransport::new();
    let swas =
        AlibabaSwasDriver::with_client(AlibabaClient::with_transport(test_param(), mock.clone()))
            .unwrap();
    let lighthouse = TencentLighthouseDriver::with_client(TencentClient::with_transport(
        test_param(),
        mock.clone(),
    ))
    .unwrap();
    let node = Node::with_id("i-1");

    let drivers: [&dyn ComputeDriver; 2] = [&swas, &lighthouse];
    for driver in drivers {
        assert!(driver.list_volumes(&node).await.unwrap().is_empty());
        driver
            .attach_volume(&node, &StorageVolume::default())
            .await
            .unwrap();
    }
    assert_eq!(mock.call_count().await, 0);
}

#[tokio::test]
async fn test_lifecycle_operations_send_one_request_each() {
    let mock = MockTransport::new();
    for action in [
        "RebootInstance",
        "StartInstance",
        "StopInstance",
        "RebootInstances",
        "StartInstances",
        "StopInstances",
    ] {
        mock.respond(action, json!({ "RequestId": "r-1" })).await;
    }

    let ecs = AlibabaEcsDriver::with_client(AlibabaClient::with_transport(
        test_param(),
        mock.clone(),
    ))
    .unwrap();
    let swas =
        AlibabaSwasDriver::with_client(AlibabaClient::with_transport(test_param(), mock.clone()))
            .unwrap();
    let cvm =
        TencentCvmDriver::with_client(TencentClient::with_transport(test_param(), mock.clone()))
            .unwrap();
    let lighthouse = TencentLighthouseDriver::with_client(TencentClient::with_transport(
        test_param(),
        mock.clone(),
    ))
    .unwrap();
    let node = Node::with_id("i-1");

    let drivers: [&dyn ComputeDriver; 4] = [&ecs, &swas, &cvm, &lighthouse];
    for driver in drivers {
        let before = mock.call_count().await;
        driver.reboot_node(&node).await.unwrap();
        driver.start_node(&node).await.unwrap();
        driver.stop_node(&node).await.unwrap();
        assert_eq!(
            mock.call_count().await - before,
            3,
            "{} sent extra requests",
            driver.id()
        );
    }
}

// ============ Normalization ============

#[test]
fn test_normalizers_are_idempotent() {
    let errors = [
        alibaba_error(
            "Forbidden.RAM",
            "User not authorized to operate on the specified resource.",
        ),
        tencent_error(
            "AuthFailure.SignatureExpire",
            "Signature expired.\nTimestamp skew",
        ),
        cloudflare_error(403, 10000, "Authentication error"),
        ClientError::Timeout("GET /zones".to_string()),
    ];

    for (vendor, normalizer) in normalizers() {
        for err in &errors {
            let first = normalizer.normalize(err);
            let second = normalizer.normalize(err);
            assert_eq!(first, second, "{vendor} normalizer is not idempotent");
        }
    }
}

#[test]
fn test_normalizers_strip_vendor_noise() {
    let alibaba = AlibabaErrorNormalizer.normalize(&alibaba_error(
        "InvalidAccessKeyId.NotFound",
        "Specified access key is not found.",
    ));
    assert_eq!(
        alibaba,
        ResponseError::new(
            "InvalidAccessKeyId.NotFound",
            "Specified access key is not found."
        )
    );

    let tencent = TencentErrorNormalizer.normalize(&tencent_error(
        "AuthFailure.SecretIdNotFound",
        "The SecretId is not found.\nsee https://cloud.tencent.com/document/api",
    ));
    assert_eq!(tencent.code, "AuthFailure.SecretIdNotFound");
    assert_eq!(tencent.message, "The SecretId is not found.");

    let cloudflare = CloudflareErrorNormalizer.normalize(&cloudflare_error(
        400,
        1004,
        "DNS Validation Error",
    ));
    assert_eq!(cloudflare, ResponseError::new("1004", "DNS Validation Error"));

    let empty = CloudflareErrorNormalizer.normalize(&ClientError::Cloudflare(CloudflareApiError {
        status_code: 502,
        errors: vec![],
    }));
    assert_eq!(empty.code, "502");
}

#[test]
fn test_foreign_errors_use_generic_constructor() {
    let err = ClientError::Network("connection reset by peer".to_string());
    for (vendor, normalizer) in normalizers() {
        let normalized = normalizer.normalize(&err);
        assert_eq!(normalized.code, "", "{vendor} invented a code");
        assert_eq!(normalized.message, err.to_string());
    }

    let cross = AlibabaErrorNormalizer.normalize(&tencent_error("LimitExceeded", "too many"));
    assert_eq!(cross.code, "");
}

// ============ Factory ============

#[test]
fn test_factory_builds_every_kind() {
    for kind in ComputeDriverKind::ALL {
        let driver = create_compute_driver(*kind, test_param()).unwrap();
        assert_eq!(driver.id(), kind.to_string());
    }
    for kind in DnsDriverKind::ALL {
        let driver = create_dns_driver(*kind, test_param()).unwrap();
        assert_eq!(driver.id(), kind.to_string());
    }
}

#[test]
fn test_unknown_driver_kind() {
    let err = "gcp-dns".parse::<DnsDriverKind>().unwrap_err();
    assert_eq!(err.code, ResponseError::UNMAPPED_VALUE);
}
