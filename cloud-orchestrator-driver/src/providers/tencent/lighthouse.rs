//! Tencent Cloud Lighthouse compute driver
//!
//! Lighthouse instances come as bundles with a fixed system disk; snapshots
//! are taken per instance and volume attach/detach keeps the defaults.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mapping::MappingTable;
use crate::providers::common::{Page, collect_pages, gib_to_mib};
use crate::traits::ComputeDriver;
use crate::types::{
    Location, Node, NodeCreateOpts, NodeImage, NodeResizeOpts, NodeSize, NodeState, OsType,
    RequestParam, StorageVolumeState, VolumeSnapshot,
};

use super::types::{
    DescribeBlueprintsResponse, DescribeBundlesResponse, DescribeInstanceVncUrlResponse,
    DescribeLighthouseInstancesResponse, DescribeLighthouseZonesResponse,
    DescribeSnapshotsResponse, Filter, InstanceIdSetResponse, LighthouseInstance,
    SnapshotIdResponse,
};
use super::{LIGHTHOUSE, TencentClient};

const PAGE_LIMIT: u32 = 100;
const RENEW_FLAG: &str = "NOTIFY_AND_MANUAL_RENEW";

const NODE_STATES: &[(&str, NodeState)] = &[
    ("PENDING", NodeState::Pending),
    ("LAUNCH_FAILED", NodeState::Error),
    ("RUNNING", NodeState::Running),
    ("STOPPED", NodeState::Stopped),
    ("STARTING", NodeState::Starting),
    ("STOPPING", NodeState::Stopping),
    ("REBOOTING", NodeState::Rebooting),
    ("SHUTDOWN", NodeState::Suspended),
    ("TERMINATING", NodeState::Terminating),
    ("DELETING", NodeState::Terminating),
    ("FREEZING", NodeState::Suspended),
    ("ENTER_RESCUE_MODE", NodeState::Rebooting),
    ("RESCUE_MODE", NodeState::Suspended),
    ("EXIT_RESCUE_MODE", NodeState::Rebooting),
];

const PLATFORM_TYPES: &[(&str, OsType)] = &[
    ("LINUX_UNIX", OsType::Linux),
    ("WINDOWS", OsType::Windows),
];

const SNAPSHOT_STATES: &[(&str, StorageVolumeState)] = &[
    ("PENDING", StorageVolumeState::Creating),
    ("NORMAL", StorageVolumeState::Available),
    ("CREATING", StorageVolumeState::Creating),
    ("ROLLBACKING", StorageVolumeState::Restoring),
    ("DELETING", StorageVolumeState::Deleting),
];

/// Lighthouse (lightweight application server) driver.
pub struct TencentLighthouseDriver {
    client: TencentClient,
    node_states: MappingTable<NodeState>,
    platform_types: MappingTable<OsType>,
    snapshot_states: MappingTable<StorageVolumeState>,
}

impl TencentLighthouseDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(TencentClient::new(param))
    }

    pub fn with_client(client: TencentClient) -> Result<Self> {
        Ok(Self {
            client,
            node_states: MappingTable::new("lighthouse.node_state", NODE_STATES)?,
            platform_types: MappingTable::new("lighthouse.platform_type", PLATFORM_TYPES)?,
            snapshot_states: MappingTable::new("lighthouse.snapshot_state", SNAPSHOT_STATES)?,
        })
    }

    async fn describe_instances(
        &self,
        instance_id: Option<&str>,
    ) -> Result<Vec<LighthouseInstance>> {
        collect_pages(move |index| async move {
            let mut params = json!({ "Offset": index * PAGE_LIMIT, "Limit": PAGE_LIMIT });
            if let Some(id) = instance_id {
                params["InstanceIds"] = json!([id]);
            }
            let resp: DescribeLighthouseInstancesResponse = self
                .client
                .call(LIGHTHOUSE, "DescribeInstances", params)
                .await?;
            Ok(Page {
                items: resp.instance_set,
                total: resp.total_count,
            })
        })
        .await
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<LighthouseInstance>> {
        Ok(self
            .describe_instances(Some(instance_id))
            .await?
            .into_iter()
            .next())
    }

    async fn instances_action(&self, action: &str, node: &Node) -> Result<()> {
        let _: Value = self
            .client
            .call(LIGHTHOUSE, action, json!({ "InstanceIds": [node.id] }))
            .await?;
        Ok(())
    }

    fn to_node(&self, instance: LighthouseInstance) -> Result<Node> {
        Ok(Node {
            state: self.node_states.lookup_opt(Some(&instance.instance_state))?,
            image: Some(NodeImage {
                os_type: self
                    .platform_types
                    .lookup_opt(Some(&instance.platform_type))?,
                id: instance.blueprint_id,
                name: instance.os_name,
            }),
            id: instance.instance_id,
            name: instance.instance_name,
            public_ip: instance
                .public_addresses
                .into_iter()
                .next()
                .unwrap_or_default(),
            private_ip: instance
                .private_addresses
                .into_iter()
                .next()
                .unwrap_or_default(),
            size: Some(NodeSize {
                id: instance.bundle_id.clone(),
                name: instance.bundle_id,
                cpu: instance.cpu,
                ram: instance.memory * 1024,
                ..NodeSize::default()
            }),
            location: Some(Location::with_id(instance.zone)),
        })
    }
}

#[async_trait]
impl ComputeDriver for TencentLighthouseDriver {
    fn id(&self) -> &'static str {
        "tencent-lighthouse"
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.describe_instances(None)
            .await?
            .into_iter()
            .map(|instance| self.to_node(instance))
            .collect()
    }

    async fn detail_node(&self, id: &str) -> Result<Option<Node>> {
        self.describe_instance(id)
            .await?
            .map(|instance| self.to_node(instance))
            .transpose()
    }

    /// Buys a one-month prepaid instance with manual renewal.
    async fn create_node(&self, opts: &NodeCreateOpts) -> Result<Option<Node>> {
        let resp: InstanceIdSetResponse = self
            .client
            .call(
                LIGHTHOUSE,
                "CreateInstances",
                json!({
                    "BundleId": opts.size.id,
                    "BlueprintId": opts.image.id,
                    "InstanceChargePrepaid": { "Period": 1, "RenewFlag": RENEW_FLAG },
                    "InstanceName": opts.name,
                    "Zones": [opts.location.id],
                }),
            )
            .await?;

        let Some(instance_id) = resp.instance_id_set.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(Node {
            id: instance_id,
            name: opts.name.clone(),
            size: Some(opts.size.clone()),
            image: Some(opts.image.clone()),
            location: Some(opts.location.clone()),
            ..Node::default()
        }))
    }

    async fn destroy_node(&self, node: &Node) -> Result<()> {
        self.instances_action("TerminateInstances", node).await
    }

    async fn reboot_node(&self, node: &Node) -> Result<()> {
        self.instances_action("RebootInstances", node).await
    }

    async fn start_node(&self, node: &Node) -> Result<()> {
        self.instances_action("StartInstances", node).await
    }

    async fn stop_node(&self, node: &Node) -> Result<()> {
        self.instances_action("StopInstances", node).await
    }

    async fn get_node_state(&self, node: &Node) -> Result<Option<NodeState>> {
        match self.describe_instance(&node.id).await? {
            Some(instance) => self.node_states.lookup_opt(Some(&instance.instance_state)),
            None => Ok(None),
        }
    }

    async fn get_node_console(&self, node: &Node) -> Result<Option<String>> {
        let resp: DescribeInstanceVncUrlResponse = self
            .client
            .call(
                LIGHTHOUSE,
                "DescribeInstanceVncUrl",
                json!({ "InstanceId": node.id }),
            )
            .await?;
        Ok(Some(resp.instance_vnc_url).filter(|url| !url.is_empty()))
    }

    async fn get_node_public_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .describe_instance(&node.id)
            .await?
            .and_then(|i| i.public_addresses.into_iter().next()))
    }

    async fn get_node_private_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .describe_instance(&node.id)
            .await?
            .and_then(|i| i.private_addresses.into_iter().next()))
    }

    async fn list_snapshots(&self, node: &Node) -> Result<Vec<VolumeSnapshot>> {
        let filter = Filter {
            name: "instance-id",
            values: vec![node.id.as_str()],
        };
        let resp: DescribeSnapshotsResponse = self
            .client
            .call(
                LIGHTHOUSE,
                "DescribeSnapshots",
                json!({ "Filters": [filter], "Limit": PAGE_LIMIT }),
            )
            .await?;

        resp.snapshot_set
            .into_iter()
            .map(|snapshot| {
                Ok(VolumeSnapshot {
                    state: self
                        .snapshot_states
                        .lookup_opt(Some(&snapshot.snapshot_state))?,
                    id: snapshot.snapshot_id,
                    name: snapshot.snapshot_name,
                    size: snapshot.disk_size,
                    volume_id: snapshot.disk_id,
                })
            })
            .collect()
    }

    async fn create_snapshot(&self, node: &Node, name: &str) -> Result<Option<VolumeSnapshot>> {
        let resp: SnapshotIdResponse = self
            .client
            .call(
                LIGHTHOUSE,
                "CreateInstanceSnapshot",
                json!({ "InstanceId": node.id, "SnapshotName": name }),
            )
            .await?;

        Ok(Some(VolumeSnapshot {
            id: resp.snapshot_id,
            name: name.to_string(),
            state: Some(StorageVolumeState::Creating),
            ..VolumeSnapshot::default()
        }))
    }

    async fn destroy_snapshot(&self, _node: &Node, snapshot: &VolumeSnapshot) -> Result<()> {
        let _: Value = self
            .client
            .call(
                LIGHTHOUSE,
                "DeleteSnapshots",
                json!({ "SnapshotIds": [snapshot.id] }),
            )
            .await?;
        Ok(())
    }

    async fn apply_snapshot(&self, node: &Node, snapshot: &VolumeSnapshot) -> Result<()> {
        let _: Value = self
            .client
            .call(
                LIGHTHOUSE,
                "ApplyInstanceSnapshot",
                json!({ "InstanceId": node.id, "SnapshotId": snapshot.id }),
            )
            .await?;
        Ok(())
    }

    /// Blueprints (OS and application images).
    async fn list_images(&self) -> Result<Vec<NodeImage>> {
        let resp: DescribeBlueprintsResponse = self
            .client
            .call(LIGHTHOUSE, "DescribeBlueprints", json!({ "Limit": PAGE_LIMIT }))
            .await?;

        resp.blueprint_set
            .into_iter()
            .map(|blueprint| {
                let name = if blueprint.display_title.is_empty() {
                    blueprint.blueprint_name
                } else {
                    blueprint.display_title
                };
                Ok(NodeImage {
                    os_type: self
                        .platform_types
                        .lookup_opt(Some(&blueprint.platform_type))?,
                    id: blueprint.blueprint_id,
                    name,
                })
            })
            .collect()
    }

    async fn apply_image(&self, node: &Node, image: &NodeImage) -> Result<()> {
        let _: Value = self
            .client
            .call(
                LIGHTHOUSE,
                "ResetInstance",
                json!({ "InstanceId": node.id, "BlueprintId": image.id }),
            )
            .await?;
        Ok(())
    }

    /// Bundles (fixed CPU, memory and disk packages).
    async fn list_sizes(&self) -> Result<Vec<NodeSize>> {
        let resp: DescribeBundlesResponse = self
            .client
            .call(LIGHTHOUSE, "DescribeBundles", json!({ "Limit": PAGE_LIMIT }))
            .await?;

        Ok(resp
            .bundle_set
            .into_iter()
            .map(|bundle| NodeSize {
                name: if bundle.bundle_display_label.is_empty() {
                    bundle.bundle_id.clone()
                } else {
                    bundle.bundle_display_label
                },
                id: bundle.bundle_id,
                cpu: bundle.cpu,
                ram: gib_to_mib(bundle.memory),
                disk: bundle.system_disk_size,
                ..NodeSize::default()
            })
            .collect())
    }

    async fn resize_node(&self, node: &Node, opts: &NodeResizeOpts) -> Result<()> {
        let _: Value = self
            .client
            .call(
                LIGHTHOUSE,
                "ModifyInstancesBundle",
                json!({ "InstanceIds": [node.id], "BundleId": opts.size.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let resp: DescribeLighthouseZonesResponse = self
            .client
            .call(LIGHTHOUSE, "DescribeZones", json!({}))
            .await?;

        Ok(resp
            .zone_info_set
            .into_iter()
            .map(|zone| Location {
                id: zone.zone,
                name: zone.zone_name,
            })
            .collect())
    }
}
