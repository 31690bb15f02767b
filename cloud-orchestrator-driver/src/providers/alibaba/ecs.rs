//! Alibaba Cloud ECS compute driver

use async_trait::async_trait;
use serde_json::json;

use crate::error::Result;
use crate::mapping::MappingTable;
use crate::providers::common::{Page, collect_pages, gib_to_mib};
use crate::traits::ComputeDriver;
use crate::types::{
    Architecture, Location, Node, NodeCreateOpts, NodeImage, NodeResizeOpts, NodeSize, NodeState,
    OsType, RequestParam, StorageVolume, StorageVolumeState, VolumeSnapshot,
};

use super::types::{
    CreateInstanceResponse, CreateSnapshotResponse, DescribeDisksResponse,
    DescribeImagesResponse, DescribeInstanceTypesResponse, DescribeInstanceVncUrlResponse,
    DescribeInstancesResponse, DescribeRegionsResponse, DescribeSnapshotsResponse, EcsDisk,
    EcsInstance,
};
use super::{AlibabaClient, ECS};

const PAGE_SIZE: u32 = 100;

const NODE_STATES: &[(&str, NodeState)] = &[
    ("Pending", NodeState::Pending),
    ("Starting", NodeState::Starting),
    ("Running", NodeState::Running),
    ("Stopping", NodeState::Stopping),
    ("Stopped", NodeState::Stopped),
];

const OS_TYPES: &[(&str, OsType)] = &[("linux", OsType::Linux), ("windows", OsType::Windows)];

const ARCHITECTURES: &[(&str, Architecture)] = &[
    ("X86", Architecture::X86),
    ("ARM", Architecture::Arm),
];

const SNAPSHOT_STATES: &[(&str, StorageVolumeState)] = &[
    ("progressing", StorageVolumeState::Creating),
    ("accomplished", StorageVolumeState::Available),
    ("failed", StorageVolumeState::Error),
];

/// Elastic Compute Service driver.
pub struct AlibabaEcsDriver {
    client: AlibabaClient,
    node_states: MappingTable<NodeState>,
    os_types: MappingTable<OsType>,
    architectures: MappingTable<Architecture>,
    snapshot_states: MappingTable<StorageVolumeState>,
}

impl AlibabaEcsDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(AlibabaClient::new(param))
    }

    pub fn with_client(client: AlibabaClient) -> Result<Self> {
        Ok(Self {
            client,
            node_states: MappingTable::new("ecs.node_state", NODE_STATES)?,
            os_types: MappingTable::new("ecs.os_type", OS_TYPES)?,
            architectures: MappingTable::new("ecs.architecture", ARCHITECTURES)?,
            snapshot_states: MappingTable::new("ecs.snapshot_state", SNAPSHOT_STATES)?,
        })
    }

    async fn describe_instances(&self, instance_id: Option<&str>) -> Result<Vec<EcsInstance>> {
        collect_pages(move |index| async move {
            let mut params = json!({
                "RegionId": self.client.region_id(),
                "PageSize": PAGE_SIZE,
                "PageNumber": index + 1,
            });
            if let Some(id) = instance_id {
                params["InstanceIds"] = json!([id]).to_string().into();
            }
            let resp: DescribeInstancesResponse =
                self.client.call(ECS, "DescribeInstances", params).await?;
            Ok(Page {
                items: resp.instances.instance,
                total: resp.total_count,
            })
        })
        .await
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<EcsInstance>> {
        Ok(self
            .describe_instances(Some(instance_id))
            .await?
            .into_iter()
            .next())
    }

    async fn describe_disks(&self, node: &Node, disk_type: Option<&str>) -> Result<Vec<EcsDisk>> {
        let mut params = json!({
            "RegionId": self.client.region_id(),
            "InstanceId": node.id,
            "PageSize": PAGE_SIZE,
        });
        if let Some(disk_type) = disk_type {
            params["DiskType"] = disk_type.into();
        }
        let resp: DescribeDisksResponse = self.client.call(ECS, "DescribeDisks", params).await?;
        Ok(resp.disks.disk)
    }

    /// Action that only needs the instance id.
    async fn instance_action(&self, action: &str, node: &Node) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(ECS, action, json!({ "InstanceId": node.id }))
            .await?;
        Ok(())
    }

    fn to_node(&self, instance: EcsInstance) -> Result<Node> {
        let state = self.node_states.lookup_opt(Some(&instance.status))?;
        let os_type = self.os_types.lookup_opt(Some(&instance.os_type))?;

        let public_ip = instance
            .public_ip_address
            .ip_address
            .into_iter()
            .next()
            .filter(|ip| !ip.is_empty())
            .unwrap_or(instance.eip_address.ip_address);
        let private_ip = instance
            .vpc_attributes
            .private_ip_address
            .ip_address
            .into_iter()
            .chain(instance.inner_ip_address.ip_address)
            .next()
            .unwrap_or_default();

        Ok(Node {
            id: instance.instance_id,
            name: instance.instance_name,
            state,
            public_ip,
            private_ip,
            size: Some(NodeSize {
                id: instance.instance_type.clone(),
                name: instance.instance_type,
                cpu: instance.cpu,
                ram: instance.memory,
                ..NodeSize::default()
            }),
            image: Some(NodeImage {
                id: instance.image_id,
                name: instance.os_name,
                os_type,
            }),
            location: Some(Location::with_id(instance.zone_id)),
        })
    }
}

#[async_trait]
impl ComputeDriver for AlibabaEcsDriver {
    fn id(&self) -> &'static str {
        "alibaba-ecs"
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

    async fn create_node(&self, opts: &NodeCreateOpts) -> Result<Option<Node>> {
        let resp: CreateInstanceResponse = self
            .client
            .call(
                ECS,
                "CreateInstance",
                json!({
                    "RegionId": self.client.region_id(),
                    "ZoneId": opts.location.id,
                    "InstanceType": opts.size.id,
                    "ImageId": opts.image.id,
                    "InstanceName": opts.name,
                }),
            )
            .await?;

        Ok(Some(Node {
            id: resp.instance_id,
            name: opts.name.clone(),
            size: Some(opts.size.clone()),
            image: Some(opts.image.clone()),
            location: Some(opts.location.clone()),
            ..Node::default()
        }))
    }

    async fn destroy_node(&self, node: &Node) -> Result<()> {
        self.instance_action("DeleteInstance", node).await
    }

    async fn reboot_node(&self, node: &Node) -> Result<()> {
        self.instance_action("RebootInstance", node).await
    }

    async fn start_node(&self, node: &Node) -> Result<()> {
        self.instance_action("StartInstance", node).await
    }

    async fn stop_node(&self, node: &Node) -> Result<()> {
        self.instance_action("StopInstance", node).await
    }

    async fn get_node_state(&self, node: &Node) -> Result<Option<NodeState>> {
        match self.describe_instance(&node.id).await? {
            Some(instance) => self.node_states.lookup_opt(Some(&instance.status)),
            None => Ok(None),
        }
    }

    async fn get_node_console(&self, node: &Node) -> Result<Option<String>> {
        let resp: DescribeInstanceVncUrlResponse = self
            .client
            .call(
                ECS,
                "DescribeInstanceVncUrl",
                json!({
                    "RegionId": self.client.region_id(),
                    "InstanceId": node.id,
                }),
            )
            .await?;
        Ok(Some(resp.vnc_url).filter(|url| !url.is_empty()))
    }

    async fn get_node_public_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .detail_node(&node.id)
            .await?
            .map(|n| n.public_ip)
            .filter(|ip| !ip.is_empty()))
    }

    async fn get_node_private_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .detail_node(&node.id)
            .await?
            .map(|n| n.private_ip)
            .filter(|ip| !ip.is_empty()))
    }

    async fn list_volumes(&self, node: &Node) -> Result<Vec<StorageVolume>> {
        Ok(self
            .describe_disks(node, None)
            .await?
            .into_iter()
            .map(|disk| StorageVolume {
                id: disk.disk_id,
                name: disk.disk_name,
                volume_type: disk.category,
                size: disk.size,
            })
            .collect())
    }

    async fn attach_volume(&self, node: &Node, volume: &StorageVolume) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(
                ECS,
                "AttachDisk",
                json!({ "InstanceId": node.id, "DiskId": volume.id }),
            )
            .await?;
        Ok(())
    }

    async fn detach_volume(&self, node: &Node, volume: &StorageVolume) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(
                ECS,
                "DetachDisk",
                json!({ "InstanceId": node.id, "DiskId": volume.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_snapshots(&self, node: &Node) -> Result<Vec<VolumeSnapshot>> {
        let resp: DescribeSnapshotsResponse = self
            .client
            .call(
                ECS,
                "DescribeSnapshots",
                json!({
                    "RegionId": self.client.region_id(),
                    "InstanceId": node.id,
                    "PageSize": PAGE_SIZE,
                }),
            )
            .await?;

        resp.snapshots
            .snapshot
            .into_iter()
            .map(|snapshot| {
                Ok(VolumeSnapshot {
                    state: self.snapshot_states.lookup_opt(Some(&snapshot.status))?,
                    id: snapshot.snapshot_id,
                    name: snapshot.snapshot_name,
                    size: snapshot.source_disk_size,
                    volume_id: snapshot.source_disk_id,
                })
            })
            .collect()
    }

    /// Snapshots the instance's system disk.
    async fn create_snapshot(&self, node: &Node, name: &str) -> Result<Option<VolumeSnapshot>> {
        let Some(disk) = self
            .describe_disks(node, Some("system"))
            .await?
            .into_iter()
            .next()
        else {
            log::warn!("[{}] no system disk found for {}", self.id(), node.id);
            return Ok(None);
        };

        let resp: CreateSnapshotResponse = self
            .client
            .call(
                ECS,
                "CreateSnapshot",
                json!({ "DiskId": disk.disk_id, "SnapshotName": name }),
            )
            .await?;

        Ok(Some(VolumeSnapshot {
            id: resp.snapshot_id,
            name: name.to_string(),
            state: Some(StorageVolumeState::Creating),
            size: disk.size,
            volume_id: disk.disk_id,
        }))
    }

    async fn destroy_snapshot(&self, _node: &Node, snapshot: &VolumeSnapshot) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(ECS, "DeleteSnapshot", json!({ "SnapshotId": snapshot.id }))
            .await?;
        Ok(())
    }

    /// Rolls the snapshot's source disk back; the instance must be stopped.
    async fn apply_snapshot(&self, _node: &Node, snapshot: &VolumeSnapshot) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(
                ECS,
                "ResetDisk",
                json!({ "DiskId": snapshot.volume_id, "SnapshotId": snapshot.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_images(&self) -> Result<Vec<NodeImage>> {
        let resp: DescribeImagesResponse = self
            .client
            .call(
                ECS,
                "DescribeImages",
                json!({
                    "RegionId": self.client.region_id(),
                    "ImageOwnerAlias": "self",
                    "PageSize": PAGE_SIZE,
                }),
            )
            .await?;

        resp.images
            .image
            .into_iter()
            .map(|image| {
                Ok(NodeImage {
                    os_type: self.os_types.lookup_opt(Some(&image.os_type))?,
                    id: image.image_id,
                    name: image.image_name,
                })
            })
            .collect()
    }

    async fn apply_image(&self, node: &Node, image: &NodeImage) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(
                ECS,
                "ReplaceSystemDisk",
                json!({ "InstanceId": node.id, "ImageId": image.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_sizes(&self) -> Result<Vec<NodeSize>> {
        let resp: DescribeInstanceTypesResponse = self
            .client
            .call(ECS, "DescribeInstanceTypes", json!({}))
            .await?;

        resp.instance_types
            .instance_type
            .into_iter()
            .map(|t| {
                Ok(NodeSize {
                    architecture: self.architectures.lookup_opt(Some(&t.cpu_architecture))?,
                    id: t.instance_type_id,
                    name: t.instance_type_family,
                    gpu: t.gpu_amount,
                    cpu: t.cpu_core_count,
                    ram: gib_to_mib(t.memory_size),
                    disk: t.local_storage_capacity,
                })
            })
            .collect()
    }

    async fn resize_node(&self, node: &Node, opts: &NodeResizeOpts) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .call(
                ECS,
                "ModifyInstanceSpec",
                json!({ "InstanceId": node.id, "InstanceType": opts.size.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let resp: DescribeRegionsResponse = self
            .client
            .call(ECS, "DescribeRegions", json!({}))
            .await?;

        Ok(resp
            .regions
            .region
            .into_iter()
            .map(|region| Location {
                id: region.region_id,
                name: region.local_name,
            })
            .collect())
    }
}
