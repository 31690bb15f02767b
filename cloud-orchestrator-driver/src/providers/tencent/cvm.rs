//! Tencent Cloud CVM compute driver (block storage through CBS)

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mapping::MappingTable;
use crate::providers::common::{Page, collect_pages};
use crate::traits::ComputeDriver;
use crate::types::{
    Architecture, Location, Node, NodeCreateOpts, NodeImage, NodeResizeOpts, NodeSize, NodeState,
    OsType, RequestParam, StorageVolume, StorageVolumeState, VolumeSnapshot,
};

use super::types::{
    CvmDisk, CvmInstance, DescribeCvmInstancesResponse, DescribeCvmZonesResponse,
    DescribeImagesResponse, DescribeInstanceVncUrlResponse, DescribeInstancesStatusResponse,
    DescribeSnapshotsResponse, DescribeZoneInstanceConfigInfosResponse, Filter,
    InstanceIdSetResponse, SnapshotIdResponse,
};
use super::{CBS, CVM, TencentClient};

const PAGE_LIMIT: u32 = 100;

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
    ("ENTER_RESCUE_MODE", NodeState::Rebooting),
    ("RESCUE_MODE", NodeState::Suspended),
    ("EXIT_RESCUE_MODE", NodeState::Rebooting),
    // Live migration keeps the instance serving.
    ("ENTER_SERVICE_LIVE_MIGRATE", NodeState::Running),
    ("SERVICE_LIVE_MIGRATE", NodeState::Running),
    ("EXIT_SERVICE_LIVE_MIGRATE", NodeState::Running),
];

/// Matched against free-form OS names such as `CentOS 7.9 64位`.
const OS_KEYWORDS: &[(&str, OsType)] = &[
    ("windows", OsType::Windows),
    ("linux", OsType::Linux),
    ("centos", OsType::Linux),
    ("ubuntu", OsType::Linux),
    ("debian", OsType::Linux),
    ("tencentos", OsType::Linux),
    ("opencloudos", OsType::Linux),
    ("rocky", OsType::Linux),
    ("alma", OsType::Linux),
    ("fedora", OsType::Linux),
    ("suse", OsType::Linux),
    ("red hat", OsType::Linux),
    ("coreos", OsType::Linux),
];

/// Matched against the CPU model in `CpuType`.
const ARCH_KEYWORDS: &[(&str, Architecture)] = &[
    ("ampere", Architecture::Arm),
    ("kunpeng", Architecture::Arm),
    ("yitian", Architecture::Arm),
    ("intel", Architecture::X86),
    ("amd", Architecture::X86),
    ("hygon", Architecture::X86),
];

const SNAPSHOT_STATES: &[(&str, StorageVolumeState)] = &[
    ("NORMAL", StorageVolumeState::Available),
    ("CREATING", StorageVolumeState::Creating),
    ("ROLLBACKING", StorageVolumeState::Restoring),
    ("COPYING_FROM_REMOTE", StorageVolumeState::Creating),
    ("CHECKING_COPIED", StorageVolumeState::Creating),
    ("TORECYCLE", StorageVolumeState::Deleting),
];

/// Cloud Virtual Machine driver.
pub struct TencentCvmDriver {
    client: TencentClient,
    node_states: MappingTable<NodeState>,
    os_keywords: MappingTable<OsType>,
    arch_keywords: MappingTable<Architecture>,
    snapshot_states: MappingTable<StorageVolumeState>,
}

impl TencentCvmDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(TencentClient::new(param))
    }

    pub fn with_client(client: TencentClient) -> Result<Self> {
        Ok(Self {
            client,
            node_states: MappingTable::new("cvm.node_state", NODE_STATES)?,
            os_keywords: MappingTable::new("cvm.os_type", OS_KEYWORDS)?,
            arch_keywords: MappingTable::new("cvm.architecture", ARCH_KEYWORDS)?,
            snapshot_states: MappingTable::new("cbs.snapshot_state", SNAPSHOT_STATES)?,
        })
    }

    async fn describe_instances(&self, instance_id: Option<&str>) -> Result<Vec<CvmInstance>> {
        collect_pages(move |index| async move {
            let mut params = json!({ "Offset": index * PAGE_LIMIT, "Limit": PAGE_LIMIT });
            if let Some(id) = instance_id {
                params["InstanceIds"] = json!([id]);
            }
            let resp: DescribeCvmInstancesResponse =
                self.client.call(CVM, "DescribeInstances", params).await?;
            Ok(Page {
                items: resp.instance_set,
                total: resp.total_count,
            })
        })
        .await
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Option<CvmInstance>> {
        Ok(self
            .describe_instances(Some(instance_id))
            .await?
            .into_iter()
            .next())
    }

    /// Lifecycle action over `InstanceIds`.
    async fn instances_action(&self, action: &str, node: &Node) -> Result<()> {
        let _: Value = self
            .client
            .call(CVM, action, json!({ "InstanceIds": [node.id] }))
            .await?;
        Ok(())
    }

    fn to_node(&self, instance: CvmInstance) -> Result<Node> {
        Ok(Node {
            state: self.node_states.lookup_opt(Some(&instance.instance_state))?,
            image: Some(NodeImage {
                os_type: self.os_keywords.lookup_keyword(&instance.os_name)?,
                id: instance.image_id,
                name: instance.os_name,
            }),
            id: instance.instance_id,
            name: instance.instance_name,
            public_ip: instance
                .public_ip_addresses
                .into_iter()
                .next()
                .unwrap_or_default(),
            private_ip: instance
                .private_ip_addresses
                .into_iter()
                .next()
                .unwrap_or_default(),
            size: Some(NodeSize {
                id: instance.instance_type.clone(),
                name: instance.instance_type,
                cpu: instance.cpu,
                ram: instance.memory * 1024,
                ..NodeSize::default()
            }),
            location: Some(Location::with_id(instance.placement.zone)),
        })
    }
}

fn to_volume(disk: CvmDisk) -> StorageVolume {
    StorageVolume {
        name: disk.disk_id.clone(),
        id: disk.disk_id,
        volume_type: disk.disk_type,
        size: disk.disk_size,
    }
}

#[async_trait]
impl ComputeDriver for TencentCvmDriver {
    fn id(&self) -> &'static str {
        "tencent-cvm"
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

    /// Creates one pay-as-you-go instance. The result carries the new id and
    /// the requested configuration.
    async fn create_node(&self, opts: &NodeCreateOpts) -> Result<Option<Node>> {
        let resp: InstanceIdSetResponse = self
            .client
            .call(
                CVM,
                "RunInstances",
                json!({
                    "InstanceType": opts.size.id,
                    "ImageId": opts.image.id,
                    "Placement": { "Zone": opts.location.id },
                    "InstanceName": opts.name,
                    "InstanceCount": 1,
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
        let resp: DescribeInstancesStatusResponse = self
            .client
            .call(
                CVM,
                "DescribeInstancesStatus",
                json!({ "InstanceIds": [node.id] }),
            )
            .await?;

        match resp.instance_status_set.first() {
            Some(status) => self.node_states.lookup_opt(Some(&status.instance_state)),
            None => Ok(None),
        }
    }

    async fn get_node_console(&self, node: &Node) -> Result<Option<String>> {
        let resp: DescribeInstanceVncUrlResponse = self
            .client
            .call(
                CVM,
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
            .and_then(|i| i.public_ip_addresses.into_iter().next()))
    }

    async fn get_node_private_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .describe_instance(&node.id)
            .await?
            .and_then(|i| i.private_ip_addresses.into_iter().next()))
    }

    /// System disk first, then data disks.
    async fn list_volumes(&self, node: &Node) -> Result<Vec<StorageVolume>> {
        let Some(instance) = self.describe_instance(&node.id).await? else {
            return Ok(Vec::new());
        };

        Ok(std::iter::once(instance.system_disk)
            .chain(instance.data_disks)
            .filter(|disk| !disk.disk_id.is_empty())
            .map(to_volume)
            .collect())
    }

    async fn attach_volume(&self, node: &Node, volume: &StorageVolume) -> Result<()> {
        let _: Value = self
            .client
            .call(
                CBS,
                "AttachDisks",
                json!({ "InstanceId": node.id, "DiskIds": [volume.id] }),
            )
            .await?;
        Ok(())
    }

    async fn detach_volume(&self, node: &Node, volume: &StorageVolume) -> Result<()> {
        let _: Value = self
            .client
            .call(
                CBS,
                "DetachDisks",
                json!({ "InstanceId": node.id, "DiskIds": [volume.id] }),
            )
            .await?;
        Ok(())
    }

    /// Snapshots of every disk attached to the instance.
    async fn list_snapshots(&self, node: &Node) -> Result<Vec<VolumeSnapshot>> {
        let volumes = self.list_volumes(node).await?;
        if volumes.is_empty() {
            return Ok(Vec::new());
        }

        let filter = Filter {
            name: "disk-id",
            values: volumes.iter().map(|v| v.id.as_str()).collect(),
        };
        let resp: DescribeSnapshotsResponse = self
            .client
            .call(
                CBS,
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

    /// Snapshots the instance's system disk.
    async fn create_snapshot(&self, node: &Node, name: &str) -> Result<Option<VolumeSnapshot>> {
        let Some(instance) = self.describe_instance(&node.id).await? else {
            return Ok(None);
        };
        let disk = instance.system_disk;

        let resp: SnapshotIdResponse = self
            .client
            .call(
                CBS,
                "CreateSnapshot",
                json!({ "DiskId": disk.disk_id, "SnapshotName": name }),
            )
            .await?;

        Ok(Some(VolumeSnapshot {
            id: resp.snapshot_id,
            name: name.to_string(),
            state: Some(StorageVolumeState::Creating),
            size: disk.disk_size,
            volume_id: disk.disk_id,
        }))
    }

    async fn destroy_snapshot(&self, _node: &Node, snapshot: &VolumeSnapshot) -> Result<()> {
        let _: Value = self
            .client
            .call(
                CBS,
                "DeleteSnapshots",
                json!({ "SnapshotIds": [snapshot.id] }),
            )
            .await?;
        Ok(())
    }

    /// Rolls the snapshot's source disk back.
    async fn apply_snapshot(&self, _node: &Node, snapshot: &VolumeSnapshot) -> Result<()> {
        let _: Value = self
            .client
            .call(
                CBS,
                "ApplySnapshot",
                json!({ "DiskId": snapshot.volume_id, "SnapshotId": snapshot.id }),
            )
            .await?;
        Ok(())
    }

    /// Custom images of the account; public and marketplace images are not
    /// listed.
    async fn list_images(&self) -> Result<Vec<NodeImage>> {
        let images = collect_pages(move |index| async move {
            let filter = Filter {
                name: "image-type",
                values: vec!["PRIVATE_IMAGE"],
            };
            let resp: DescribeImagesResponse = self
                .client
                .call(
                    CVM,
                    "DescribeImages",
                    json!({
                        "Filters": [filter],
                        "Offset": index * PAGE_LIMIT,
                        "Limit": PAGE_LIMIT,
                    }),
                )
                .await?;
            Ok(Page {
                items: resp.image_set,
                total: resp.total_count,
            })
        })
        .await?;

        images
            .into_iter()
            .map(|image| {
                Ok(NodeImage {
                    os_type: self.os_keywords.lookup_keyword(&image.platform)?,
                    id: image.image_id,
                    name: image.image_name,
                })
            })
            .collect()
    }

    /// Reinstalls the instance from `image`.
    async fn apply_image(&self, node: &Node, image: &NodeImage) -> Result<()> {
        let _: Value = self
            .client
            .call(
                CVM,
                "ResetInstance",
                json!({ "InstanceId": node.id, "ImageId": image.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_sizes(&self) -> Result<Vec<NodeSize>> {
        let resp: DescribeZoneInstanceConfigInfosResponse = self
            .client
            .call(CVM, "DescribeZoneInstanceConfigInfos", json!({}))
            .await?;

        resp.instance_type_quota_set
            .into_iter()
            .map(|quota| {
                Ok(NodeSize {
                    architecture: self.arch_keywords.lookup_keyword(&quota.cpu_type)?,
                    disk: quota
                        .local_disk_type_list
                        .first()
                        .map_or(0, |disk| disk.min_size),
                    id: quota.instance_type.clone(),
                    name: quota.instance_type,
                    gpu: quota.gpu,
                    cpu: quota.cpu,
                    ram: quota.memory * 1024,
                })
            })
            .collect()
    }

    async fn resize_node(&self, node: &Node, opts: &NodeResizeOpts) -> Result<()> {
        let _: Value = self
            .client
            .call(
                CVM,
                "ResetInstancesType",
                json!({ "InstanceIds": [node.id], "InstanceType": opts.size.id }),
            )
            .await?;
        Ok(())
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let resp: DescribeCvmZonesResponse =
            self.client.call(CVM, "DescribeZones", json!({})).await?;

        Ok(resp
            .zone_set
            .into_iter()
            .map(|zone| Location {
                id: zone.zone,
                name: zone.zone_name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> TencentCvmDriver {
        TencentCvmDriver::new(RequestParam::new("id", "key")).unwrap()
    }

    #[test]
    fn os_names_map_by_keyword() {
        let d = driver();
        assert_eq!(
            d.os_keywords.lookup_keyword("CentOS 7.9 64位").unwrap(),
            Some(OsType::Linux)
        );
        assert_eq!(
            d.os_keywords
                .lookup_keyword("Windows Server 2019 数据中心版 64位中文版")
                .unwrap(),
            Some(OsType::Windows)
        );
        assert_eq!(d.os_keywords.lookup_keyword("").unwrap(), None);
    }

    #[test]
    fn cpu_models_map_to_architecture() {
        let d = driver();
        assert_eq!(
            d.arch_keywords
                .lookup_keyword("Intel Xeon Cascade Lake(2.5GHz/3.1GHz)")
                .unwrap(),
            Some(Architecture::X86)
        );
        assert_eq!(
            d.arch_keywords.lookup_keyword("Ampere Altra(2.8GHz)").unwrap(),
            Some(Architecture::Arm)
        );
        assert!(d.arch_keywords.lookup_keyword("Unknown CPU").is_err());
    }

    #[test]
    fn maintenance_states_are_mapped() {
        let d = driver();
        assert_eq!(
            d.node_states.lookup("ENTER_RESCUE_MODE").unwrap(),
            NodeState::Rebooting
        );
        assert_eq!(
            d.node_states.lookup("RESCUE_MODE").unwrap(),
            NodeState::Suspended
        );
        assert_eq!(
            d.node_states.lookup("EXIT_RESCUE_MODE").unwrap(),
            NodeState::Rebooting
        );
        for migrating in [
            "ENTER_SERVICE_LIVE_MIGRATE",
            "SERVICE_LIVE_MIGRATE",
            "EXIT_SERVICE_LIVE_MIGRATE",
        ] {
            assert_eq!(d.node_states.lookup(migrating).unwrap(), NodeState::Running);
        }
    }
}
