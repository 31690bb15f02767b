use async_trait::async_trait;

use crate::error::{ClientError, ResponseError, Result};
use crate::types::{
    Location, Node, NodeCreateOpts, NodeImage, NodeResizeOpts, NodeSize, NodeState, Record,
    StorageVolume, VolumeSnapshot, Zone,
};

/// Converts a raw vendor transport error into the uniform [`ResponseError`].
///
/// Implementations are pure: no retries, no logging, the input is never
/// mutated. Normalizing the same error twice yields identical output.
pub trait ErrorNormalizer: Send + Sync {
    fn normalize(&self, err: &ClientError) -> ResponseError;
}

/// Compute driver capability contract.
///
/// Every operation has a default body that returns the null value (`Ok(vec![])`,
/// `Ok(None)` or `Ok(())`) without touching the network. Drivers override the
/// operations their vendor supports.
///
/// # Empty results
///
/// An empty or `None` result without an error means one of: the operation is
/// not supported by this provider, the resource was not found, or there is
/// genuinely nothing to return. The contract does not distinguish these.
#[async_trait]
pub trait ComputeDriver: Send + Sync {
    /// Driver identifier, used in logs.
    fn id(&self) -> &'static str;

    /// List all instances.
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(Vec::new())
    }

    /// Detail an instance by id.
    async fn detail_node(&self, _id: &str) -> Result<Option<Node>> {
        Ok(None)
    }

    /// Create a new instance.
    async fn create_node(&self, _opts: &NodeCreateOpts) -> Result<Option<Node>> {
        Ok(None)
    }

    /// Destroy an existing instance.
    async fn destroy_node(&self, _node: &Node) -> Result<()> {
        Ok(())
    }

    async fn reboot_node(&self, _node: &Node) -> Result<()> {
        Ok(())
    }

    async fn start_node(&self, _node: &Node) -> Result<()> {
        Ok(())
    }

    async fn stop_node(&self, _node: &Node) -> Result<()> {
        Ok(())
    }

    /// Live state of an instance.
    async fn get_node_state(&self, _node: &Node) -> Result<Option<NodeState>> {
        Ok(None)
    }

    /// Console (VNC) url of an instance.
    async fn get_node_console(&self, _node: &Node) -> Result<Option<String>> {
        Ok(None)
    }

    async fn get_node_public_ip(&self, _node: &Node) -> Result<Option<String>> {
        Ok(None)
    }

    async fn get_node_private_ip(&self, _node: &Node) -> Result<Option<String>> {
        Ok(None)
    }

    /// Volumes attached to an instance.
    async fn list_volumes(&self, _node: &Node) -> Result<Vec<StorageVolume>> {
        Ok(Vec::new())
    }

    async fn attach_volume(&self, _node: &Node, _volume: &StorageVolume) -> Result<()> {
        Ok(())
    }

    async fn detach_volume(&self, _node: &Node, _volume: &StorageVolume) -> Result<()> {
        Ok(())
    }

    /// Snapshots taken from an instance's volumes.
    async fn list_snapshots(&self, _node: &Node) -> Result<Vec<VolumeSnapshot>> {
        Ok(Vec::new())
    }

    /// Snapshot an instance (its system disk where the vendor snapshots disks).
    async fn create_snapshot(&self, _node: &Node, _name: &str) -> Result<Option<VolumeSnapshot>> {
        Ok(None)
    }

    async fn destroy_snapshot(&self, _node: &Node, _snapshot: &VolumeSnapshot) -> Result<()> {
        Ok(())
    }

    /// Roll an instance back to a snapshot.
    async fn apply_snapshot(&self, _node: &Node, _snapshot: &VolumeSnapshot) -> Result<()> {
        Ok(())
    }

    /// Images available to the account.
    async fn list_images(&self) -> Result<Vec<NodeImage>> {
        Ok(Vec::new())
    }

    /// Reinstall an instance from an image.
    async fn apply_image(&self, _node: &Node, _image: &NodeImage) -> Result<()> {
        Ok(())
    }

    /// Purchasable instance configurations.
    async fn list_sizes(&self) -> Result<Vec<NodeSize>> {
        Ok(Vec::new())
    }

    async fn resize_node(&self, _node: &Node, _opts: &NodeResizeOpts) -> Result<()> {
        Ok(())
    }

    /// Regions or zones instances can be placed in.
    async fn list_locations(&self) -> Result<Vec<Location>> {
        Ok(Vec::new())
    }
}

/// DNS driver capability contract.
///
/// Same discipline as [`ComputeDriver`]: default bodies are network-free no-ops.
#[async_trait]
pub trait DnsDriver: Send + Sync {
    /// Driver identifier, used in logs.
    fn id(&self) -> &'static str;

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        Ok(Vec::new())
    }

    async fn detail_zone(&self, _zone: &Zone) -> Result<Option<Zone>> {
        Ok(None)
    }

    async fn create_zone(&self, _zone: &Zone) -> Result<Option<Zone>> {
        Ok(None)
    }

    async fn update_zone(&self, _zone: &Zone) -> Result<Option<Zone>> {
        Ok(None)
    }

    async fn delete_zone(&self, _zone: &Zone) -> Result<()> {
        Ok(())
    }

    async fn list_records(&self, _zone: &Zone) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    async fn detail_record(&self, _zone: &Zone, _record: &Record) -> Result<Option<Record>> {
        Ok(None)
    }

    async fn create_record(&self, _zone: &Zone, _record: &Record) -> Result<Option<Record>> {
        Ok(None)
    }

    async fn update_record(&self, _zone: &Zone, _record: &Record) -> Result<Option<Record>> {
        Ok(None)
    }

    async fn delete_record(&self, _zone: &Zone, _record: &Record) -> Result<()> {
        Ok(())
    }
}

/// Compute driver that supports nothing.
///
/// Stand-in for providers whose compute API is not wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullComputeDriver;

#[async_trait]
impl ComputeDriver for NullComputeDriver {
    fn id(&self) -> &'static str {
        "null"
    }
}

/// DNS driver that supports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDnsDriver;

#[async_trait]
impl DnsDriver for NullDnsDriver {
    fn id(&self) -> &'static str {
        "null"
    }
}
