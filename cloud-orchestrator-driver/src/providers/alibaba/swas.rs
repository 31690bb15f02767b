//! Alibaba Cloud Simple Application Server (SWAS) compute driver
//!
//! Instances are sold as fixed plans with a bundled system disk, so volume and
//! snapshot operations keep the null-object defaults.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mapping::MappingTable;
use crate::providers::common::{Page, collect_pages, gib_to_mib};
use crate::traits::ComputeDriver;
use crate::types::{
    Location, Node, NodeImage, NodeResizeOpts, NodeSize, NodeState, OsType, RequestParam,
};

use super::types::{
    ListImagesResponse, ListInstancesResponse, ListPlansResponse, ListRegionsResponse,
    SwasInstance,
};
use super::{AlibabaClient, SWAS};

const PAGE_SIZE: u32 = 100;

const NODE_STATES: &[(&str, NodeState)] = &[
    ("Pending", NodeState::Pending),
    ("Starting", NodeState::Starting),
    ("Running", NodeState::Running),
    ("Stopping", NodeState::Stopping),
    ("Stopped", NodeState::Stopped),
    ("Resetting", NodeState::Rebooting),
    ("Upgrading", NodeState::Pending),
    ("Disabled", NodeState::Suspended),
];

const OS_TYPES: &[(&str, OsType)] = &[("linux", OsType::Linux), ("windows", OsType::Windows)];

pub struct AlibabaSwasDriver {
    client: AlibabaClient,
    node_states: MappingTable<NodeState>,
    os_types: MappingTable<OsType>,
}

impl AlibabaSwasDriver {
    pub fn new(param: RequestParam) -> Result<Self> {
        Self::with_client(AlibabaClient::new(param))
    }

    pub fn with_client(client: AlibabaClient) -> Result<Self> {
        Ok(Self {
            client,
            node_states: MappingTable::new("swas.node_state", NODE_STATES)?,
            os_types: MappingTable::new("swas.os_type", OS_TYPES)?,
        })
    }

    async fn list_instances(&self, instance_id: Option<&str>) -> Result<Vec<SwasInstance>> {
        collect_pages(move |index| async move {
            let mut params = json!({
                "RegionId": self.client.region_id(),
                "PageSize": PAGE_SIZE,
                "PageNumber": index + 1,
            });
            if let Some(id) = instance_id {
                params["InstanceIds"] = json!([id]).to_string().into();
            }
            let resp: ListInstancesResponse =
                self.client.call(SWAS, "ListInstances", params).await?;
            Ok(Page {
                items: resp.instances,
                total: resp.total_count,
            })
        })
        .await
    }

    async fn instance(&self, instance_id: &str) -> Result<Option<SwasInstance>> {
        Ok(self.list_instances(Some(instance_id)).await?.into_iter().next())
    }

    async fn instance_action(&self, action: &str, node: &Node, extra: Value) -> Result<()> {
        let mut params = json!({
            "RegionId": self.client.region_id(),
            "InstanceId": node.id,
        });
        if let (Some(params), Value::Object(extra)) = (params.as_object_mut(), extra) {
            params.extend(extra);
        }
        let _: Value = self.client.call(SWAS, action, params).await?;
        Ok(())
    }

    fn to_node(&self, instance: SwasInstance) -> Result<Node> {
        Ok(Node {
            state: self.node_states.lookup_opt(Some(&instance.status))?,
            image: Some(NodeImage {
                os_type: self.os_types.lookup_opt(Some(&instance.image.os_type))?,
                id: instance.image_id,
                name: instance.image.image_name,
            }),
            id: instance.instance_id,
            name: instance.instance_name,
            public_ip: instance.public_ip_address,
            private_ip: instance.inner_ip_address,
            size: Some(NodeSize::with_id(instance.plan_id)),
            location: Some(Location::with_id(instance.region_id)),
        })
    }
}

#[async_trait]
impl ComputeDriver for AlibabaSwasDriver {
    fn id(&self) -> &'static str {
        "alibaba-swas"
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.list_instances(None)
            .await?
            .into_iter()
            .map(|instance| self.to_node(instance))
            .collect()
    }

    async fn detail_node(&self, id: &str) -> Result<Option<Node>> {
        self.instance(id)
            .await?
            .map(|instance| self.to_node(instance))
            .transpose()
    }

    async fn reboot_node(&self, node: &Node) -> Result<()> {
        self.instance_action("RebootInstance", node, Value::Null).await
    }

    async fn start_node(&self, node: &Node) -> Result<()> {
        self.instance_action("StartInstance", node, Value::Null).await
    }

    async fn stop_node(&self, node: &Node) -> Result<()> {
        self.instance_action("StopInstance", node, Value::Null).await
    }

    async fn get_node_state(&self, node: &Node) -> Result<Option<NodeState>> {
        match self.instance(&node.id).await? {
            Some(instance) => self.node_states.lookup_opt(Some(&instance.status)),
            None => Ok(None),
        }
    }

    async fn get_node_public_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .instance(&node.id)
            .await?
            .map(|i| i.public_ip_address)
            .filter(|ip| !ip.is_empty()))
    }

    async fn get_node_private_ip(&self, node: &Node) -> Result<Option<String>> {
        Ok(self
            .instance(&node.id)
            .await?
            .map(|i| i.inner_ip_address)
            .filter(|ip| !ip.is_empty()))
    }

    async fn list_images(&self) -> Result<Vec<NodeImage>> {
        let resp: ListImagesResponse = self
            .client
            .call(
                SWAS,
                "ListImages",
                json!({ "RegionId": self.client.region_id() }),
            )
            .await?;

        resp.images
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

    /// Reinstalls the system disk from `image`.
    async fn apply_image(&self, node: &Node, image: &NodeImage) -> Result<()> {
        self.instance_action("ResetSystem", node, json!({ "ImageId": image.id }))
            .await
    }

    async fn list_sizes(&self) -> Result<Vec<NodeSize>> {
        let resp: ListPlansResponse = self
            .client
            .call(
                SWAS,
                "ListPlans",
                json!({ "RegionId": self.client.region_id() }),
            )
            .await?;

        Ok(resp
            .plans
            .into_iter()
            .map(|plan| NodeSize {
                name: plan.plan_id.clone(),
                id: plan.plan_id,
                cpu: plan.core,
                ram: gib_to_mib(plan.memory),
                disk: plan.disk_size,
                ..NodeSize::default()
            })
            .collect())
    }

    /// Upgrades to another plan; SWAS plans can only grow.
    async fn resize_node(&self, node: &Node, opts: &NodeResizeOpts) -> Result<()> {
        self.instance_action("UpgradeInstance", node, json!({ "PlanId": opts.size.id }))
            .await
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let resp: ListRegionsResponse = self.client.call(SWAS, "ListRegions", json!({})).await?;

        Ok(resp
            .regions
            .into_iter()
            .map(|region| Location {
                id: region.region_id,
                name: region.local_name,
            })
            .collect())
    }
}
