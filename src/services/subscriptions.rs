//! Pro subscriptions and their subscription-level settings
//!
//! Covers subscription CRUD plus the CIDR allowlist, maintenance windows,
//! pricing, VPC peerings and the regions of Active-Active subscriptions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServiceCore;
use crate::error::{NotFoundExt, Resource, Result};

/// Request body for `POST /subscriptions`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscription {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Validate and price without applying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    /// `single-region` or `active-active`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_type: Option<String>,
    /// `credit-card` or `marketplace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Payment method id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
    /// `ram` or `ram-and-flash`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_storage: Option<String>,
    /// Redis version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_version: Option<String>,
    /// Where to deploy
    pub cloud_providers: Vec<CloudProviderSpec>,
    /// Databases to size the subscription for
    pub databases: Vec<DatabaseSpec>,
}

/// Cloud placement requested at subscription creation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProviderSpec {
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Cloud account to deploy into; `1` means Redis internal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account_id: Option<i64>,
    /// Regions to deploy into
    pub regions: Vec<RegionSpec>,
}

/// One region of a subscription's cloud placement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSpec {
    /// Region name
    pub region: String,
    /// Spread across availability zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_availability_zones: Option<bool>,
    /// Preferred availability zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_availability_zones: Option<Vec<String>>,
    /// Networking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<NetworkingSpec>,
}

/// Networking of a new deployment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkingSpec {
    /// Deployment CIDR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_cidr: Option<String>,
    /// VPC id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

/// Sizing of the databases a new subscription is planned for
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSpec {
    /// Database name
    pub name: String,
    /// `redis` or `memcached`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Memory limit in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_in_gb: Option<f64>,
    /// Dataset size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_size_in_gb: Option<f64>,
    /// Expose the OSS Cluster API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_oss_cluster_api: Option<bool>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Enable replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<bool>,
    /// Throughput target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_measurement: Option<Throughput>,
    /// Number of databases of this shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<ModuleSpec>>,
}

/// Throughput target, `by` is `operations-per-second` or `number-of-shards`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Throughput {
    /// `operations-per-second` or `number-of-shards`
    pub by: String,
    /// Threshold value
    pub value: i64,
}

/// A module to enable by name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    /// Module name, e.g. `RedisJSON`
    pub name: String,
}

/// Request body for `PUT /subscriptions/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscription {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `credit-card` or `marketplace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Payment method id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
}

/// A pro subscription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `single-region` or `active-active`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_type: Option<String>,
    /// Payment method id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
    /// Payment method type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    /// `ram` or `ram-and-flash`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_storage: Option<String>,
    /// Number of databases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_databases: Option<i64>,
    /// Per-provider deployment details
    #[serde(default)]
    pub cloud_details: Vec<CloudDetail>,
}

/// Where a subscription is deployed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudDetail {
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Cloud account to deploy into; `1` means Redis internal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_account_id: Option<i64>,
    /// Total size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size_in_gb: Option<f64>,
    /// Deployed regions
    #[serde(default)]
    pub regions: Vec<RegionDetail>,
}

/// A deployed region
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetail {
    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Networks per region
    #[serde(default)]
    pub networking: Vec<Networking>,
    /// Preferred availability zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_availability_zones: Option<Vec<String>>,
    /// Spread across availability zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_availability_zones: Option<bool>,
}

/// Network of a deployed region
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    /// Deployment CIDR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_cidr: Option<String>,
    /// VPC id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    /// Subnet id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
}

/// IP and security-group allowlist of a subscription
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CidrAllowlist {
    /// Allowed CIDR blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_ips: Option<Vec<String>>,
    /// Allowed security groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
}

/// Maintenance window configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindows {
    /// `automatic` or `manual`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Windows, `None` for automatic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<Vec<MaintenanceWindow>>,
}

/// One weekly maintenance window
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Start hour, UTC
    pub start_hour: i32,
    /// Window length in hours
    pub duration_in_hours: i32,
    /// Weekdays, e.g. `Monday`
    pub days: Vec<String>,
}

/// One line of a subscription's price breakdown
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Database name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Line item type, e.g. `Shards`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<String>,
    /// Line item detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_details: Option<String>,
    /// Quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// Unit of the quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_measurement: Option<String>,
    /// Price per unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Decimal>,
    /// Currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
    /// Billing period, e.g. `Month`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_period: Option<String>,
    /// Region, if regional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Pricing {
    /// `quantity * price_per_unit` when both are known
    pub fn total(&self) -> Option<Decimal> {
        Some(self.quantity? * self.price_per_unit?)
    }
}

/// Request body for `POST /subscriptions/{id}/peerings`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVpcPeering {
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Region of the peer VPC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// AWS account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// VPC id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    /// VPC CIDRs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_cidrs: Option<Vec<String>>,
    /// GCP project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_project_uid: Option<String>,
    /// GCP VPC network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_network_name: Option<String>,
}

/// A VPC peering as reported by the peering task
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcPeering {
    /// Peering id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_peering_id: Option<i64>,
    /// AWS account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// AWS peering connection id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_peering_uid: Option<String>,
    /// Peer VPC id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_uid: Option<String>,
    /// VPC CIDR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_cidr: Option<String>,
    /// GCP project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_project_uid: Option<String>,
    /// GCP network name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Regions of an Active-Active subscription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveActiveRegions {
    /// Subscription id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<i64>,
    /// Regions of the subscription
    #[serde(default)]
    pub regions: Vec<ActiveActiveRegion>,
}

/// A region of an Active-Active subscription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveActiveRegion {
    /// Region id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Deployment CIDR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_cidr: Option<String>,
    /// VPC id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    /// Regional database throughput
    #[serde(default)]
    pub databases: Vec<ActiveActiveRegionDatabase>,
}

/// Throughput of one database in a region
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveActiveRegionDatabase {
    /// Database id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<i64>,
    /// Database name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Read operations per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_operations_per_second: Option<i64>,
    /// Write operations per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_operations_per_second: Option<i64>,
}

#[derive(Deserialize)]
struct Subscriptions {
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

#[derive(Deserialize)]
struct PricingList {
    #[serde(default)]
    pricing: Vec<Pricing>,
}

#[derive(Deserialize)]
struct Peerings {
    #[serde(default)]
    peerings: Vec<VpcPeering>,
}

/// Subscription management
#[derive(Clone, Debug)]
pub struct SubscriptionService {
    core: ServiceCore,
}

impl SubscriptionService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Create a subscription and return its id
    ///
    /// Provisioning can take many minutes; the call waits for it.
    pub async fn create(&self, subscription: &CreateSubscription) -> Result<i64> {
        self.core
            .create("create subscription", "/subscriptions", subscription)
            .await
    }

    /// All Pro subscriptions
    pub async fn list(&self) -> Result<Vec<Subscription>> {
        let body: Subscriptions = self
            .core
            .api()
            .get("list subscriptions", "/subscriptions")
            .await?;
        Ok(body.subscriptions)
    }

    /// One subscription
    pub async fn get(&self, id: i64) -> Result<Subscription> {
        self.core
            .api()
            .get("retrieve subscription", &format!("/subscriptions/{id}"))
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Rename or change payment
    pub async fn update(&self, id: i64, subscription: &UpdateSubscription) -> Result<()> {
        self.core
            .update(
                "update subscription",
                &format!("/subscriptions/{id}"),
                subscription,
            )
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Delete a subscription; it must have no databases
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.core
            .delete("delete subscription", &format!("/subscriptions/{id}"))
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Current allowlist, read through a task
    pub async fn get_cidr_allowlist(&self, id: i64) -> Result<CidrAllowlist> {
        self.core
            .read_via_task(
                "get cidr allowlist",
                &format!("/subscriptions/{id}/cidr"),
                &[],
            )
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Replace the CIDR allowlist
    pub async fn update_cidr_allowlist(&self, id: i64, allowlist: &CidrAllowlist) -> Result<()> {
        self.core
            .update(
                "update cidr allowlist",
                &format!("/subscriptions/{id}/cidr"),
                allowlist,
            )
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Maintenance window settings
    pub async fn get_maintenance_windows(&self, id: i64) -> Result<MaintenanceWindows> {
        self.core
            .api()
            .get(
                "get maintenance windows",
                &format!("/subscriptions/{id}/maintenance-windows"),
            )
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Replace the maintenance windows
    pub async fn update_maintenance_windows(
        &self,
        id: i64,
        windows: &MaintenanceWindows,
    ) -> Result<()> {
        self.core
            .update(
                "update maintenance windows",
                &format!("/subscriptions/{id}/maintenance-windows"),
                windows,
            )
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Price breakdown of the subscription
    pub async fn get_pricing(&self, id: i64) -> Result<Vec<Pricing>> {
        let body: PricingList = self
            .core
            .api()
            .get("get pricing", &format!("/subscriptions/{id}/pricing"))
            .await
            .or_not_found(|| Resource::Subscription(id))?;
        Ok(body.pricing)
    }

    /// VPC peerings, read through a task
    pub async fn list_vpc_peerings(&self, id: i64) -> Result<Vec<VpcPeering>> {
        let body: Option<Peerings> = self
            .core
            .read_via_task(
                "list vpc peerings",
                &format!("/subscriptions/{id}/peerings"),
                &[],
            )
            .await
            .or_not_found(|| Resource::Subscription(id))?;
        Ok(body.map(|p| p.peerings).unwrap_or_default())
    }

    /// Request a peering and return its id
    pub async fn create_vpc_peering(&self, id: i64, peering: &CreateVpcPeering) -> Result<i64> {
        self.core
            .create(
                "create vpc peering",
                &format!("/subscriptions/{id}/peerings"),
                peering,
            )
            .await
            .or_not_found(|| Resource::Subscription(id))
    }

    /// Delete a VPC peering
    pub async fn delete_vpc_peering(&self, id: i64, peering: i64) -> Result<()> {
        self.core
            .delete(
                "delete vpc peering",
                &format!("/subscriptions/{id}/peerings/{peering}"),
            )
            .await
            .or_not_found(|| Resource::VpcPeering {
                subscription: id,
                peering,
            })
    }

    /// Regions of an Active-Active subscription
    pub async fn list_active_active_regions(&self, id: i64) -> Result<ActiveActiveRegions> {
        self.core
            .api()
            .get("list regions", &format!("/subscriptions/{id}/regions"))
            .await
            .or_not_found(|| Resource::Subscription(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_pricing_total_uses_decimal() {
        let pricing: Pricing = serde_json::from_str(
            r#"{"type":"Shards","quantity":2,"pricePerUnit":"0.124","priceCurrency":"USD"}"#,
        )
        .unwrap();
        assert_eq!(pricing.pricing_type.as_deref(), Some("Shards"));
        assert_eq!(pricing.total(), Some(Decimal::from_str("0.248").unwrap()));
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let body = serde_json::to_value(UpdateSubscription {
            name: Some("renamed".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"name": "renamed"}));
    }
}
