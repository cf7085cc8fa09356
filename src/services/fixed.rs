//! Fixed (Essentials) plans, subscriptions and databases

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServiceCore;
use crate::error::{NotFoundExt, Resource, Result};
use crate::runtime::{ListIter, PagedResponse};

/// A fixed plan offered in a region
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPlan {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Plan size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Unit of `size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_measurement_unit: Option<String>,
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Region id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    /// Price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
    /// Billing period, e.g. `Month`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_period: Option<String>,
    /// Maximum databases allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_databases: Option<i64>,
    /// Availability tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    /// Connection limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<String>,
    /// Maximum CIDR allowlist entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_allow_rules: Option<i64>,
    /// Persistence supported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_data_persistence: Option<bool>,
    /// Backups supported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_instant_and_daily_backups: Option<bool>,
    /// Replication supported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_replication: Option<bool>,
    /// Clustering supported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_clustering: Option<bool>,
}

/// Request body for creating or updating a fixed subscription
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedSubscriptionRequest {
    /// Name
    pub name: String,
    /// Plan id
    pub plan_id: i64,
    /// `credit-card` or `marketplace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Payment method id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
}

/// A fixed subscription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedSubscription {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Payment method id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<i64>,
    /// Payment method type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_type: Option<String>,
    /// Plan id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    /// Plan name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// Plan size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Unit of `size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_measurement_unit: Option<String>,
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Billing period, e.g. `Month`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_period: Option<String>,
    /// Currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<String>,
    /// Maximum databases allowed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_databases: Option<i64>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

/// Request body for creating or updating a fixed database
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDatabaseRequest {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
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
    /// Redis version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_version: Option<String>,
    /// `resp2` or `resp3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp_version: Option<String>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Eviction policy, e.g. `allkeys-lru`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_eviction_policy: Option<String>,
    /// Enable replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<bool>,
    /// Source IP allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ips: Option<Vec<String>>,
    /// Require TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A database inside a fixed subscription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDatabase {
    /// Database id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `redis` or `memcached`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Memory limit of the plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_memory_limit: Option<f64>,
    /// Memory in use, in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_used_in_mb: Option<f64>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Enable replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<bool>,
    /// Public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_endpoint: Option<String>,
    /// Private endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_endpoint: Option<String>,
}

/// One page of `GET /fixed/subscriptions/{id}/databases`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixedDatabasePage {
    /// The subscription and its databases
    #[serde(default)]
    pub subscription: Option<FixedSubscriptionDatabases>,
}

/// A fixed subscription and its databases
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedSubscriptionDatabases {
    /// Subscription id
    #[serde(default)]
    pub subscription_id: Option<i64>,
    /// Databases of the subscription
    #[serde(default)]
    pub databases: Vec<FixedDatabase>,
}

impl PagedResponse for FixedDatabasePage {
    type Item = FixedDatabase;

    fn into_items(self) -> Vec<FixedDatabase> {
        self.subscription.map(|s| s.databases).unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct Plans {
    #[serde(default)]
    plans: Vec<FixedPlan>,
}

#[derive(Deserialize)]
struct FixedSubscriptions {
    #[serde(default)]
    subscriptions: Vec<FixedSubscription>,
}

/// Fixed plans, subscriptions and databases
#[derive(Clone, Debug)]
pub struct FixedService {
    core: ServiceCore,
}

impl FixedService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Available plans, optionally for one provider
    pub async fn list_plans(&self, provider: Option<&str>) -> Result<Vec<FixedPlan>> {
        let query: Vec<(&str, String)> = provider
            .map(|p| vec![("provider", p.to_string())])
            .unwrap_or_default();
        let body: Plans = self
            .core
            .api()
            .get_with_query("list fixed plans", "/fixed/plans", &query)
            .await?;
        Ok(body.plans)
    }

    /// Create a fixed subscription and return its id
    pub async fn create_subscription(&self, request: &FixedSubscriptionRequest) -> Result<i64> {
        self.core
            .create("create fixed subscription", "/fixed/subscriptions", request)
            .await
    }

    /// All fixed subscriptions
    pub async fn list_subscriptions(&self) -> Result<Vec<FixedSubscription>> {
        let body: FixedSubscriptions = self
            .core
            .api()
            .get("list fixed subscriptions", "/fixed/subscriptions")
            .await?;
        Ok(body.subscriptions)
    }

    /// One fixed subscription
    pub async fn get_subscription(&self, id: i64) -> Result<FixedSubscription> {
        self.core
            .api()
            .get(
                "get fixed subscription",
                &format!("/fixed/subscriptions/{id}"),
            )
            .await
            .or_not_found(|| Resource::FixedSubscription(id))
    }

    /// Rename or change plan or payment
    pub async fn update_subscription(
        &self,
        id: i64,
        request: &FixedSubscriptionRequest,
    ) -> Result<()> {
        self.core
            .update(
                "update fixed subscription",
                &format!("/fixed/subscriptions/{id}"),
                request,
            )
            .await
            .or_not_found(|| Resource::FixedSubscription(id))
    }

    /// Delete a fixed subscription
    pub async fn delete_subscription(&self, id: i64) -> Result<()> {
        self.core
            .delete(
                "delete fixed subscription",
                &format!("/fixed/subscriptions/{id}"),
            )
            .await
            .or_not_found(|| Resource::FixedSubscription(id))
    }

    /// Create a database and return its id
    pub async fn create_database(
        &self,
        subscription: i64,
        request: &FixedDatabaseRequest,
    ) -> Result<i64> {
        self.core
            .create(
                "create fixed database",
                &format!("/fixed/subscriptions/{subscription}/databases"),
                request,
            )
            .await
            .or_not_found(|| Resource::FixedSubscription(subscription))
    }

    /// Lazily iterate the databases of a fixed subscription
    pub fn list_databases(&self, subscription: i64) -> ListIter<FixedDatabasePage> {
        self.core.list(
            "list fixed databases",
            format!("/fixed/subscriptions/{subscription}/databases"),
        )
    }

    /// One fixed database
    pub async fn get_database(&self, subscription: i64, database: i64) -> Result<FixedDatabase> {
        self.core
            .api()
            .get(
                "get fixed database",
                &format!("/fixed/subscriptions/{subscription}/databases/{database}"),
            )
            .await
            .or_not_found(|| Resource::FixedDatabase {
                subscription,
                database,
            })
    }

    /// Change fixed database settings
    pub async fn update_database(
        &self,
        subscription: i64,
        database: i64,
        request: &FixedDatabaseRequest,
    ) -> Result<()> {
        self.core
            .update(
                "update fixed database",
                &format!("/fixed/subscriptions/{subscription}/databases/{database}"),
                request,
            )
            .await
            .or_not_found(|| Resource::FixedDatabase {
                subscription,
                database,
            })
    }

    /// Delete a fixed database
    pub async fn delete_database(&self, subscription: i64, database: i64) -> Result<()> {
        self.core
            .delete(
                "delete fixed database",
                &format!("/fixed/subscriptions/{subscription}/databases/{database}"),
            )
            .await
            .or_not_found(|| Resource::FixedDatabase {
                subscription,
                database,
            })
    }
}
