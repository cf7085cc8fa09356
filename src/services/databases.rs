//! Databases inside pro subscriptions
//!
//! Includes backups, imports and the regional update of Active-Active
//! databases. Listing is paginated: the server wraps each page in a
//! per-subscription envelope, flattened by [`DatabasePage`].

use serde::{Deserialize, Serialize};

use super::subscriptions::{ModuleSpec, Throughput};
use super::ServiceCore;
use crate::error::{NotFoundExt, Resource, Result};
use crate::runtime::{ListIter, PagedResponse};

/// Request body for `POST /subscriptions/{id}/databases`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabase {
    /// Validate and price without applying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    /// Database name
    pub name: String,
    /// `redis` or `memcached`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// TCP port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    /// Memory limit in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_in_gb: Option<f64>,
    /// Dataset size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_size_in_gb: Option<f64>,
    /// Redis version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_version: Option<String>,
    /// `resp2` or `resp3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp_version: Option<String>,
    /// Expose the OSS Cluster API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_oss_cluster_api: Option<bool>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Eviction policy, e.g. `allkeys-lru`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_eviction_policy: Option<String>,
    /// Enable replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<bool>,
    /// Throughput target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_measurement: Option<Throughput>,
    /// Average item size, used for sizing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_item_size_in_bytes: Option<i64>,
    /// Source endpoints this database replicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_of: Option<Vec<String>>,
    /// Source IP allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<Vec<String>>,
    /// Require TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
    /// PEM client certificate for TLS authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ssl_certificate: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Alert thresholds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    /// Modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<ModuleSpec>>,
    /// Remote backup settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_backup: Option<RemoteBackup>,
}

/// Request body for `PUT /subscriptions/{id}/databases/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatabase {
    /// Validate and price without applying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Memory limit in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_in_gb: Option<f64>,
    /// Dataset size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_size_in_gb: Option<f64>,
    /// `resp2` or `resp3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp_version: Option<String>,
    /// Expose the OSS Cluster API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_oss_cluster_api: Option<bool>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Eviction policy, e.g. `allkeys-lru`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_eviction_policy: Option<String>,
    /// Enable replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<bool>,
    /// Throughput target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_measurement: Option<Throughput>,
    /// Source endpoints this database replicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_of: Option<Vec<String>>,
    /// Source IP allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<Vec<String>>,
    /// Require TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
    /// PEM client certificate for TLS authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ssl_certificate: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Alert thresholds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    /// Remote backup settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_backup: Option<RemoteBackup>,
}

/// Database alert threshold
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert type, e.g. `dataset-size`
    pub name: String,
    /// Threshold value
    pub value: i64,
}

/// Periodic backup destination
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBackup {
    /// Whether remote backup is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Backup interval, e.g. `every-12-hours`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// Backup time of day, UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_utc: Option<String>,
    /// Storage type, e.g. `aws-s3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    /// Bucket or container URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

/// A database as returned by the API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
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
    /// Redis version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_version: Option<String>,
    /// `resp2` or `resp3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp_version: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Memory limit in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_in_gb: Option<f64>,
    /// Dataset size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_size_in_gb: Option<f64>,
    /// Memory in use, in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_used_in_mb: Option<f64>,
    /// Expose the OSS Cluster API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_oss_cluster_api: Option<bool>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Enable replication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<bool>,
    /// Eviction policy, e.g. `allkeys-lru`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_eviction_policy: Option<String>,
    /// Throughput target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_measurement: Option<Throughput>,
    /// Activation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_on: Option<String>,
    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_endpoint: Option<String>,
    /// Private endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_endpoint: Option<String>,
    /// Source endpoints this database replicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_of: Option<serde_json::Value>,
    /// Security settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
    /// Modules
    #[serde(default)]
    pub modules: Vec<DatabaseModuleDetail>,
    /// Alert thresholds
    #[serde(default)]
    pub alerts: Vec<Alert>,
    /// Remote backup settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<RemoteBackup>,
}

/// Access settings of a database
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Whether the default user is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_default_user: Option<bool>,
    /// Client authentication over SSL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_client_authentication: Option<bool>,
    /// Client authentication over TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_authentication: Option<bool>,
    /// Require TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
    /// Source IP allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ips: Option<Vec<String>>,
}

/// A module enabled on a database
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseModuleDetail {
    /// Module id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Module version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Configured parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// One page of `GET /subscriptions/{id}/databases`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePage {
    /// Owning account
    #[serde(default)]
    pub account_id: Option<i64>,
    /// Subscriptions in this page
    #[serde(default)]
    pub subscription: Vec<SubscriptionDatabases>,
}

/// Databases of one subscription within a page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDatabases {
    /// Subscription id
    #[serde(default)]
    pub subscription_id: Option<i64>,
    /// Number of databases
    #[serde(default)]
    pub number_of_databases: Option<i64>,
    /// Databases of the subscription
    #[serde(default)]
    pub databases: Vec<Database>,
}

impl PagedResponse for DatabasePage {
    type Item = Database;

    fn into_items(self) -> Vec<Database> {
        self.subscription
            .into_iter()
            .flat_map(|s| s.databases)
            .collect()
    }
}

/// Request body for `POST .../backup`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRequest {
    /// Region to back up, Active-Active only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
}

/// Request body for `POST .../import`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// `http`, `redis`, `ftp`, `aws-s3`, `azure-blob-storage` or `google-blob-storage`
    pub source_type: String,
    /// Source URIs
    pub import_from_uri: Vec<String>,
}

/// Outcome of the most recent backup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBackupStatus {
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Time of the last backup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_time: Option<String>,
    /// Failure reason, if failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Outcome of the most recent import
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestImportStatus {
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Time of the last import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_import_time: Option<String>,
    /// Failure reason, if failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Parameters for the failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason_params: Option<Vec<serde_json::Value>>,
}

/// Request body for `PUT .../regions` on an Active-Active database
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActiveActiveDatabase {
    /// Validate and price without applying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    /// Memory limit in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_in_gb: Option<f64>,
    /// Dataset size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_size_in_gb: Option<f64>,
    /// Expose the OSS Cluster API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_oss_cluster_api: Option<bool>,
    /// Require TLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
    /// PEM client certificate for TLS authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ssl_certificate: Option<String>,
    /// Persistence for every region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_data_persistence: Option<String>,
    /// Password for every region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_password: Option<String>,
    /// Source IP allowlist for every region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_source_ip: Option<Vec<String>>,
    /// Alerts for every region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_alerts: Option<Vec<Alert>>,
    /// Per-region overrides
    #[serde(default)]
    pub regions: Vec<LocalRegionProperties>,
}

/// Per-region overrides of an Active-Active database
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalRegionProperties {
    /// Region this override applies to
    pub region: String,
    /// Remote backup settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_backup: Option<RemoteBackup>,
    /// Regional throughput
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_throughput_measurement: Option<LocalThroughput>,
    /// Persistence option, e.g. `aof-every-1-second`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_persistence: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Source IP allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<Vec<String>>,
    /// Alert thresholds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
}

/// Throughput of one Active-Active region
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalThroughput {
    /// Region name
    pub region: String,
    /// Write operations per second
    pub write_operations_per_second: i64,
    /// Read operations per second
    pub read_operations_per_second: i64,
}

/// Database management
#[derive(Clone, Debug)]
pub struct DatabaseService {
    core: ServiceCore,
}

impl DatabaseService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Create a database and return its id
    pub async fn create(&self, subscription: i64, database: &CreateDatabase) -> Result<i64> {
        self.core
            .create(
                "create database",
                &format!("/subscriptions/{subscription}/databases"),
                database,
            )
            .await
            .or_not_found(|| Resource::Subscription(subscription))
    }

    /// Lazily iterate the subscription's databases
    pub fn list(&self, subscription: i64) -> ListIter<DatabasePage> {
        self.core.list(
            "list databases",
            format!("/subscriptions/{subscription}/databases"),
        )
    }

    /// One database
    pub async fn get(&self, subscription: i64, database: i64) -> Result<Database> {
        self.core
            .api()
            .get(
                "get database",
                &format!("/subscriptions/{subscription}/databases/{database}"),
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Change database settings
    pub async fn update(
        &self,
        subscription: i64,
        database: i64,
        update: &UpdateDatabase,
    ) -> Result<()> {
        self.core
            .update(
                "update database",
                &format!("/subscriptions/{subscription}/databases/{database}"),
                update,
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Delete a database
    pub async fn delete(&self, subscription: i64, database: i64) -> Result<()> {
        self.core
            .delete(
                "delete database",
                &format!("/subscriptions/{subscription}/databases/{database}"),
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Trigger a backup now and wait for it
    pub async fn backup(
        &self,
        subscription: i64,
        database: i64,
        request: &BackupRequest,
    ) -> Result<()> {
        self.core
            .post_and_wait(
                "backup database",
                &format!("/subscriptions/{subscription}/databases/{database}/backup"),
                request,
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Import data into the database and wait for the import
    pub async fn import(
        &self,
        subscription: i64,
        database: i64,
        request: &ImportRequest,
    ) -> Result<()> {
        self.core
            .post_and_wait(
                "import database",
                &format!("/subscriptions/{subscription}/databases/{database}/import"),
                request,
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Status of the latest backup; `region` selects an Active-Active region
    pub async fn latest_backup_status(
        &self,
        subscription: i64,
        database: i64,
        region: Option<&str>,
    ) -> Result<LatestBackupStatus> {
        let query: Vec<(&str, String)> = region
            .map(|r| vec![("regionName", r.to_string())])
            .unwrap_or_default();
        self.core
            .read_via_task(
                "get latest backup status",
                &format!("/subscriptions/{subscription}/databases/{database}/backup"),
                &query,
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Status of the latest import
    pub async fn latest_import_status(
        &self,
        subscription: i64,
        database: i64,
    ) -> Result<LatestImportStatus> {
        self.core
            .read_via_task(
                "get latest import status",
                &format!("/subscriptions/{subscription}/databases/{database}/import"),
                &[],
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }

    /// Update global and per-region settings of an Active-Active database
    pub async fn update_active_active(
        &self,
        subscription: i64,
        database: i64,
        update: &UpdateActiveActiveDatabase,
    ) -> Result<()> {
        self.core
            .update(
                "update active-active database",
                &format!("/subscriptions/{subscription}/databases/{database}/regions"),
                update,
            )
            .await
            .or_not_found(|| Resource::Database {
                subscription,
                database,
            })
    }
}
