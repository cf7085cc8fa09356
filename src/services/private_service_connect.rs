//! GCP Private Service Connect
//!
//! Every operation is parameterised by a [`Scope`]; passing a region
//! addresses the Active-Active variant of the same endpoint. Reads go
//! through tasks.

use serde::{Deserialize, Serialize};

use super::{Scope, ServiceCore};
use crate::error::{NotFoundExt, Resource, Result};

/// A Private Service Connect service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PscService {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Hostname clients connect to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_host_name: Option<String>,
    /// GCP service attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_attachment_name: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request body for creating or updating an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PscEndpointRequest {
    /// GCP project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_project_id: Option<String>,
    /// GCP VPC name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_vpc_name: Option<String>,
    /// GCP subnet name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_vpc_subnet_name: Option<String>,
    /// Endpoint connection name prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_connection_name: Option<String>,
    /// `accept-pending` or `rejected`, update only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Endpoints attached to a service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PscEndpoints {
    /// Owning PSC service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psc_service_id: Option<i64>,
    /// Endpoints
    #[serde(default)]
    pub endpoints: Vec<PscEndpoint>,
}

/// A consumer endpoint of a PSC service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PscEndpoint {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// GCP project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_project_id: Option<String>,
    /// GCP VPC name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_vpc_name: Option<String>,
    /// GCP subnet name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_vpc_subnet_name: Option<String>,
    /// Endpoint connection name prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_connection_name: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Shell, PowerShell and optionally Terraform scripts for an endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PscScript {
    /// Bash script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<String>,
    /// PowerShell script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powershell: Option<String>,
    /// Terraform variables for GCP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_gcp: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ScriptEnvelope {
    #[serde(default)]
    script: Option<PscScript>,
}

/// Private Service Connect management
#[derive(Clone, Debug)]
pub struct PrivateServiceConnectService {
    core: ServiceCore,
}

impl PrivateServiceConnectService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// PSC service of the scope
    pub async fn get_service(&self, scope: Scope) -> Result<PscService> {
        self.core
            .read_via_task(
                "get private service connect service",
                &service_path(scope),
                &[],
            )
            .await
            .or_not_found(|| psc(scope))
    }

    /// Create the service and return its id
    pub async fn create_service(&self, scope: Scope) -> Result<i64> {
        self.core
            .create(
                "create private service connect service",
                &service_path(scope),
                &serde_json::json!({}),
            )
            .await
            .or_not_found(|| psc(scope))
    }

    /// Delete the PSC service
    pub async fn delete_service(&self, scope: Scope) -> Result<()> {
        self.core
            .delete(
                "delete private service connect service",
                &service_path(scope),
            )
            .await
            .or_not_found(|| psc(scope))
    }

    /// Endpoints of a PSC service
    pub async fn get_endpoints(&self, scope: Scope, service: i64) -> Result<PscEndpoints> {
        self.core
            .read_via_task(
                "get private service connect endpoints",
                &format!("{}/{service}", service_path(scope)),
                &[],
            )
            .await
            .or_not_found(|| psc(scope))
    }

    /// Create an endpoint and return its id
    pub async fn create_endpoint(
        &self,
        scope: Scope,
        service: i64,
        endpoint: &PscEndpointRequest,
    ) -> Result<i64> {
        self.core
            .create(
                "create private service connect endpoint",
                &endpoints_path(scope, service),
                endpoint,
            )
            .await
            .or_not_found(|| psc(scope))
    }

    /// Change an endpoint or apply an action such as `accept`
    pub async fn update_endpoint(
        &self,
        scope: Scope,
        service: i64,
        endpoint: i64,
        update: &PscEndpointRequest,
    ) -> Result<()> {
        self.core
            .update(
                "update private service connect endpoint",
                &format!("{}/{endpoint}", endpoints_path(scope, service)),
                update,
            )
            .await
            .or_not_found(|| psc_endpoint(scope, endpoint))
    }

    /// Delete an endpoint
    pub async fn delete_endpoint(&self, scope: Scope, service: i64, endpoint: i64) -> Result<()> {
        self.core
            .delete(
                "delete private service connect endpoint",
                &format!("{}/{endpoint}", endpoints_path(scope, service)),
            )
            .await
            .or_not_found(|| psc_endpoint(scope, endpoint))
    }

    /// Scripts that create the endpoint on the GCP side
    pub async fn creation_script(
        &self,
        scope: Scope,
        service: i64,
        endpoint: i64,
        include_terraform: bool,
    ) -> Result<Option<PscScript>> {
        self.script(
            "get private service connect endpoint creation script",
            scope,
            service,
            endpoint,
            "creationScripts",
            include_terraform,
        )
        .await
    }

    /// Scripts that remove the endpoint on the GCP side
    pub async fn deletion_script(
        &self,
        scope: Scope,
        service: i64,
        endpoint: i64,
        include_terraform: bool,
    ) -> Result<Option<PscScript>> {
        self.script(
            "get private service connect endpoint deletion script",
            scope,
            service,
            endpoint,
            "deletionScripts",
            include_terraform,
        )
        .await
    }

    async fn script(
        &self,
        operation: &str,
        scope: Scope,
        service: i64,
        endpoint: i64,
        kind: &str,
        include_terraform: bool,
    ) -> Result<Option<PscScript>> {
        let envelope: Option<ScriptEnvelope> = self
            .core
            .read_via_task(
                operation,
                &format!("{}/{endpoint}/{kind}", endpoints_path(scope, service)),
                &[("includeTerraformGcpScript", include_terraform.to_string())],
            )
            .await
            .or_not_found(|| psc_endpoint(scope, endpoint))?;
        Ok(envelope.and_then(|e| e.script))
    }
}

fn service_path(scope: Scope) -> String {
    format!("{}/private-service-connect", scope.path())
}

fn endpoints_path(scope: Scope, service: i64) -> String {
    format!("{}/{service}/endpoints", service_path(scope))
}

fn psc(scope: Scope) -> Resource {
    Resource::PrivateServiceConnect {
        subscription: scope.subscription,
        region: scope.region,
    }
}

fn psc_endpoint(scope: Scope, endpoint: i64) -> Resource {
    Resource::PrivateServiceConnectEndpoint {
        subscription: scope.subscription,
        region: scope.region,
        endpoint,
    }
}
