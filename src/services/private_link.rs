//! AWS PrivateLink, scope-parameterised like Private Service Connect

use serde::{Deserialize, Serialize};

use super::{Scope, ServiceCore};
use crate::error::{NotFoundExt, Resource, Result};

/// Request body for `POST {scope}/private-link`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrivateLink {
    /// AWS RAM share name
    pub share_name: String,
    /// First principal to allow
    pub principal: String,
    /// Principal kind, e.g. `aws_account`
    #[serde(rename = "type")]
    pub principal_type: String,
    /// Display alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A principal allowed to connect
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Principal ARN or account id
    pub principal: String,
    /// Principal kind, e.g. `aws_account`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
    /// Display alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// PrivateLink configuration of a subscription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateLink {
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Allowed principals
    #[serde(default)]
    pub principals: Vec<Principal>,
    /// VPC Lattice resource configuration id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_configuration_id: Option<String>,
    /// VPC Lattice resource configuration ARN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_configuration_arn: Option<String>,
    /// AWS RAM share ARN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_arn: Option<String>,
    /// AWS RAM share name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_name: Option<String>,
    /// Consumer connections
    #[serde(default)]
    pub connections: Vec<serde_json::Value>,
    /// Databases reachable through the link
    #[serde(default)]
    pub databases: Vec<serde_json::Value>,
}

/// Script that creates the consumer-side endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointScript {
    /// AWS CLI script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_endpoint_script: Option<String>,
    /// Terraform script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_aws_script: Option<String>,
}

/// PrivateLink management
#[derive(Clone, Debug)]
pub struct PrivateLinkService {
    core: ServiceCore,
}

impl PrivateLinkService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// PrivateLink configuration, read through a task
    pub async fn get(&self, scope: Scope) -> Result<PrivateLink> {
        self.core
            .read_via_task("get private link", &base(scope), &[])
            .await
            .or_not_found(|| private_link(scope))
    }

    /// Create the PrivateLink share
    pub async fn create(&self, scope: Scope, request: &CreatePrivateLink) -> Result<()> {
        self.core
            .post_and_wait("create private link", &base(scope), request)
            .await
            .or_not_found(|| private_link(scope))
    }

    /// Allow another principal
    pub async fn add_principal(&self, scope: Scope, principal: &Principal) -> Result<()> {
        self.core
            .post_and_wait(
                "add private link principal",
                &format!("{}/principals", base(scope)),
                principal,
            )
            .await
            .or_not_found(|| private_link(scope))
    }

    /// Revoke a principal
    pub async fn remove_principal(&self, scope: Scope, principal: &Principal) -> Result<()> {
        self.core
            .delete_with_body(
                "remove private link principal",
                &format!("{}/principals", base(scope)),
                principal,
            )
            .await
            .or_not_found(|| private_link(scope))
    }

    /// Consumer endpoint script, Terraform included
    pub async fn endpoint_script(&self, scope: Scope) -> Result<EndpointScript> {
        self.core
            .read_via_task(
                "get private link endpoint script",
                &format!("{}/endpoint-script", base(scope)),
                &[("includeTerraformAwsScript", "true".to_string())],
            )
            .await
            .or_not_found(|| private_link(scope))
    }
}

fn base(scope: Scope) -> String {
    format!("{}/private-link", scope.path())
}

fn private_link(scope: Scope) -> Resource {
    Resource::PrivateLink {
        subscription: scope.subscription,
        region: scope.region,
    }
}
