//! AWS Transit Gateway attachments and resource-share invitations

use serde::{Deserialize, Serialize};

use super::{Scope, ServiceCore};
use crate::error::{NotFoundExt, Resource, Result};

/// A Transit Gateway visible to the subscription
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitGateway {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// AWS Transit Gateway id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_tgw_uid: Option<String>,
    /// AWS attachment id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_uid: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Attachment state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_status: Option<String>,
    /// AWS account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// Routed CIDRs
    #[serde(default)]
    pub cidrs: Vec<Cidr>,
}

/// A CIDR routed through an attachment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cidr {
    /// CIDR block
    pub cidr_address: String,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A pending or handled resource-share invitation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// AWS resource share id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_share_uid: Option<String>,
    /// AWS account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// When the share was offered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_date: Option<String>,
}

#[derive(Serialize)]
struct CidrUpdate<'a> {
    cidrs: Vec<CidrAddress<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CidrAddress<'a> {
    cidr_address: &'a str,
}

#[derive(Deserialize)]
struct Gateways {
    #[serde(default)]
    tgws: Vec<TransitGateway>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Invitations {
    #[serde(default)]
    resource_shares: Vec<Invitation>,
}

/// Transit Gateway management
#[derive(Clone, Debug)]
pub struct TransitGatewayService {
    core: ServiceCore,
}

impl TransitGatewayService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Transit Gateways visible to the scope
    pub async fn list(&self, scope: Scope) -> Result<Vec<TransitGateway>> {
        let body: Option<Gateways> = self
            .core
            .read_via_task("list transit gateways", &base(scope), &[])
            .await
            .or_not_found(|| Resource::Subscription(scope.subscription))?;
        Ok(body.map(|b| b.tgws).unwrap_or_default())
    }

    /// Attach the subscription to a Transit Gateway
    pub async fn create_attachment(&self, scope: Scope, gateway: i64) -> Result<()> {
        self.core
            .post_and_wait(
                "create transit gateway attachment",
                &attachment(scope, gateway),
                &serde_json::json!({}),
            )
            .await
            .or_not_found(|| tgw(scope, gateway))
    }

    /// Replace the CIDRs routed through the attachment
    pub async fn update_attachment_cidrs(
        &self,
        scope: Scope,
        gateway: i64,
        cidrs: &[String],
    ) -> Result<()> {
        let body = CidrUpdate {
            cidrs: cidrs
                .iter()
                .map(|c| CidrAddress { cidr_address: c })
                .collect(),
        };
        self.core
            .update(
                "update transit gateway attachment",
                &attachment(scope, gateway),
                &body,
            )
            .await
            .or_not_found(|| tgw(scope, gateway))
    }

    /// Detach from a Transit Gateway
    pub async fn delete_attachment(&self, scope: Scope, gateway: i64) -> Result<()> {
        self.core
            .delete(
                "delete transit gateway attachment",
                &attachment(scope, gateway),
            )
            .await
            .or_not_found(|| tgw(scope, gateway))
    }

    /// Resource-share invitations
    pub async fn list_invitations(&self, scope: Scope) -> Result<Vec<Invitation>> {
        let body: Option<Invitations> = self
            .core
            .read_via_task(
                "list transit gateway invitations",
                &format!("{}/invitations", base(scope)),
                &[],
            )
            .await
            .or_not_found(|| Resource::Subscription(scope.subscription))?;
        Ok(body.map(|b| b.resource_shares).unwrap_or_default())
    }

    /// Accept an invitation
    pub async fn accept_invitation(&self, scope: Scope, invitation: i64) -> Result<()> {
        self.respond(scope, invitation, "accept").await
    }

    /// Reject an invitation
    pub async fn reject_invitation(&self, scope: Scope, invitation: i64) -> Result<()> {
        self.respond(scope, invitation, "reject").await
    }

    async fn respond(&self, scope: Scope, invitation: i64, action: &str) -> Result<()> {
        self.core
            .update(
                &format!("{action} transit gateway invitation"),
                &format!("{}/invitations/{invitation}/{action}", base(scope)),
                &serde_json::json!({}),
            )
            .await
            .or_not_found(|| Resource::Subscription(scope.subscription))
    }
}

fn base(scope: Scope) -> String {
    format!("{}/transitGateways", scope.path())
}

fn attachment(scope: Scope, gateway: i64) -> String {
    format!("{}/{gateway}/attachment", base(scope))
}

fn tgw(scope: Scope, gateway: i64) -> Resource {
    Resource::TransitGatewayAttachment {
        subscription: scope.subscription,
        region: scope.region,
        gateway,
    }
}
