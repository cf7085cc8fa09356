//! Cloud provider accounts (bring-your-own-cloud credentials)

use serde::{Deserialize, Serialize};

use super::ServiceCore;
use crate::error::{NotFoundExt, Resource, Result};

/// Request body for `POST /cloud-accounts`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCloudAccount {
    /// AWS access key id
    pub access_key_id: String,
    /// AWS secret access key
    pub access_secret_key: String,
    /// Console user name
    pub console_username: String,
    /// Console password
    pub console_password: String,
    /// Name
    pub name: String,
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// AWS console sign-in URL
    pub sign_in_login_url: String,
}

/// Request body for `PUT /cloud-accounts/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCloudAccount {
    /// AWS access key id
    pub access_key_id: String,
    /// AWS secret access key
    pub access_secret_key: String,
    /// Console user name
    pub console_username: String,
    /// Console password
    pub console_password: String,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// AWS console sign-in URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_login_url: Option<String>,
}

/// A registered cloud account
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAccount {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cloud provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// AWS access key id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// AWS console sign-in URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_login_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudAccounts {
    #[serde(default)]
    cloud_accounts: Vec<CloudAccount>,
}

/// Cloud account management
#[derive(Clone, Debug)]
pub struct CloudAccountService {
    core: ServiceCore,
}

impl CloudAccountService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Register a cloud account and return its id
    pub async fn create(&self, account: &CreateCloudAccount) -> Result<i64> {
        self.core
            .create("create cloud account", "/cloud-accounts", account)
            .await
    }

    /// All cloud accounts
    pub async fn list(&self) -> Result<Vec<CloudAccount>> {
        let body: CloudAccounts = self
            .core
            .api()
            .get("list cloud accounts", "/cloud-accounts")
            .await?;
        Ok(body.cloud_accounts)
    }

    /// One cloud account
    pub async fn get(&self, id: i64) -> Result<CloudAccount> {
        self.core
            .api()
            .get("get cloud account", &format!("/cloud-accounts/{id}"))
            .await
            .or_not_found(|| Resource::CloudAccount(id))
    }

    /// Replace the account's credentials
    pub async fn update(&self, id: i64, account: &UpdateCloudAccount) -> Result<()> {
        self.core
            .update(
                "update cloud account",
                &format!("/cloud-accounts/{id}"),
                account,
            )
            .await
            .or_not_found(|| Resource::CloudAccount(id))
    }

    /// Remove the account
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.core
            .delete("delete cloud account", &format!("/cloud-accounts/{id}"))
            .await
            .or_not_found(|| Resource::CloudAccount(id))
    }
}
