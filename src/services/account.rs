//! Account-level catalogues: payment methods, regions, modules and persistence options

use serde::{Deserialize, Serialize};

use super::ServiceCore;
use crate::error::Result;

/// A payment method registered on the account
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Payment method type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
    /// Last four card digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_ends_with: Option<i32>,
    /// Card holder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_on_card: Option<String>,
    /// Card expiry month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<i32>,
    /// Card expiry year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<i32>,
}

/// A cloud region where subscriptions can be deployed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cloud provider, `AWS` or `GCP`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// A Redis module available to databases
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseModule {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Capability the module adds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_name: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tunable parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ModuleParameter>>,
}

/// A tunable module parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleParameter {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameter type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Whether the parameter is mandatory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A data persistence option such as `aof-every-1-second`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPersistence {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentMethods {
    #[serde(default)]
    payment_methods: Vec<PaymentMethod>,
}

#[derive(Deserialize)]
struct Regions {
    #[serde(default)]
    regions: Vec<Region>,
}

#[derive(Deserialize)]
struct Modules {
    #[serde(default)]
    modules: Vec<DatabaseModule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPersistenceOptions {
    #[serde(default)]
    data_persistence: Vec<DataPersistence>,
}

/// Account catalogues
#[derive(Clone, Debug)]
pub struct AccountService {
    core: ServiceCore,
}

impl AccountService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Payment methods on file
    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        let body: PaymentMethods = self
            .core
            .api()
            .get("list payment methods", "/payment-methods")
            .await?;
        Ok(body.payment_methods)
    }

    /// Supported regions, optionally restricted to one provider (`AWS`, `GCP`)
    pub async fn list_regions(&self, provider: Option<&str>) -> Result<Vec<Region>> {
        let query: Vec<(&str, String)> = provider
            .map(|p| vec![("provider", p.to_string())])
            .unwrap_or_default();
        let body: Regions = self
            .core
            .api()
            .get_with_query("list regions", "/regions", &query)
            .await?;
        Ok(body.regions)
    }

    /// Redis modules that can be enabled on databases
    pub async fn list_database_modules(&self) -> Result<Vec<DatabaseModule>> {
        let body: Modules = self
            .core
            .api()
            .get("list database modules", "/database-modules")
            .await?;
        Ok(body.modules)
    }

    /// Data persistence options
    pub async fn list_data_persistence(&self) -> Result<Vec<DataPersistence>> {
        let body: DataPersistenceOptions = self
            .core
            .api()
            .get("list data persistence options", "/data-persistence")
            .await?;
        Ok(body.data_persistence)
    }
}
