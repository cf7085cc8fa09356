//! Access control: users, roles and Redis ACL rules

use serde::{Deserialize, Serialize};

use super::ServiceCore;
use crate::error::{NotFoundExt, Resource, Result};

/// Request body for `POST /acl/users`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// Name
    pub name: String,
    /// Role to assign
    pub role: String,
    /// Password
    pub password: String,
}

/// Request body for `PUT /acl/users/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// An ACL user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request body for creating or updating a role
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rules and the databases they apply to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redis_rules: Vec<RoleRule>,
}

/// A rule granted by a role on a set of databases
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRule {
    /// Rule name
    pub rule_name: String,
    /// Databases the rule applies to
    #[serde(default)]
    pub databases: Vec<RoleDatabase>,
}

/// A database a role rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDatabase {
    /// Subscription id
    pub subscription_id: i64,
    /// Database id
    pub database_id: i64,
    /// Active-Active regions, all when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
}

/// An ACL role as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rules and the databases they apply to
    #[serde(default)]
    pub redis_rules: Vec<RoleRuleDetail>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A rule attached to a role, with the databases it covers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRuleDetail {
    /// Rule id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<i64>,
    /// Rule name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    /// Databases the rule applies to
    #[serde(default)]
    pub databases: Vec<RoleDatabaseDetail>,
}

/// A database covered by a role rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDatabaseDetail {
    /// Subscription id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<i64>,
    /// Database id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<i64>,
    /// Database name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Active-Active regions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<String>>,
}

/// Request body for creating or updating a Redis ACL rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedisRuleRequest {
    /// Name
    pub name: String,
    /// Rule text, e.g. `+@read ~*`
    pub redis_rule: String,
}

/// A Redis ACL rule such as `+@read ~*`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedisRule {
    /// Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// ACL rule text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
    /// Built-in rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct Users {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Deserialize)]
struct Roles {
    #[serde(default)]
    roles: Vec<Role>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedisRules {
    #[serde(default)]
    redis_rules: Vec<RedisRule>,
}

/// ACL management
#[derive(Clone, Debug)]
pub struct AclService {
    core: ServiceCore,
}

impl AclService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Create a user and return its id
    pub async fn create_user(&self, user: &CreateUser) -> Result<i64> {
        self.core.create("create user", "/acl/users", user).await
    }

    /// All ACL users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let body: Users = self.core.api().get("list users", "/acl/users").await?;
        Ok(body.users)
    }

    /// One ACL user
    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.core
            .api()
            .get("get user", &format!("/acl/users/{id}"))
            .await
            .or_not_found(|| Resource::User(id))
    }

    /// Change a user's role or password
    pub async fn update_user(&self, id: i64, user: &UpdateUser) -> Result<()> {
        self.core
            .update("update user", &format!("/acl/users/{id}"), user)
            .await
            .or_not_found(|| Resource::User(id))
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.core
            .delete("delete user", &format!("/acl/users/{id}"))
            .await
            .or_not_found(|| Resource::User(id))
    }

    /// Create a role and return its id
    pub async fn create_role(&self, role: &RoleRequest) -> Result<i64> {
        self.core.create("create role", "/acl/roles", role).await
    }

    /// All ACL roles
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let body: Roles = self.core.api().get("list roles", "/acl/roles").await?;
        Ok(body.roles)
    }

    /// Roles have no single-item endpoint; this scans the listing.
    pub async fn get_role(&self, id: i64) -> Result<Role> {
        self.list_roles()
            .await?
            .into_iter()
            .find(|role| role.id == Some(id))
            .ok_or_else(|| missing("get role", Resource::Role(id)))
    }

    /// Replace a role's name and rules
    pub async fn update_role(&self, id: i64, role: &RoleRequest) -> Result<()> {
        self.core
            .update("update role", &format!("/acl/roles/{id}"), role)
            .await
            .or_not_found(|| Resource::Role(id))
    }

    /// Delete a role
    pub async fn delete_role(&self, id: i64) -> Result<()> {
        self.core
            .delete("delete role", &format!("/acl/roles/{id}"))
            .await
            .or_not_found(|| Resource::Role(id))
    }

    /// Create a Redis ACL rule and return its id
    pub async fn create_redis_rule(&self, rule: &RedisRuleRequest) -> Result<i64> {
        self.core
            .create("create redis rule", "/acl/redisRules", rule)
            .await
    }

    /// All Redis ACL rules, built-in ones included
    pub async fn list_redis_rules(&self) -> Result<Vec<RedisRule>> {
        let body: RedisRules = self
            .core
            .api()
            .get("list redis rules", "/acl/redisRules")
            .await?;
        Ok(body.redis_rules)
    }

    /// Redis rules have no single-item endpoint; this scans the listing.
    pub async fn get_redis_rule(&self, id: i64) -> Result<RedisRule> {
        self.list_redis_rules()
            .await?
            .into_iter()
            .find(|rule| rule.id == Some(id))
            .ok_or_else(|| missing("get redis rule", Resource::RedisRule(id)))
    }

    /// Replace a rule's name and text
    pub async fn update_redis_rule(&self, id: i64, rule: &RedisRuleRequest) -> Result<()> {
        self.core
            .update("update redis rule", &format!("/acl/redisRules/{id}"), rule)
            .await
            .or_not_found(|| Resource::RedisRule(id))
    }

    /// Delete a rule
    pub async fn delete_redis_rule(&self, id: i64) -> Result<()> {
        self.core
            .delete("delete redis rule", &format!("/acl/redisRules/{id}"))
            .await
            .or_not_found(|| Resource::RedisRule(id))
    }
}

/// Not-found for resources only discoverable through a listing
fn missing(operation: &str, resource: Resource) -> crate::error::Error {
    crate::error::Error::NotFound {
        source: Box::new(crate::error::Error::Transport {
            operation: operation.to_string(),
            status: 404,
            body: format!("{resource} is not in the listing"),
        }),
        resource,
    }
}
