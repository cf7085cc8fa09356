//! Resource services: paths, task-backed reads and not-found lifting

use rediscloud_api::services::subscriptions::CidrAllowlist;
use rediscloud_api::{Error, Resource, Scope};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{accepted, client_for, completed_with_resource, ok_json, task};

#[tokio::test]
async fn test_direct_404_lifts_to_named_resource() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/10"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.subscriptions().get(10).await.unwrap_err();

    assert_eq!(err.to_string(), "subscription 10 not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_active_active_scope_in_path_and_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/10/regions/1/private-service-connect"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .private_service_connect()
        .get_service(Scope::region(10, 1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::NotFound {
            resource: Resource::PrivateServiceConnect {
                subscription: 10,
                region: Some(1)
            },
            ..
        }
    ));
    assert_eq!(err.to_string(), "psc in subscription 10 region 1 not found");
}

#[tokio::test]
async fn test_task_backed_read_decodes_resource() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/7/cidr"))
        .respond_with(ok_json(task("C1", "received")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/C1"))
        .respond_with(ok_json(completed_with_resource(
            "C1",
            json!({"cidrIps": ["10.0.0.0/24"], "securityGroupIds": []}),
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let allowlist = client.subscriptions().get_cidr_allowlist(7).await.unwrap();

    assert_eq!(
        allowlist,
        CidrAllowlist {
            cidr_ips: Some(vec!["10.0.0.0/24".to_string()]),
            security_group_ids: Some(vec![]),
        }
    );
}

#[tokio::test]
async fn test_backup_status_passes_region_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/1/databases/2/backup"))
        .and(query_param("regionName", "us-east-1"))
        .respond_with(ok_json(task("B1", "received")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/B1"))
        .respond_with(ok_json(completed_with_resource(
            "B1",
            json!({"status": "success", "lastBackupTime": "2024-03-01T00:00:00Z"}),
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client
        .databases()
        .latest_backup_status(1, 2, Some("us-east-1"))
        .await
        .unwrap();

    assert_eq!(status.status.as_deref(), Some("success"));
}

#[tokio::test]
async fn test_psc_script_requests_terraform() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/v1/subscriptions/4/private-service-connect/8/endpoints/9/creationScripts",
        ))
        .and(query_param("includeTerraformGcpScript", "true"))
        .respond_with(ok_json(task("S1", "received")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/S1"))
        .respond_with(ok_json(completed_with_resource(
            "S1",
            json!({"script": {"bash": "gcloud compute ...", "terraformGcp": {"serviceAttachments": []}}}),
        )))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let script = client
        .private_service_connect()
        .creation_script(Scope::subscription(4), 8, 9, true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(script.bash.as_deref(), Some("gcloud compute ..."));
    assert!(script.terraform_gcp.is_some());
}

#[tokio::test]
async fn test_transit_gateway_cidr_update_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/subscriptions/4/regions/2/transitGateways/9/attachment"))
        .and(body_json(json!({"cidrs": [{"cidrAddress": "10.10.0.0/16"}]})))
        .respond_with(accepted("G1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/G1"))
        .respond_with(ok_json(task("G1", "processing-completed")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .transit_gateways()
        .update_attachment_cidrs(Scope::region(4, 2), 9, &["10.10.0.0/16".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_regions_filtered_by_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/regions"))
        .and(query_param("provider", "GCP"))
        .respond_with(ok_json(json!({
            "regions": [{"name": "europe-west1", "provider": "GCP"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let regions = client.account().list_regions(Some("GCP")).await.unwrap();

    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].name.as_deref(), Some("europe-west1"));
}

#[tokio::test]
async fn test_fixed_plan_prices_are_decimal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/fixed/plans"))
        .respond_with(ok_json(json!({
            "plans": [{"id": 98, "name": "Standard 250MB", "price": "5", "priceCurrency": "USD"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let plans = client.fixed().list_plans(None).await.unwrap();

    assert_eq!(plans[0].price, Some(Decimal::from_str("5").unwrap()));
}

#[tokio::test]
async fn test_role_missing_from_listing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/acl/roles"))
        .respond_with(ok_json(json!({"roles": [{"id": 1, "name": "admins"}]})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.acl().get_role(1).await.unwrap().name.as_deref(),
        Some("admins")
    );

    let err = client.acl().get_role(42).await.unwrap_err();
    assert_eq!(err.to_string(), "role 42 not found");
    assert!(err.is_not_found());
}
