//! Integration tests for the deployment config lifecycle using wiremock
//!
//! These tests run create/read/delete/import against a mocked CodeDeploy
//! endpoint and check what is sent, what ends up in state, and how
//! errors surface.

use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use tf_codedeploy::aws::auth::AwsCredentials;
use tf_codedeploy::aws::client::DeployClient;
use tf_codedeploy::aws::error::{is_not_found, ApiError};
use tf_codedeploy::resource::{deployment_config, ResourceData};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREATE: &str = "CodeDeploy_20141006.CreateDeploymentConfig";
const GET: &str = "CodeDeploy_20141006.GetDeploymentConfig";
const DELETE: &str = "CodeDeploy_20141006.DeleteDeploymentConfig";

fn client(server: &MockServer) -> DeployClient {
    DeployClient::with_credentials(
        &server.uri(),
        "us-east-1",
        AwsCredentials::new("AKIDTEST", "secret", Some("session")),
        None,
    )
    .expect("client should build")
}

fn config(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("config must be an object")
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "__type": "DeploymentConfigDoesNotExistException",
        "message": "No deployment configuration found for name: gone"
    }))
}

/// Log sink shared with a test subscriber
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn operation(target: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", target))
}

/// Test module for create and the read that follows it
mod create_tests {
    use super::*;

    /// Creating "N" sends the expanded request, adopts "N" as the id and
    /// fills computed fields from the follow-up read
    #[tokio::test]
    async fn test_create_then_read_adopts_name() {
        let server = MockServer::start().await;

        operation(CREATE)
            .and(body_json(json!({
                "deploymentConfigName": "fleet-75",
                "computePlatform": "Server",
                "minimumHealthyHosts": {"type": "FLEET_PERCENT", "value": 75}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"deploymentConfigId": "d-123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        operation(GET)
            .and(body_json(json!({"deploymentConfigName": "fleet-75"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deploymentConfigInfo": {
                    "deploymentConfigId": "d-123",
                    "deploymentConfigName": "fleet-75",
                    "computePlatform": "Server",
                    "createTime": 1700000000.0,
                    "minimumHealthyHosts": {"type": "FLEET_PERCENT", "value": 75}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut data = ResourceData::from_config(config(json!({
            "deployment_config_name": "fleet-75",
            "minimum_healthy_hosts": [{"type": "FLEET_PERCENT", "value": 75}]
        })));

        deployment_config::create(&client(&server), &mut data)
            .await
            .expect("create should succeed");

        assert_eq!(data.id(), "fleet-75");
        assert!(!data.is_new_resource());
        assert_eq!(data.get("deployment_config_id"), Some(&json!("d-123")));
        assert_eq!(data.get("compute_platform"), Some(&json!("Server")));
        assert_eq!(
            data.get("minimum_healthy_hosts"),
            Some(&json!([{"type": "FLEET_PERCENT", "value": 75}]))
        );
        assert_eq!(data.get("traffic_routing_config"), Some(&json!([])));
        assert_eq!(data.get("zonal_config"), Some(&Value::Null));
    }

    /// Requests are signed and carry the JSON 1.1 content type
    #[tokio::test]
    async fn test_requests_are_signed() {
        let server = MockServer::start().await;

        operation(CREATE)
            .and(header("content-type", "application/x-amz-json-1.1"))
            .and(header("x-amz-security-token", "session"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        operation(GET)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deploymentConfigInfo": {"deploymentConfigName": "signed"}
            })))
            .mount(&server)
            .await;

        let mut data =
            ResourceData::from_config(config(json!({"deployment_config_name": "signed"})));
        deployment_config::create(&client(&server), &mut data)
            .await
            .expect("create should succeed");

        let requests = server.received_requests().await.expect("recording enabled");
        let auth = requests[0]
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDTEST/"));
        assert!(auth.contains("/us-east-1/codedeploy/aws4_request"));
        assert!(auth.contains(
            "SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target"
        ));
    }

    /// Canary and linear together are rejected before any request is sent
    #[tokio::test]
    async fn test_conflicting_traffic_routing_rejected_before_network() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut data = ResourceData::from_config(config(json!({
            "deployment_config_name": "both",
            "compute_platform": "Lambda",
            "traffic_routing_config": [{
                "type": "TimeBasedCanary",
                "time_based_canary": [{"interval": 10, "percentage": 10}],
                "time_based_linear": [{"interval": 1, "percentage": 10}]
            }]
        })));

        let err = deployment_config::create(&client(&server), &mut data)
            .await
            .expect_err("conflicting blocks must fail");

        assert!(format!("{:#}", err).contains("conflicts with"));
        assert!(data.is_gone());
        assert!(!data.is_new_resource());
    }

    /// A failed create call leaves nothing tracked
    #[tokio::test]
    async fn test_create_failure_tracks_nothing() {
        let server = MockServer::start().await;

        operation(CREATE)
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "DeploymentConfigAlreadyExistsException",
                "message": "already exists"
            })))
            .mount(&server)
            .await;

        operation(GET)
            .respond_with(not_found())
            .expect(0)
            .mount(&server)
            .await;

        let mut data = ResourceData::from_config(config(json!({"deployment_config_name": "dup"})));
        let err = deployment_config::create(&client(&server), &mut data)
            .await
            .expect_err("create should fail");

        assert_eq!(
            err.to_string(),
            "creating CodeDeploy Deployment Config (dup)"
        );
        let api = err
            .chain()
            .find_map(|c| c.downcast_ref::<ApiError>())
            .expect("service error in chain");
        assert_eq!(api.code, "DeploymentConfigAlreadyExistsException");
        assert!(data.is_gone());
        assert!(!data.is_new_resource());
    }

    /// Not-found on the read right after create is a hard error
    #[tokio::test]
    async fn test_first_read_not_found_is_error() {
        let server = MockServer::start().await;

        operation(CREATE)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"deploymentConfigId": "d-1"})),
            )
            .mount(&server)
            .await;

        operation(GET).respond_with(not_found()).mount(&server).await;

        let mut data =
            ResourceData::from_config(config(json!({"deployment_config_name": "vanished"})));
        let err = deployment_config::create(&client(&server), &mut data)
            .await
            .expect_err("first read must not self-heal");

        assert!(is_not_found(&err));
        assert_eq!(
            err.to_string(),
            "reading CodeDeploy Deployment Config (vanished)"
        );
        assert_eq!(data.id(), "vanished");
    }

    /// An empty Get result right after create is also a hard error
    #[tokio::test]
    async fn test_first_read_empty_result_is_error() {
        let server = MockServer::start().await;

        operation(CREATE)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        operation(GET)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let mut data = ResourceData::from_config(config(json!({"deployment_config_name": "empty"})));
        let err = deployment_config::create(&client(&server), &mut data)
            .await
            .expect_err("empty result must fail");

        assert!(is_not_found(&err));
        assert!(format!("{:#}", err).contains("empty result"));
    }
}

/// Test module for read on existing state
mod read_tests {
    use super::*;

    /// Deleted out-of-band: id cleared, no error
    #[tokio::test]
    async fn test_read_after_out_of_band_delete_clears_id() {
        let server = MockServer::start().await;

        operation(GET)
            .respond_with(not_found())
            .expect(1)
            .mount(&server)
            .await;

        let mut data = ResourceData::from_id("gone");
        deployment_config::read(&client(&server), &mut data)
            .await
            .expect("missing config should not be an error");

        assert!(data.is_gone());
    }

    /// The expected not-found is reported once, as a warning
    #[tokio::test]
    async fn test_read_not_found_logs_single_warning() {
        let server = MockServer::start().await;

        operation(GET).respond_with(not_found()).mount(&server).await;

        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut data = ResourceData::from_id("gone");
        deployment_config::read(&client(&server), &mut data)
            .await
            .expect("missing config should not be an error");

        let logs = capture.contents();
        assert!(!logs.contains("ERROR"), "unexpected error log: {}", logs);
        assert!(!logs.contains("API error"));
        assert_eq!(logs.matches("WARN").count(), 1);
        assert!(logs.contains("not found, removing from state"));
    }

    /// Namespaced exception names are recognised too
    #[tokio::test]
    async fn test_read_namespaced_not_found_clears_id() {
        let server = MockServer::start().await;

        operation(GET)
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "__type": "com.amazonaws.codedeploy#DeploymentConfigDoesNotExistException",
                "Message": "missing"
            })))
            .mount(&server)
            .await;

        let mut data = ResourceData::from_id("gone");
        deployment_config::read(&client(&server), &mut data)
            .await
            .expect("missing config should not be an error");
        assert!(data.is_gone());
    }

    /// Other failures are surfaced and the id is kept
    #[tokio::test]
    async fn test_read_service_error_is_surfaced() {
        let server = MockServer::start().await;

        operation(GET)
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "__type": "InternalFailure",
                "message": "boom"
            })))
            .mount(&server)
            .await;

        let mut data = ResourceData::from_id("keep-me");
        let err = deployment_config::read(&client(&server), &mut data)
            .await
            .expect_err("500 must fail");

        assert!(!is_not_found(&err));
        assert_eq!(err.to_string(), "reading CodeDeploy Deployment Config (keep-me)");
        assert_eq!(data.id(), "keep-me");
    }

    /// Read replaces every attribute, including nested blocks
    #[tokio::test]
    async fn test_read_full_refresh() {
        let server = MockServer::start().await;

        operation(GET)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deploymentConfigInfo": {
                    "deploymentConfigId": "d-9",
                    "deploymentConfigName": "lambda-linear",
                    "computePlatform": "Lambda",
                    "trafficRoutingConfig": {
                        "type": "TimeBasedLinear",
                        "timeBasedLinear": {"linearPercentage": 10, "linearInterval": 1}
                    },
                    "zonalConfig": {
                        "firstZoneMonitorDurationInSeconds": 900,
                        "monitorDurationInSeconds": 600,
                        "minimumHealthyHostsPerZone": {"type": "HOST_COUNT", "value": 1}
                    }
                }
            })))
            .mount(&server)
            .await;

        let mut data = ResourceData::from_id("lambda-linear");
        data.set("minimum_healthy_hosts", json!([{"type": "HOST_COUNT", "value": 3}]))
            .unwrap();

        deployment_config::read(&client(&server), &mut data)
            .await
            .expect("read should succeed");

        assert_eq!(data.get("compute_platform"), Some(&json!("Lambda")));
        assert_eq!(data.get("minimum_healthy_hosts"), Some(&json!([])));
        assert_eq!(
            data.get("traffic_routing_config"),
            Some(&json!([{
                "type": "TimeBasedLinear",
                "time_based_canary": [],
                "time_based_linear": [{"interval": 1, "percentage": 10}]
            }]))
        );
        assert_eq!(
            data.get("zonal_config"),
            Some(&json!([{
                "first_zone_monitor_duration_in_seconds": 900,
                "monitor_duration_in_seconds": 600,
                "minimum_healthy_hosts_per_zone": [{"type": "HOST_COUNT", "value": 1}]
            }]))
        );
    }

    /// Values the client does not recognise are stored as returned
    #[tokio::test]
    async fn test_read_keeps_unrecognised_enum_values() {
        let server = MockServer::start().await;

        operation(GET)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deploymentConfigInfo": {
                    "deploymentConfigId": "d-9",
                    "deploymentConfigName": "exp",
                    "computePlatform": "Lambda",
                    "trafficRoutingConfig": {"type": "TimeBasedExponential"}
                }
            })))
            .mount(&server)
            .await;

        let mut data = ResourceData::from_id("exp");
        deployment_config::read(&client(&server), &mut data)
            .await
            .expect("unrecognised type should not fail the read");

        assert_eq!(
            data.get("traffic_routing_config"),
            Some(&json!([{
                "type": "TimeBasedExponential",
                "time_based_canary": [],
                "time_based_linear": []
            }]))
        );
        assert_eq!(data.get("compute_platform"), Some(&json!("Lambda")));
    }

    /// Import sets only the id; read fills the rest
    #[tokio::test]
    async fn test_import_then_read() {
        let server = MockServer::start().await;

        operation(GET)
            .and(body_json(json!({"deploymentConfigName": "imported"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "deploymentConfigInfo": {
                    "deploymentConfigId": "d-7",
                    "deploymentConfigName": "imported",
                    "computePlatform": "ECS"
                }
            })))
            .mount(&server)
            .await;

        let mut data = deployment_config::import("imported");
        assert!(data.attributes().is_empty());

        deployment_config::read(&client(&server), &mut data)
            .await
            .expect("read should succeed");

        assert_eq!(data.id(), "imported");
        assert_eq!(data.get("deployment_config_name"), Some(&json!("imported")));
        assert_eq!(data.get("compute_platform"), Some(&json!("ECS")));
    }
}

/// Test module for delete
mod delete_tests {
    use super::*;

    /// Exactly one delete keyed by the id
    #[tokio::test]
    async fn test_delete_issues_single_call() {
        let server = MockServer::start().await;

        operation(DELETE)
            .and(body_json(json!({"deploymentConfigName": "old-config"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let data = ResourceData::from_id("old-config");
        deployment_config::delete(&client(&server), &data)
            .await
            .expect("delete should succeed");
    }

    /// Delete errors are surfaced with the id, including "does not exist"
    #[tokio::test]
    async fn test_delete_error_qualified_with_id() {
        let server = MockServer::start().await;

        operation(DELETE)
            .respond_with(not_found())
            .expect(1)
            .mount(&server)
            .await;

        let data = ResourceData::from_id("gone");
        let err = deployment_config::delete(&client(&server), &data)
            .await
            .expect_err("delete must fail");

        assert_eq!(err.to_string(), "deleting CodeDeploy Deployment Config (gone)");
        let full = format!("{:#}", err);
        assert!(full.contains("DeploymentConfigDoesNotExistException"));
        assert!(full.contains("No deployment configuration found for name: gone"));
    }
}
