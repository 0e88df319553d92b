//! Integration tests for eureka-client against a mock registry server.

use std::collections::BTreeMap;
use std::net::IpAddr;

use eureka_client::{
    EurekaClient, EurekaError, InstanceStatus, RegistryClient,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP: &str = "my-app";
const HOST: &str = "10.5.0.50";
const PORT: u16 = 8080;
const INSTANCE_ID: &str = "10.5.0.50:my-app:8080";

fn ip() -> IpAddr {
    HOST.parse().unwrap()
}

async fn client_for(server: &MockServer) -> EurekaClient {
    EurekaClient::new([server.uri()], APP, HOST, PORT).unwrap()
}

#[tokio::test]
async fn register_posts_instance_xml() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/eureka/v2/apps/{APP}")))
        .and(header("content-type", "application/xml"))
        .and(header("accept", "application/xml"))
        .and(body_string_contains(r#"<port enabled="true">8080</port>"#))
        .and(body_string_contains(r#"<securePort enabled="false">8080</securePort>"#))
        .and(body_string_contains("<instanceId>10.5.0.50:my-app:8080</instanceId>"))
        .and(body_string_contains("<status>UP</status>"))
        .and(body_string_contains("<evictionDurationInSecs>3</evictionDurationInSecs>"))
        .and(body_string_contains("<name>MyOwn</name>"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let handle = client.register(ip(), 3, false).await.unwrap();
    assert_eq!(handle.id, INSTANCE_ID);
}

#[tokio::test]
async fn register_accepts_created_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/eureka/v2/apps/{APP}")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.register(ip(), 30, true).await.unwrap();
}

#[tokio::test]
async fn register_surfaces_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.register(ip(), 30, false).await.unwrap_err();
    assert!(matches!(err, EurekaError::Registration { .. }));
    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn heartbeat_renews_lease() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}")))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.heartbeat().await.unwrap();
}

#[tokio::test]
async fn heartbeat_404_is_not_found_result_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // At the transport layer 404 is a boolean result.
    let registry = RegistryClient::new([server.uri()]).unwrap();
    let exists = registry.heartbeat(APP, INSTANCE_ID).await.unwrap();
    assert!(!exists);

    // The facade converts it into a distinguished error.
    let client = client_for(&server).await;
    let err = client.heartbeat().await.unwrap_err();
    assert!(matches!(err, EurekaError::InstanceNotFound { .. }));
}

#[tokio::test]
async fn heartbeat_other_status_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.heartbeat().await.unwrap_err();
    match err {
        EurekaError::Heartbeat { instance, source } => {
            assert_eq!(instance, INSTANCE_ID);
            assert!(matches!(*source, EurekaError::Protocol { .. }));
        }
        other => panic!("expected heartbeat error, got {other:?}"),
    }
}

#[tokio::test]
async fn unregister_deletes_instance() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.unregister().await.unwrap();
}

#[tokio::test]
async fn failover_uses_next_url_after_transport_failure() {
    let reachable = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&reachable)
        .await;

    let never_reached = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&never_reached)
        .await;

    // Nothing listens on port 1; the first attempt fails at the
    // transport level and the second URL serves the request. The third
    // URL must not be attempted.
    let registry = RegistryClient::new([
        "http://127.0.0.1:1".to_string(),
        reachable.uri(),
        never_reached.uri(),
    ])
    .unwrap();

    let exists = registry.heartbeat(APP, INSTANCE_ID).await.unwrap();
    assert!(exists);
}

#[tokio::test]
async fn http_error_status_does_not_fail_over() {
    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&failing)
        .await;

    let never_reached = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&never_reached)
        .await;

    let registry = RegistryClient::new([failing.uri(), never_reached.uri()]).unwrap();
    let err = registry.get_all_applications().await.unwrap_err();
    assert!(matches!(err, EurekaError::Protocol { .. }));
}

#[tokio::test]
async fn exhausted_failover_names_last_url() {
    let registry =
        RegistryClient::new(["http://127.0.0.1:1", "http://127.0.0.1:2"]).unwrap();

    let err = registry.get_all_applications().await.unwrap_err();
    assert!(err.is_transport());
    match err {
        EurekaError::Transport { url, .. } => {
            assert_eq!(url, "http://127.0.0.1:2/eureka/v2");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_application_decodes_xml() {
    let body = r#"
        <application>
          <name>MY-APP</name>
          <instance>
            <hostName>host-1</hostName>
            <app>MY-APP</app>
            <ipAddr>10.0.0.1</ipAddr>
            <status>UP</status>
            <port enabled="true">8080</port>
            <dataCenterInfo><name>MyOwn</name></dataCenterInfo>
          </instance>
        </application>"#;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eureka/v2/apps/MY-APP"))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let app = client.get_application("MY-APP").await.unwrap();
    assert_eq!(app.name, "MY-APP");
    assert_eq!(app.instances.len(), 1);
    assert_eq!(app.instances[0].status, InstanceStatus::Up);
    assert_eq!(app.instances[0].port.unwrap().value, 8080);
}

#[tokio::test]
async fn get_instance_decodes_single_record() {
    let body = r#"
        <instance>
          <hostName>host-1</hostName>
          <app>MY-APP</app>
          <ipAddr>10.0.0.1</ipAddr>
          <status>UP</status>
          <overriddenstatus>UNKNOWN</overriddenstatus>
          <port enabled="true">8080</port>
          <securePort enabled="false">443</securePort>
          <dataCenterInfo><name>MyOwn</name></dataCenterInfo>
          <leaseInfo><evictionDurationInSecs>90</evictionDurationInSecs></leaseInfo>
          <metadata><zone>us-east-1a</zone></metadata>
          <instanceId>host-1:MY-APP:8080</instanceId>
        </instance>"#;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eureka/v2/apps/MY-APP/host-1:MY-APP:8080"))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let inst = client
        .get_instance("MY-APP", "host-1:MY-APP:8080")
        .await
        .unwrap();
    assert_eq!(inst.host_name, "host-1");
    assert_eq!(inst.status, InstanceStatus::Up);
    assert_eq!(inst.instance_id.as_deref(), Some("host-1:MY-APP:8080"));
    assert_eq!(inst.port.unwrap().value, 8080);
    assert!(!inst.secure_port.unwrap().enabled);
    assert_eq!(
        inst.metadata.as_ref().and_then(|m| m.get("zone")).map(String::as_str),
        Some("us-east-1a")
    );
}

#[tokio::test]
async fn get_by_vip_decodes_snapshot() {
    let body = r#"
        <applications>
          <versions__delta>1</versions__delta>
          <apps__hashcode>UP_1_</apps__hashcode>
          <application>
            <name>BILLING</name>
            <instance>
              <hostName>host-1</hostName>
              <app>BILLING</app>
              <ipAddr>10.0.0.1</ipAddr>
              <status>UP</status>
              <dataCenterInfo><name>MyOwn</name></dataCenterInfo>
            </instance>
          </application>
        </applications>"#;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eureka/v2/vips/billing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let apps = client.get_by_vip("billing").await.unwrap();
    assert_eq!(apps.apps_hashcode.as_deref(), Some("UP_1_"));
    assert_eq!(apps.applications[0].name, "BILLING");
}

#[tokio::test]
async fn malformed_xml_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eureka/v2/apps"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<applications><broken"))
        .mount(&server)
        .await;

    let registry = RegistryClient::new([server.uri()]).unwrap();
    let err = registry.get_all_applications().await.unwrap_err();
    assert!(matches!(err, EurekaError::Decode { .. }));
}

#[tokio::test]
async fn set_status_sends_override_value() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}/status")))
        .and(query_param("value", "OUT_OF_SERVICE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.set_status(InstanceStatus::OutOfService).await.unwrap();
}

#[tokio::test]
async fn clear_status_override_sends_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}/status")))
        .and(query_param("value", "UP"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.clear_status_override(InstanceStatus::Up).await.unwrap();
}

#[tokio::test]
async fn update_metadata_percent_encodes_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/eureka/v2/apps/{APP}/{INSTANCE_ID}/metadata")))
        .and(query_param("zone", "us east/1a"))
        .and(query_param("weight", "10"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let metadata = BTreeMap::from([
        ("zone".to_string(), "us east/1a".to_string()),
        ("weight".to_string(), "10".to_string()),
    ]);
    client.update_metadata(&metadata).await.unwrap();
}

#[tokio::test]
async fn update_metadata_rejects_empty_map_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.update_metadata(&BTreeMap::new()).await.unwrap_err();
    assert!(matches!(err, EurekaError::InvalidArgument(_)));
}

#[tokio::test]
async fn construction_rejects_empty_url_list() {
    let err = EurekaClient::new(Vec::<String>::new(), APP, HOST, PORT).unwrap_err();
    assert!(matches!(err, EurekaError::Configuration(_)));
}
