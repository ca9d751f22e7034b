#![allow(clippy::unwrap_used)]
// Integration tests for `Client` against a wiremock broker.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hutch_api::models::{
    BindingParams, ExchangeParams, ExchangeType, GetMessagesParams, PermissionParams,
    PublishParams, QueueParams, Tags, UserParams,
};
use hutch_api::{Client, ClientConfig, Credentials, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let client = Client::new(&ClientConfig::new(
        server.uri(),
        Credentials::new("guest", "guest"),
    ))
    .unwrap();
    (server, client)
}

async fn mount_whoami(server: &MockServer, tags: &str) {
    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "guest",
            "tags": tags,
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_carry_basic_auth() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .and(basic_auth("guest", "guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "management_version": "3.13.0",
            "rabbitmq_version": "3.13.0",
            "cluster_name": "rabbit@localhost",
            "object_totals": { "queues": 3, "exchanges": 8 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let overview = client.overview().await.unwrap();
    assert_eq!(overview.rabbitmq_version.as_deref(), Some("3.13.0"));
    assert_eq!(overview.object_totals.unwrap().queues, 3);
}

#[tokio::test]
async fn test_default_vhost_is_escaped_in_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queues/%2F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "jobs", "vhost": "/", "durable": true, "messages": 4 },
            { "name": "mail", "vhost": "/", "durable": false }
        ])))
        .mount(&server)
        .await;

    let queues = client.queues(Some("/")).await.unwrap();
    assert_eq!(queues.len(), 2);
    assert_eq!(queues[0].name, "jobs");
    assert_eq!(queues[0].messages, Some(4));
    assert_eq!(queues[1].messages, None);
}

#[tokio::test]
async fn test_empty_list_reply_is_empty_vec() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/exchanges"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let exchanges = client.exchanges(None).await.unwrap();
    assert!(exchanges.is_empty());
}

#[tokio::test]
async fn test_empty_single_record_reply_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/rabbit%40localhost"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client.node("rabbit@localhost").await;
    assert!(
        matches!(result, Err(Error::Api { .. })),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_status_carries_reason_and_path() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/queues/%2F/jobs/contents"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "internal", "reason": "boom" })),
        )
        .mount(&server)
        .await;

    let err = client.purge_queue("/", "jobs").await.unwrap_err();
    match &err {
        Error::Http {
            status,
            detail,
            path,
            ..
        } => {
            assert_eq!(*status, 500);
            assert_eq!(detail.as_deref(), Some("boom"));
            assert_eq!(path, "queues/%2F/jobs/contents");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
    assert!(err.to_string().starts_with("500 - Internal Server Error (boom)"));
}

#[tokio::test]
async fn test_not_found_is_http_404() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/exchanges/%2F/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": "Object Not Found", "reason": "Not Found" })),
        )
        .mount(&server)
        .await;

    let err = client.exchange("/", "missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;
    let mut config = ClientConfig::new(server.uri(), Credentials::new("guest", "guest"));
    config.transport = TransportConfig {
        timeout: Duration::from_millis(100),
        ..TransportConfig::default()
    };
    let client = Client::new(&config).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.overview().await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unreachable_broker_is_network_error() {
    let client = Client::new(&ClientConfig::new(
        "http://127.0.0.1:1",
        Credentials::new("guest", "guest"),
    ))
    .unwrap();

    let err = client.overview().await.unwrap_err();
    assert!(err.is_network(), "expected network error, got: {err:?}");
}

// ── Admin gate ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_lookup_happens_once() {
    let (server, client) = setup().await;
    mount_whoami(&server, "administrator").await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "guest", "tags": "administrator", "password_hash": "x" }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    assert_eq!(client.cached_admin_rights(), None);
    let users = client.users().await.unwrap();
    assert_eq!(users[0].name, "guest");
    client.users().await.unwrap();
    assert!(client.has_admin_rights().await.unwrap());
    assert_eq!(client.cached_admin_rights(), Some(true));
}

#[tokio::test]
async fn test_non_admin_is_refused_before_request() {
    let (server, client) = setup().await;
    mount_whoami(&server, "management,monitoring").await;

    Mock::given(method("GET"))
        .and(path("/api/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.permissions().await.unwrap_err();
    match &err {
        Error::Permission { user, operation } => {
            assert_eq!(user, "guest");
            assert_eq!(operation, "permissions");
        }
        other => panic!("expected Permission error, got: {other:?}"),
    }
    assert!(err.is_permission());

    // Cached: a second refusal does not ask whoami again.
    assert!(client.delete_user("bob").await.unwrap_err().is_permission());
}

#[tokio::test]
async fn test_users_401_becomes_api_error() {
    let (server, client) = setup().await;
    mount_whoami(&server, "administrator").await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.users().await.unwrap_err();
    assert!(
        matches!(&err, Error::Api { message, .. } if message.contains("not an administrator")),
        "expected Api error, got: {err:?}"
    );
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_is_alive_reports_ok() {
    let (server, client) = setup().await;
    mount_whoami(&server, "administrator").await;

    Mock::given(method("GET"))
        .and(path("/api/aliveness-test/%2F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    assert!(client.is_alive("/").await.unwrap());
}

#[tokio::test]
async fn test_is_alive_missing_vhost() {
    let (server, client) = setup().await;
    mount_whoami(&server, "administrator").await;

    Mock::given(method("GET"))
        .and(path("/api/aliveness-test/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.is_alive("nope").await.unwrap_err();
    assert!(
        matches!(&err, Error::Api { message, .. } if message == "No vhost named 'nope'"),
        "expected Api error, got: {err:?}"
    );
}

// ── VHosts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_vhost_create_list_delete() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/vhosts/staging"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    // First listing sees the new vhost; later ones fall through to the
    // post-delete reply mounted below.
    Mock::given(method("GET"))
        .and(path("/api/vhosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "/", "tracing": false },
            { "name": "staging", "description": "pre-prod", "tags": ["qa"] }
        ])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vhosts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "name": "/", "tracing": false }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/vhosts/staging"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.create_vhost("staging").await.unwrap());
    assert_eq!(client.vhost_names().await.unwrap(), vec!["/", "staging"]);
    assert!(client.delete_vhost("staging").await.unwrap());
    assert_eq!(client.vhost_names().await.unwrap(), vec!["/"]);
}

#[tokio::test]
async fn test_delete_missing_vhost_keeps_http_status() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/vhosts/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": "Object Not Found", "reason": "Not Found" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.delete_vhost("ghost").await.unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 404, .. }),
        "expected Http 404, got: {err:?}"
    );
}

#[tokio::test]
async fn test_dot_names_never_reach_the_broker() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.delete_queue("/", "..").await.unwrap_err();
    assert!(
        matches!(err, Error::DotSegment { ref segment, .. } if segment == ".."),
        "expected DotSegment, got: {err:?}"
    );
    let err = client.delete_vhost(".").await.unwrap_err();
    assert!(matches!(err, Error::DotSegment { .. }), "got: {err:?}");
}

// ── Exchanges ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_exchange_sends_defaults() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/exchanges/%2F/events"))
        .and(body_json(json!({
            "type": "topic",
            "durable": true,
            "auto_delete": false,
            "internal": false
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let params = ExchangeParams::of_type(ExchangeType::Topic);
    assert!(client.create_exchange("/", "events", &params).await.unwrap());
}

#[tokio::test]
async fn test_publish_and_get_messages() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/exchanges/%2F/amq.default/publish"))
        .and(body_partial_json(json!({
            "routing_key": "jobs",
            "payload": "hello",
            "payload_encoding": "string"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "routed": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/queues/%2F/jobs/get"))
        .and(body_partial_json(json!({
            "count": 1,
            "requeue": false,
            "ackmode": "ack_requeue_false",
            "encoding": "auto"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "payload": "hello",
            "payload_bytes": 5,
            "payload_encoding": "string",
            "redelivered": false,
            "exchange": "",
            "routing_key": "jobs",
            "message_count": 0,
            "properties": []
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let routed = client
        .publish("/", "amq.default", &PublishParams::new("jobs", "hello"))
        .await
        .unwrap();
    assert!(routed);

    let messages = client
        .get_messages("/", "jobs", &GetMessagesParams::default())
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].payload, "hello");
    assert_eq!(messages[0].routing_key, "jobs");
}

// ── Queues ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_queue_with_no_options_sends_empty_object() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/queues/%2F/jobs"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    assert!(
        client
            .create_queue("/", "jobs", &QueueParams::default())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_queue_depth_reads_messages_field() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queues/%2F/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "jobs", "vhost": "/", "messages": 17, "messages_ready": 15
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/queues/%2F/idle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "idle", "vhost": "/"
        })))
        .mount(&server)
        .await;

    assert_eq!(client.queue_depth("/", "jobs").await.unwrap(), 17);
    assert_eq!(client.queue_depth("/", "idle").await.unwrap(), 0);
}

#[tokio::test]
async fn test_queue_depth_from_list_reply() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queues/%2F/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "other", "vhost": "/", "messages": 99 },
            { "name": "jobs", "vhost": "/", "messages": 3 }
        ])))
        .mount(&server)
        .await;

    assert_eq!(client.queue_depth("/", "jobs").await.unwrap(), 3);
}

#[tokio::test]
async fn test_queue_depth_list_reply_without_the_queue() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queues/%2F/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "other", "vhost": "/", "messages": 99 }
        ])))
        .mount(&server)
        .await;

    let err = client.queue_depth("/", "jobs").await.unwrap_err();
    assert!(
        matches!(err, Error::Api { ref message, .. } if message.contains("empty response")),
        "expected Api error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_queue_depths_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/queues/prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "a", "vhost": "prod", "messages": 2 },
            { "name": "b", "vhost": "prod" }
        ])))
        .mount(&server)
        .await;

    let depths = client.queue_depths(Some("prod")).await.unwrap();
    assert_eq!(depths.get("a"), Some(&2));
    assert_eq!(depths.get("b"), Some(&0));
}

#[tokio::test]
async fn test_purge_queues_hits_each_queue() {
    let (server, client) = setup().await;

    for name in ["a", "b"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/queues/%2F/{name}/contents")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert!(client.purge_queues(&[("/", "a"), ("/", "b")]).await.unwrap());
}

// ── Bindings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_binding_lifecycle() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/bindings/%2F/e/events/q/jobs"))
        .and(body_json(json!({ "routing_key": "job.*", "arguments": {} })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/bindings/%2F/e/events/q/jobs/job.%2A"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/bindings/%2F/e/events/q/jobs/~"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let params = BindingParams::with_routing_key("job.*");
    assert!(client.create_binding("/", "events", "jobs", &params).await.unwrap());
    assert!(client.delete_binding("/", "events", "jobs", "job.*").await.unwrap());
    assert!(client.delete_binding("/", "events", "jobs", "").await.unwrap());
}

// ── Connections ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_close_connection_sends_reason() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/connections/127.0.0.1%3A5000%20-%3E%20127.0.0.1%3A5672"))
        .and(header("X-Reason", "maintenance"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let closed = client
        .delete_connection("127.0.0.1:5000 -> 127.0.0.1:5672", Some("maintenance"))
        .await
        .unwrap();
    assert!(closed);
}

// ── Users / permissions ─────────────────────────────────────────────

#[tokio::test]
async fn test_create_user_and_grant() {
    let (server, client) = setup().await;
    mount_whoami(&server, "administrator").await;

    Mock::given(method("PUT"))
        .and(path("/api/users/bob"))
        .and(body_json(json!({ "password": "s3cret", "tags": "management" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/permissions/%2F/bob"))
        .and(body_json(json!({ "configure": ".*", "write": ".*", "read": ".*" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let params = UserParams {
        password: "s3cret".to_string().into(),
        tags: Tags::parse("management"),
    };
    assert!(client.create_user("bob", &params).await.unwrap());
    assert!(
        client
            .set_permission("/", "bob", &PermissionParams::full())
            .await
            .unwrap()
    );
}
