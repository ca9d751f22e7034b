// Management API record types
//
// Response records model the fields callers commonly need; everything else
// the broker sends lands in `extra`. Fields use `#[serde(default)]` liberally
// because the set of reported fields depends on broker version, enabled
// plugins, and the privileges of the authenticated user.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Free-form `x-*` arguments attached to exchanges, queues and bindings.
pub type Arguments = Map<String, Value>;

/// Older brokers report empty argument tables as `[]` instead of `{}`.
fn map_or_empty_list<'de, D>(deserializer: D) -> Result<Arguments, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Array(items)) if items.is_empty() => Ok(Map::new()),
        None | Some(Value::Null) => Ok(Map::new()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected an argument table, got {other}"
        ))),
    }
}

// ── Tags ─────────────────────────────────────────────────────────────

/// Role tags of a user (or a vhost).
///
/// The broker reports them either as a comma-separated string
/// (`"administrator,monitoring"`) or as a JSON array, depending on version.
/// Both forms are accepted; the comma-separated form is what gets sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    pub const ADMINISTRATOR: &'static str = "administrator";

    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            tags.into_iter()
                .map(|t| {
                    let t: String = t.into();
                    t.trim().to_owned()
                })
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Parse a comma-separated tag list.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_administrator(&self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            List(Vec<String>),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Joined(s)) => Self::parse(&s),
            Some(Raw::List(items)) => Self::new(items),
            None => Self::default(),
        })
    }
}

// ── Identity / system ────────────────────────────────────────────────

/// Identity of the authenticated user, from `GET /api/whoami`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Whoami {
    pub name: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub auth_backend: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Whoami {
    pub fn is_administrator(&self) -> bool {
        self.tags.is_administrator()
    }
}

/// Aggregate object counts in the overview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectTotals {
    #[serde(default)]
    pub connections: u64,
    #[serde(default)]
    pub channels: u64,
    #[serde(default)]
    pub exchanges: u64,
    #[serde(default)]
    pub queues: u64,
    #[serde(default)]
    pub consumers: u64,
}

/// Aggregate queue depths in the overview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueTotals {
    #[serde(default)]
    pub messages: u64,
    #[serde(default)]
    pub messages_ready: u64,
    #[serde(default)]
    pub messages_unacknowledged: u64,
}

/// Broker overview from `GET /api/overview`.
///
/// Admin credentials get node and listener details on top of the totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub management_version: Option<String>,
    #[serde(default)]
    pub rabbitmq_version: Option<String>,
    #[serde(default)]
    pub erlang_version: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub object_totals: Option<ObjectTotals>,
    #[serde(default)]
    pub queue_totals: Option<QueueTotals>,
    #[serde(default)]
    pub message_stats: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cluster node from `GET /api/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub mem_used: Option<u64>,
    #[serde(default)]
    pub mem_limit: Option<u64>,
    #[serde(default)]
    pub disk_free: Option<u64>,
    #[serde(default)]
    pub disk_free_limit: Option<u64>,
    #[serde(default)]
    pub fd_used: Option<u64>,
    #[serde(default)]
    pub fd_total: Option<u64>,
    #[serde(default)]
    pub uptime: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the aliveness test.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AlivenessStatus {
    pub status: String,
}

// ── VHost ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VHost {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub tracing: bool,
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Exchange ─────────────────────────────────────────────────────────

/// AMQP exchange type. Plugin-provided types are preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExchangeType {
    #[default]
    Direct,
    Fanout,
    Topic,
    Headers,
    Other(String),
}

impl ExchangeType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct => "direct",
            Self::Fanout => "fanout",
            Self::Topic => "topic",
            Self::Headers => "headers",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ExchangeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "direct" => Self::Direct,
            "fanout" => Self::Fanout,
            "topic" => Self::Topic,
            "headers" => Self::Headers,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ExchangeType {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<ExchangeType> for String {
    fn from(t: ExchangeType) -> Self {
        match t {
            ExchangeType::Other(s) => s,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ExchangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub name: String,
    pub vhost: String,
    #[serde(rename = "type")]
    pub kind: ExchangeType,
    #[serde(default)]
    pub durable: bool,
    #[serde(default)]
    pub auto_delete: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub arguments: Arguments,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /api/exchanges/{vhost}/{name}`.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeParams {
    #[serde(rename = "type")]
    pub kind: ExchangeType,
    pub durable: bool,
    pub auto_delete: bool,
    pub internal: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub arguments: Arguments,
}

impl Default for ExchangeParams {
    fn default() -> Self {
        Self {
            kind: ExchangeType::Direct,
            durable: true,
            auto_delete: false,
            internal: false,
            arguments: Map::new(),
        }
    }
}

impl ExchangeParams {
    pub fn of_type(kind: impl Into<ExchangeType>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// Payload encoding used when publishing through the management API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    #[default]
    String,
    Base64,
}

/// Body of `POST /api/exchanges/{vhost}/{name}/publish`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishParams {
    pub routing_key: String,
    pub payload: String,
    pub payload_encoding: PayloadEncoding,
    pub properties: Map<String, Value>,
}

impl PublishParams {
    pub fn new(routing_key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            routing_key: routing_key.into(),
            payload: payload.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PublishOutcome {
    #[serde(default)]
    pub routed: bool,
}

// ── Queue ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    pub vhost: String,
    #[serde(default)]
    pub durable: bool,
    #[serde(default)]
    pub auto_delete: bool,
    #[serde(default)]
    pub exclusive: Option<bool>,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub arguments: Arguments,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "type")]
    pub queue_type: Option<String>,
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(default)]
    pub messages_ready: Option<u64>,
    #[serde(default)]
    pub messages_unacknowledged: Option<u64>,
    #[serde(default)]
    pub consumers: Option<u64>,
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /api/queues/{vhost}/{name}`. Every field is optional;
/// an empty object lets the broker apply its own defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_delete: Option<bool>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub arguments: Arguments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

/// How fetched message payloads should be returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageEncoding {
    #[default]
    Auto,
    Base64,
}

/// Options for `POST /api/queues/{vhost}/{name}/get`.
#[derive(Debug, Clone)]
pub struct GetMessagesParams {
    pub count: u32,
    pub requeue: bool,
    pub encoding: MessageEncoding,
    /// Payloads longer than this many bytes are truncated by the broker.
    pub truncate: Option<u64>,
}

impl Default for GetMessagesParams {
    fn default() -> Self {
        Self {
            count: 1,
            requeue: false,
            encoding: MessageEncoding::Auto,
            truncate: None,
        }
    }
}

/// Wire body for message fetching. `requeue` serves pre-3.7 brokers,
/// `ackmode` newer ones; both are sent.
#[derive(Debug, Serialize)]
pub(crate) struct GetMessagesBody {
    count: u32,
    requeue: bool,
    ackmode: &'static str,
    encoding: MessageEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncate: Option<u64>,
}

impl From<&GetMessagesParams> for GetMessagesBody {
    fn from(p: &GetMessagesParams) -> Self {
        Self {
            count: p.count,
            requeue: p.requeue,
            ackmode: if p.requeue {
                "ack_requeue_true"
            } else {
                "ack_requeue_false"
            },
            encoding: p.encoding,
            truncate: p.truncate,
        }
    }
}

/// A message fetched from a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub payload: String,
    #[serde(default)]
    pub payload_bytes: u64,
    #[serde(default)]
    pub payload_encoding: Option<String>,
    #[serde(default)]
    pub redelivered: bool,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub routing_key: String,
    /// Messages left in the queue after this one was taken.
    #[serde(default)]
    pub message_count: u64,
    #[serde(default)]
    pub properties: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Binding ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationType {
    Queue,
    Exchange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub source: String,
    pub vhost: String,
    pub destination: String,
    pub destination_type: DestinationType,
    #[serde(default)]
    pub routing_key: String,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub arguments: Arguments,
    #[serde(default)]
    pub properties_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /api/bindings/...`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BindingParams {
    pub routing_key: String,
    pub arguments: Arguments,
}

impl BindingParams {
    pub fn with_routing_key(routing_key: impl Into<String>) -> Self {
        Self {
            routing_key: routing_key.into(),
            arguments: Map::new(),
        }
    }
}

// ── Connection / Channel ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub name: String,
    #[serde(default)]
    pub vhost: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub channels: Option<u64>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub peer_host: Option<String>,
    #[serde(default)]
    pub peer_port: Option<u16>,
    #[serde(default)]
    pub ssl: Option<bool>,
    #[serde(default)]
    pub recv_oct: Option<u64>,
    #[serde(default)]
    pub send_oct: Option<u64>,
    #[serde(default)]
    pub connected_at: Option<u64>,
    #[serde(default)]
    pub client_properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub peer_host: Option<String>,
    #[serde(default)]
    pub peer_port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    #[serde(default)]
    pub vhost: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub consumer_count: Option<u64>,
    #[serde(default)]
    pub messages_unacknowledged: Option<u64>,
    #[serde(default)]
    pub prefetch_count: Option<u64>,
    #[serde(default)]
    pub connection_details: Option<ConnectionDetails>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── User / Permission ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub hashing_algorithm: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /api/users/{name}`. The password is write-only.
#[derive(Debug, Clone)]
pub struct UserParams {
    pub password: SecretString,
    pub tags: Tags,
}

impl Serialize for UserParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
            tags: &'a Tags,
        }

        Body {
            password: self.password.expose_secret(),
            tags: &self.tags,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub user: String,
    pub vhost: String,
    pub configure: String,
    pub write: String,
    pub read: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /api/permissions/{vhost}/{user}`. Each field is a regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionParams {
    pub configure: String,
    pub write: String,
    pub read: String,
}

impl PermissionParams {
    /// Full access: `.*` for configure, write and read.
    pub fn full() -> Self {
        Self {
            configure: ".*".into(),
            write: ".*".into(),
            read: ".*".into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn tags_from_comma_separated_string() {
        let w: Whoami = serde_json::from_value(json!({
            "name": "guest",
            "tags": "administrator, monitoring",
            "auth_backend": "rabbit_auth_backend_internal"
        }))
        .unwrap();
        assert!(w.is_administrator());
        assert!(w.tags.contains("monitoring"));
    }

    #[test]
    fn tags_from_array() {
        let w: Whoami = serde_json::from_value(json!({
            "name": "ops",
            "tags": ["monitoring", "administrator"]
        }))
        .unwrap();
        assert!(w.is_administrator());
    }

    #[test]
    fn administrator_must_match_a_whole_tag() {
        assert!(!Tags::parse("administrators").is_administrator());
        assert!(!Tags::parse("policymaker,monitoring").is_administrator());
        assert!(!Tags::parse("").is_administrator());
        assert!(Tags::parse("management,administrator").is_administrator());
    }

    #[test]
    fn missing_tags_are_empty() {
        let w: Whoami = serde_json::from_value(json!({ "name": "bob" })).unwrap();
        assert!(w.tags.is_empty());
        assert!(!w.is_administrator());
    }

    #[test]
    fn exchange_type_round_trips_plugin_types() {
        let ex: Exchange = serde_json::from_value(json!({
            "name": "delayed",
            "vhost": "/",
            "type": "x-delayed-message",
            "durable": true,
            "auto_delete": false,
            "internal": false,
            "arguments": []
        }))
        .unwrap();
        assert_eq!(ex.kind, ExchangeType::Other("x-delayed-message".into()));
        assert!(ex.arguments.is_empty());
        assert_eq!(
            serde_json::to_value(&ex.kind).unwrap(),
            json!("x-delayed-message")
        );
    }

    #[test]
    fn exchange_params_defaults() {
        let body = serde_json::to_value(ExchangeParams::of_type("topic")).unwrap();
        assert_eq!(
            body,
            json!({
                "type": "topic",
                "durable": true,
                "auto_delete": false,
                "internal": false
            })
        );
    }

    #[test]
    fn empty_queue_params_serialize_to_empty_object() {
        let body = serde_json::to_value(QueueParams::default()).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn get_messages_body_carries_both_ack_forms() {
        let body = serde_json::to_value(GetMessagesBody::from(&GetMessagesParams {
            requeue: true,
            truncate: Some(50_000),
            ..GetMessagesParams::default()
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "count": 1,
                "requeue": true,
                "ackmode": "ack_requeue_true",
                "encoding": "auto",
                "truncate": 50000
            })
        );
    }

    #[test]
    fn user_params_expose_password_only_on_the_wire() {
        let params = UserParams {
            password: SecretString::from("s3cret".to_owned()),
            tags: Tags::new(["administrator", "monitoring"]),
        };
        assert!(!format!("{params:?}").contains("s3cret"));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "password": "s3cret", "tags": "administrator,monitoring" })
        );
    }

    #[test]
    fn queue_record_keeps_unknown_fields() {
        let q: Queue = serde_json::from_value(json!({
            "name": "jobs",
            "vhost": "/",
            "durable": true,
            "auto_delete": false,
            "arguments": { "x-queue-type": "quorum" },
            "messages": 12,
            "leader": "rabbit@node1"
        }))
        .unwrap();
        assert_eq!(q.messages, Some(12));
        assert_eq!(q.extra.get("leader"), Some(&json!("rabbit@node1")));
    }

    #[test]
    fn binding_message_and_permission_keep_unknown_fields() {
        let b: Binding = serde_json::from_value(json!({
            "source": "work",
            "vhost": "/",
            "destination": "jobs",
            "destination_type": "queue",
            "routing_key": "",
            "arguments": {},
            "properties_key": "~",
            "sequence": 7
        }))
        .unwrap();
        assert_eq!(b.extra.get("sequence"), Some(&json!(7)));
        assert!(!b.extra.contains_key("routing_key"));

        let m: Message = serde_json::from_value(json!({
            "payload": "hello",
            "payload_bytes": 5,
            "redelivered": false,
            "exchange": "",
            "routing_key": "jobs",
            "message_count": 0,
            "properties": {},
            "trace_id": "abc"
        }))
        .unwrap();
        assert_eq!(m.extra.get("trace_id"), Some(&json!("abc")));

        let p: Permission = serde_json::from_value(json!({
            "user": "guest",
            "vhost": "/",
            "configure": ".*",
            "write": ".*",
            "read": ".*",
            "grantor": "admin"
        }))
        .unwrap();
        assert_eq!(p.read, ".*");
        assert_eq!(p.extra.get("grantor"), Some(&json!("admin")));
    }
}
