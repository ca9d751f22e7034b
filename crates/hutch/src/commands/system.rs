//! Broker-level handlers: overview, whoami, aliveness, nodes.

use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{Node, Overview, Whoami};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, bytes, opt};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    node_type: String,
    #[tabled(rename = "Running")]
    running: &'static str,
    #[tabled(rename = "Memory")]
    mem_used: String,
    #[tabled(rename = "Disk Free")]
    disk_free: String,
    #[tabled(rename = "FDs")]
    fds: String,
}

impl From<&Node> for NodeRow {
    fn from(n: &Node) -> Self {
        Self {
            name: n.name.clone(),
            node_type: n.node_type.clone().unwrap_or_default(),
            running: output::yes_no(n.running),
            mem_used: bytes(n.mem_used),
            disk_free: bytes(n.disk_free),
            fds: match (n.fd_used, n.fd_total) {
                (Some(used), Some(total)) => format!("{used}/{total}"),
                _ => "-".into(),
            },
        }
    }
}

fn overview_detail(o: &Overview) -> String {
    let mut lines = vec![
        format!("Cluster:     {}", o.cluster_name.as_deref().unwrap_or("-")),
        format!("Node:        {}", o.node.as_deref().unwrap_or("-")),
        format!("RabbitMQ:    {}", o.rabbitmq_version.as_deref().unwrap_or("-")),
        format!("Erlang:      {}", o.erlang_version.as_deref().unwrap_or("-")),
        format!("Management:  {}", o.management_version.as_deref().unwrap_or("-")),
    ];
    if let Some(ref t) = o.object_totals {
        lines.push(format!("Connections: {}", t.connections));
        lines.push(format!("Channels:    {}", t.channels));
        lines.push(format!("Exchanges:   {}", t.exchanges));
        lines.push(format!("Queues:      {}", t.queues));
        lines.push(format!("Consumers:   {}", t.consumers));
    }
    if let Some(ref q) = o.queue_totals {
        lines.push(format!(
            "Messages:    {} ({} ready, {} unacked)",
            q.messages, q.messages_ready, q.messages_unacknowledged
        ));
    }
    lines.join("\n")
}

fn whoami_detail(w: &Whoami) -> String {
    [
        format!("User:    {}", w.name),
        format!("Tags:    {}", if w.tags.is_empty() { "-".into() } else { w.tags.to_string() }),
        format!("Admin:   {}", output::yes_no(w.is_administrator())),
        format!("Backend: {}", w.auth_backend.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

fn node_detail(n: &Node) -> String {
    [
        format!("Name:       {}", n.name),
        format!("Type:       {}", n.node_type.as_deref().unwrap_or("-")),
        format!("Running:    {}", output::yes_no(n.running)),
        format!("Memory:     {} / {}", bytes(n.mem_used), bytes(n.mem_limit)),
        format!("Disk free:  {} (limit {})", bytes(n.disk_free), bytes(n.disk_free_limit)),
        format!("FDs:        {} / {}", opt(n.fd_used), opt(n.fd_total)),
        format!("Uptime:     {}", n.uptime.map_or_else(|| "-".into(), |ms| format!("{}s", ms / 1000))),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn overview(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let overview = client.overview().await?;
    let out = output::render_single(&global.output, &overview, overview_detail, |o| {
        o.cluster_name.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn whoami(client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    let me = client.whoami().await?;
    let out = output::render_single(&global.output, &me, whoami_detail, |w| w.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn alive(client: &Client, vhost: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let ok = client.is_alive(vhost).await?;
    let status = serde_json::json!({ "vhost": vhost, "alive": ok });
    let out = output::render_single(
        &global.output,
        &status,
        |_| format!("{vhost}: {}", if ok { "alive" } else { "NOT alive" }),
        |_| ok.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    if ok {
        Ok(())
    } else {
        Err(CliError::Api(hutch_api::Error::Api {
            message: format!("aliveness test failed on vhost '{vhost}'"),
            source: None,
        }))
    }
}

pub async fn nodes(client: &Client, name: Option<&str>, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match name {
        Some(name) => {
            let node = client
                .node(name)
                .await
                .map_err(|e| util::or_not_found(e, "node", name, "nodes"))?;
            output::render_single(&global.output, &node, node_detail, |n| n.name.clone())?
        }
        None => {
            let nodes = client.nodes().await?;
            output::render_list(&global.output, &nodes, |n| NodeRow::from(n), |n| n.name.clone())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
