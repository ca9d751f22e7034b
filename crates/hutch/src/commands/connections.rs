//! Connection and channel command handlers.

use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{Channel, Connection};

use crate::cli::{ChannelsArgs, ChannelsCommand, ConnectionsArgs, ConnectionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, bytes, opt, timestamp_ms};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "VHost")]
    vhost: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Channels")]
    channels: String,
    #[tabled(rename = "Recv")]
    recv: String,
    #[tabled(rename = "Sent")]
    sent: String,
    #[tabled(rename = "Connected")]
    connected_at: String,
}

impl From<&Connection> for ConnectionRow {
    fn from(c: &Connection) -> Self {
        Self {
            name: c.name.clone(),
            user: opt(c.user.as_deref()),
            vhost: opt(c.vhost.as_deref()),
            state: opt(c.state.as_deref()),
            channels: opt(c.channels),
            recv: bytes(c.recv_oct),
            sent: bytes(c.send_oct),
            connected_at: timestamp_ms(c.connected_at),
        }
    }
}

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "VHost")]
    vhost: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Consumers")]
    consumers: String,
    #[tabled(rename = "Unacked")]
    unacked: String,
    #[tabled(rename = "Prefetch")]
    prefetch: String,
}

impl From<&Channel> for ChannelRow {
    fn from(c: &Channel) -> Self {
        Self {
            name: c.name.clone(),
            user: opt(c.user.as_deref()),
            vhost: opt(c.vhost.as_deref()),
            state: opt(c.state.as_deref()),
            consumers: opt(c.consumer_count),
            unacked: opt(c.messages_unacknowledged),
            prefetch: opt(c.prefetch_count),
        }
    }
}

fn connection_detail(c: &Connection) -> String {
    let peer = match (&c.peer_host, c.peer_port) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.clone(),
        _ => "-".into(),
    };
    let mut lines = vec![
        format!("Name:      {}", c.name),
        format!("User:      {}", opt(c.user.as_deref())),
        format!("VHost:     {}", opt(c.vhost.as_deref())),
        format!("Node:      {}", opt(c.node.as_deref())),
        format!("State:     {}", opt(c.state.as_deref())),
        format!("Protocol:  {}", opt(c.protocol.as_deref())),
        format!("Peer:      {peer}"),
        format!("TLS:       {}", opt(c.ssl)),
        format!("Channels:  {}", opt(c.channels)),
        format!("Received:  {}", bytes(c.recv_oct)),
        format!("Sent:      {}", bytes(c.send_oct)),
        format!("Connected: {}", timestamp_ms(c.connected_at)),
    ];
    if let Some(product) = c.client_properties.get("product").and_then(serde_json::Value::as_str) {
        lines.push(format!("Client:    {product}"));
    }
    lines.join("\n")
}

fn channel_detail(c: &Channel) -> String {
    let connection = c
        .connection_details
        .as_ref()
        .and_then(|d| d.name.as_deref())
        .unwrap_or("-");
    [
        format!("Name:       {}", c.name),
        format!("Connection: {connection}"),
        format!("Number:     {}", opt(c.number)),
        format!("User:       {}", opt(c.user.as_deref())),
        format!("VHost:      {}", opt(c.vhost.as_deref())),
        format!("Node:       {}", opt(c.node.as_deref())),
        format!("State:      {}", opt(c.state.as_deref())),
        format!("Consumers:  {}", opt(c.consumer_count)),
        format!("Unacked:    {}", opt(c.messages_unacknowledged)),
        format!("Prefetch:   {}", opt(c.prefetch_count)),
    ]
    .join("\n")
}

fn print_channels(channels: &[Channel], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        channels,
        |c| ChannelRow::from(c),
        |c| c.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: ConnectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConnectionsCommand::List => {
            let conns = client.connections().await?;
            let out = output::render_list(
                &global.output,
                &conns,
                |c| ConnectionRow::from(c),
                |c| c.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConnectionsCommand::Get { name } => {
            let conn = client
                .connection(&name)
                .await
                .map_err(|e| util::or_not_found(e, "connection", &name, "connections list"))?;
            let out =
                output::render_single(&global.output, &conn, connection_detail, |c| c.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConnectionsCommand::Close { name, reason } => {
            if !util::confirm(&format!("Close connection '{name}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_connection(&name, reason.as_deref())
                .await
                .map_err(|e| util::or_not_found(e, "connection", &name, "connections list"))?;
            output::notice(&format!("Connection '{name}' closed"), global.quiet);
            Ok(())
        }

        ConnectionsCommand::Channels { name } => {
            let channels = client
                .connection_channels(&name)
                .await
                .map_err(|e| util::or_not_found(e, "connection", &name, "connections list"))?;
            print_channels(&channels, global)
        }
    }
}

pub async fn handle_channels(
    client: &Client,
    args: ChannelsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ChannelsCommand::List => {
            let channels = client.channels().await?;
            print_channels(&channels, global)
        }

        ChannelsCommand::Get { name } => {
            let channel = client
                .channel(&name)
                .await
                .map_err(|e| util::or_not_found(e, "channel", &name, "channels list"))?;
            let out =
                output::render_single(&global.output, &channel, channel_detail, |c| c.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
