//! Queue command handlers.

use serde::Serialize;
use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{GetMessagesParams, Message, MessageEncoding, Queue, QueueParams};

use crate::cli::{GlobalOpts, OutputFormat, QueuesArgs, QueuesCommand};
use crate::error::CliError;
use crate::output::{self, bytes, opt};

use super::{bindings, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "VHost")]
    vhost: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    queue_type: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Ready")]
    ready: String,
    #[tabled(rename = "Unacked")]
    unacked: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Consumers")]
    consumers: String,
}

impl From<&Queue> for QueueRow {
    fn from(q: &Queue) -> Self {
        Self {
            vhost: q.vhost.clone(),
            name: q.name.clone(),
            queue_type: q.queue_type.clone().unwrap_or_else(|| "classic".into()),
            state: opt(q.state.as_deref()),
            ready: opt(q.messages_ready),
            unacked: opt(q.messages_unacknowledged),
            total: opt(q.messages),
            consumers: opt(q.consumers),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct DepthRow {
    #[tabled(rename = "Queue")]
    queue: String,
    #[tabled(rename = "Messages")]
    messages: u64,
}

#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Routing Key")]
    routing_key: String,
    #[tabled(rename = "Redelivered")]
    redelivered: &'static str,
    #[tabled(rename = "Bytes")]
    bytes: u64,
    #[tabled(rename = "Payload")]
    payload: String,
}

fn detail(q: &Queue) -> String {
    let mut lines = vec![
        format!("Name:        {}", q.name),
        format!("VHost:       {}", q.vhost),
        format!("Type:        {}", q.queue_type.as_deref().unwrap_or("classic")),
        format!("State:       {}", q.state.as_deref().unwrap_or("-")),
        format!("Node:        {}", q.node.as_deref().unwrap_or("-")),
        format!("Durable:     {}", output::yes_no(q.durable)),
        format!("Auto delete: {}", output::yes_no(q.auto_delete)),
        format!("Exclusive:   {}", opt(q.exclusive)),
        format!("Messages:    {}", opt(q.messages)),
        format!("  ready:     {}", opt(q.messages_ready)),
        format!("  unacked:   {}", opt(q.messages_unacknowledged)),
        format!("Consumers:   {}", opt(q.consumers)),
        format!("Memory:      {}", bytes(q.memory)),
    ];
    if !q.arguments.is_empty() {
        lines.push(format!(
            "Arguments:   {}",
            serde_json::Value::Object(q.arguments.clone())
        ));
    }
    lines.join("\n")
}

impl From<&Message> for MessageRow {
    fn from(m: &Message) -> Self {
        Self {
            exchange: m.exchange.clone(),
            routing_key: m.routing_key.clone(),
            redelivered: output::yes_no(m.redelivered),
            bytes: m.payload_bytes,
            payload: m.payload.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: QueuesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        QueuesCommand::List(filter) => {
            let queues = client.queues(filter.vhost.as_deref()).await?;
            let out = output::render_list(
                &global.output,
                &queues,
                |q| QueueRow::from(q),
                |q| q.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueuesCommand::Get { name, vhost } => {
            let queue = client
                .queue(&vhost.vhost, &name)
                .await
                .map_err(|e| util::or_not_found(e, "queue", &name, "queues list"))?;
            let out = output::render_single(&global.output, &queue, detail, |q| q.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueuesCommand::Create {
            name,
            vhost,
            durable,
            auto_delete,
            node,
            arguments,
        } => {
            let params = QueueParams {
                durable,
                auto_delete,
                arguments: util::parse_key_values("argument", &arguments)?,
                node,
            };
            client.create_queue(&vhost.vhost, &name, &params).await?;
            output::notice(
                &format!("Queue '{name}' declared on '{}'", vhost.vhost),
                global.quiet,
            );
            Ok(())
        }

        QueuesCommand::Delete { name, vhost } => {
            if !util::confirm(
                &format!("Delete queue '{name}' and all its messages?"),
                global.yes,
            )? {
                return Ok(());
            }
            client
                .delete_queue(&vhost.vhost, &name)
                .await
                .map_err(|e| util::or_not_found(e, "queue", &name, "queues list"))?;
            output::notice(&format!("Queue '{name}' deleted"), global.quiet);
            Ok(())
        }

        QueuesCommand::Purge { names, vhost } => {
            if !util::confirm(
                &format!("Purge all ready messages from {}?", names.join(", ")),
                global.yes,
            )? {
                return Ok(());
            }
            let pairs: Vec<(&str, &str)> = names
                .iter()
                .map(|name| (vhost.vhost.as_str(), name.as_str()))
                .collect();
            client.purge_queues(&pairs).await?;
            output::notice(&format!("Purged {} queue(s)", names.len()), global.quiet);
            Ok(())
        }

        QueuesCommand::Depth { names, vhost } => {
            let rows: Vec<DepthRow> = if names.is_empty() {
                client
                    .queue_depths(Some(vhost.vhost.as_str()))
                    .await?
                    .into_iter()
                    .map(|(queue, messages)| DepthRow { queue, messages })
                    .collect()
            } else {
                let mut rows = Vec::with_capacity(names.len());
                for name in names {
                    let messages = client
                        .queue_depth(&vhost.vhost, &name)
                        .await
                        .map_err(|e| util::or_not_found(e, "queue", &name, "queues list"))?;
                    rows.push(DepthRow {
                        queue: name,
                        messages,
                    });
                }
                rows
            };
            let out = output::render_list(
                &global.output,
                &rows,
                DepthRow::clone,
                |r| format!("{}\t{}", r.queue, r.messages),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueuesCommand::GetMessages {
            name,
            vhost,
            count,
            requeue,
            base64,
            truncate,
        } => {
            if !requeue
                && !util::confirm(
                    &format!("Take up to {count} message(s) off '{name}' without requeueing?"),
                    global.yes,
                )?
            {
                return Ok(());
            }
            let params = GetMessagesParams {
                count,
                requeue,
                encoding: if base64 {
                    MessageEncoding::Base64
                } else {
                    MessageEncoding::Auto
                },
                truncate,
            };
            let messages = client
                .get_messages(&vhost.vhost, &name, &params)
                .await
                .map_err(|e| util::or_not_found(e, "queue", &name, "queues list"))?;

            if messages.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::notice(&format!("Queue '{name}' is empty"), global.quiet);
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                &messages,
                |m| MessageRow::from(m),
                |m| m.payload.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        QueuesCommand::Bindings { name, vhost } => {
            let list = client
                .queue_bindings(&vhost.vhost, &name)
                .await
                .map_err(|e| util::or_not_found(e, "queue", &name, "queues list"))?;
            bindings::print_bindings(&global.output, &list, global.quiet)
        }
    }
}
