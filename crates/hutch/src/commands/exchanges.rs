//! Exchange command handlers.

use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{Exchange, ExchangeParams, ExchangeType, PayloadEncoding, PublishParams};

use crate::cli::{ExchangesArgs, ExchangesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{bindings, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ExchangeRow {
    #[tabled(rename = "VHost")]
    vhost: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Durable")]
    durable: &'static str,
    #[tabled(rename = "Auto Delete")]
    auto_delete: &'static str,
    #[tabled(rename = "Internal")]
    internal: &'static str,
}

impl From<&Exchange> for ExchangeRow {
    fn from(e: &Exchange) -> Self {
        Self {
            vhost: e.vhost.clone(),
            name: display_name(&e.name),
            kind: e.kind.to_string(),
            durable: output::yes_no(e.durable),
            auto_delete: output::yes_no(e.auto_delete),
            internal: output::yes_no(e.internal),
        }
    }
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "(AMQP default)".into()
    } else {
        name.to_owned()
    }
}

fn detail(e: &Exchange) -> String {
    let mut lines = vec![
        format!("Name:        {}", display_name(&e.name)),
        format!("VHost:       {}", e.vhost),
        format!("Type:        {}", e.kind),
        format!("Durable:     {}", output::yes_no(e.durable)),
        format!("Auto delete: {}", output::yes_no(e.auto_delete)),
        format!("Internal:    {}", output::yes_no(e.internal)),
    ];
    if !e.arguments.is_empty() {
        lines.push(format!(
            "Arguments:   {}",
            serde_json::Value::Object(e.arguments.clone())
        ));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: ExchangesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ExchangesCommand::List(filter) => {
            let exchanges = client.exchanges(filter.vhost.as_deref()).await?;
            let out = output::render_list(
                &global.output,
                &exchanges,
                |e| ExchangeRow::from(e),
                |e| e.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExchangesCommand::Get { name, vhost } => {
            let exchange = client
                .exchange(&vhost.vhost, &name)
                .await
                .map_err(|e| util::or_not_found(e, "exchange", &name, "exchanges list"))?;
            let out = output::render_single(&global.output, &exchange, detail, |e| e.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExchangesCommand::Create {
            name,
            vhost,
            kind,
            transient,
            auto_delete,
            internal,
            arguments,
        } => {
            let params = ExchangeParams {
                kind: ExchangeType::from(kind.as_str()),
                durable: !transient,
                auto_delete,
                internal,
                arguments: util::parse_key_values("argument", &arguments)?,
            };
            client.create_exchange(&vhost.vhost, &name, &params).await?;
            output::notice(
                &format!("Exchange '{name}' ({}) declared on '{}'", params.kind, vhost.vhost),
                global.quiet,
            );
            Ok(())
        }

        ExchangesCommand::Delete { name, vhost } => {
            if !util::confirm(&format!("Delete exchange '{name}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_exchange(&vhost.vhost, &name)
                .await
                .map_err(|e| util::or_not_found(e, "exchange", &name, "exchanges list"))?;
            output::notice(&format!("Exchange '{name}' deleted"), global.quiet);
            Ok(())
        }

        ExchangesCommand::Publish {
            exchange,
            payload,
            vhost,
            routing_key,
            base64,
            properties,
        } => {
            let params = PublishParams {
                routing_key,
                payload,
                payload_encoding: if base64 {
                    PayloadEncoding::Base64
                } else {
                    PayloadEncoding::String
                },
                properties: util::parse_key_values("property", &properties)?,
            };
            let routed = client
                .publish(&vhost.vhost, &exchange, &params)
                .await
                .map_err(|e| util::or_not_found(e, "exchange", &exchange, "exchanges list"))?;

            let status = serde_json::json!({ "routed": routed });
            let out = output::render_single(
                &global.output,
                &status,
                |_| if routed { "routed".into() } else { "not routed (no matching binding)".into() },
                |_| routed.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExchangesCommand::Bindings {
            name,
            vhost,
            destination,
        } => {
            let list = if destination {
                client
                    .exchange_bindings_as_destination(&vhost.vhost, &name)
                    .await
            } else {
                client.exchange_bindings_as_source(&vhost.vhost, &name).await
            }
            .map_err(|e| util::or_not_found(e, "exchange", &name, "exchanges list"))?;
            bindings::print_bindings(&global.output, &list, global.quiet)
        }
    }
}
