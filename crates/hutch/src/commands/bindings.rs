//! Binding command handlers.

use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{Binding, BindingParams, DestinationType};

use crate::cli::{BindingsArgs, BindingsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct BindingRow {
    #[tabled(rename = "VHost")]
    vhost: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Type")]
    destination_type: &'static str,
    #[tabled(rename = "Routing Key")]
    routing_key: String,
    #[tabled(rename = "Arguments")]
    arguments: String,
}

impl From<&Binding> for BindingRow {
    fn from(b: &Binding) -> Self {
        Self {
            vhost: b.vhost.clone(),
            // The default exchange has an empty name
            source: if b.source.is_empty() {
                "(default)".into()
            } else {
                b.source.clone()
            },
            destination: b.destination.clone(),
            destination_type: match b.destination_type {
                DestinationType::Queue => "queue",
                DestinationType::Exchange => "exchange",
            },
            routing_key: b.routing_key.clone(),
            arguments: if b.arguments.is_empty() {
                String::new()
            } else {
                serde_json::Value::Object(b.arguments.clone()).to_string()
            },
        }
    }
}

/// Identifier used by `--output plain`.
pub(super) fn binding_id(b: &Binding) -> String {
    format!("{} -> {} [{}]", b.source, b.destination, b.routing_key)
}

/// Render and print a binding list.
pub(super) fn print_bindings(
    format: &OutputFormat,
    bindings: &[Binding],
    quiet: bool,
) -> Result<(), CliError> {
    let out = output::render_list(format, bindings, |b| BindingRow::from(b), binding_id)?;
    output::print_output(&out, quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: BindingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        BindingsCommand::List {
            vhost,
            exchange,
            queue,
        } => {
            let bindings = match (exchange, queue) {
                (Some(exchange), Some(queue)) => {
                    let vhost = vhost.vhost.unwrap_or_else(|| "/".into());
                    client.bindings_between(&vhost, &exchange, &queue).await?
                }
                _ => client.bindings(vhost.vhost.as_deref()).await?,
            };
            print_bindings(&global.output, &bindings, global.quiet)
        }

        BindingsCommand::Create {
            exchange,
            destination,
            vhost,
            routing_key,
            to_exchange,
            arguments,
        } => {
            let params = BindingParams {
                routing_key,
                arguments: util::parse_key_values("argument", &arguments)?,
            };
            if to_exchange {
                client
                    .create_exchange_binding(&vhost.vhost, &exchange, &destination, &params)
                    .await?;
            } else {
                client
                    .create_binding(&vhost.vhost, &exchange, &destination, &params)
                    .await?;
            }
            output::notice(
                &format!("Bound '{destination}' to '{exchange}' with key '{}'", params.routing_key),
                global.quiet,
            );
            Ok(())
        }

        BindingsCommand::Delete {
            exchange,
            destination,
            vhost,
            routing_key,
            to_exchange,
        } => {
            if !util::confirm(
                &format!("Remove binding '{exchange}' -> '{destination}' ({routing_key})?"),
                global.yes,
            )? {
                return Ok(());
            }
            let identifier = format!("{exchange} -> {destination}");
            let result = if to_exchange {
                client
                    .delete_exchange_binding(&vhost.vhost, &exchange, &destination, &routing_key)
                    .await
            } else {
                client
                    .delete_binding(&vhost.vhost, &exchange, &destination, &routing_key)
                    .await
            };
            result.map_err(|e| util::or_not_found(e, "binding", &identifier, "bindings list"))?;
            output::notice(&format!("Binding {identifier} removed"), global.quiet);
            Ok(())
        }
    }
}
