//! Virtual host command handlers.

use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{Permission, VHost};

use crate::cli::{GlobalOpts, VhostsArgs, VhostsCommand};
use crate::error::CliError;
use crate::output::{self, opt};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct VhostRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Messages")]
    messages: String,
    #[tabled(rename = "Tracing")]
    tracing: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&VHost> for VhostRow {
    fn from(v: &VHost) -> Self {
        Self {
            name: v.name.clone(),
            messages: opt(v.messages),
            tracing: output::yes_no(v.tracing),
            description: v.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub(super) struct PermissionRow {
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "VHost")]
    vhost: String,
    #[tabled(rename = "Configure")]
    configure: String,
    #[tabled(rename = "Write")]
    write: String,
    #[tabled(rename = "Read")]
    read: String,
}

impl From<&Permission> for PermissionRow {
    fn from(p: &Permission) -> Self {
        Self {
            user: p.user.clone(),
            vhost: p.vhost.clone(),
            configure: p.configure.clone(),
            write: p.write.clone(),
            read: p.read.clone(),
        }
    }
}

fn detail(v: &VHost) -> String {
    [
        format!("Name:        {}", v.name),
        format!("Description: {}", v.description.as_deref().unwrap_or("-")),
        format!("Tags:        {}", if v.tags.is_empty() { "-".into() } else { v.tags.to_string() }),
        format!("Tracing:     {}", output::yes_no(v.tracing)),
        format!("Messages:    {}", opt(v.messages)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: VhostsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VhostsCommand::List => {
            let vhosts = client.vhosts().await?;
            let out = output::render_list(
                &global.output,
                &vhosts,
                |v| VhostRow::from(v),
                |v| v.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VhostsCommand::Get { name } => {
            let vhost = client
                .vhost(&name)
                .await
                .map_err(|e| util::or_not_found(e, "vhost", &name, "vhosts list"))?;
            let out = output::render_single(&global.output, &vhost, detail, |v| v.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VhostsCommand::Create { name } => {
            client.create_vhost(&name).await?;
            output::notice(&format!("Virtual host '{name}' created"), global.quiet);
            Ok(())
        }

        VhostsCommand::Delete { name } => {
            if !util::confirm(
                &format!("Delete virtual host '{name}' with all its exchanges and queues?"),
                global.yes,
            )? {
                return Ok(());
            }
            client
                .delete_vhost(&name)
                .await
                .map_err(|e| util::or_not_found(e, "vhost", &name, "vhosts list"))?;
            output::notice(&format!("Virtual host '{name}' deleted"), global.quiet);
            Ok(())
        }

        VhostsCommand::Permissions { name } => {
            let perms = client.vhost_permissions(&name).await?;
            let out = output::render_list(
                &global.output,
                &perms,
                |p| PermissionRow::from(p),
                |p| p.user.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
