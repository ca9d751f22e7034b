//! Permission command handlers.

use hutch_api::Client;
use hutch_api::models::{Permission, PermissionParams};

use crate::cli::{GlobalOpts, PermissionsArgs, PermissionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;
use super::vhosts::PermissionRow;

fn detail(p: &Permission) -> String {
    [
        format!("User:      {}", p.user),
        format!("VHost:     {}", p.vhost),
        format!("Configure: {}", p.configure),
        format!("Write:     {}", p.write),
        format!("Read:      {}", p.read),
    ]
    .join("\n")
}

pub async fn handle(
    client: &Client,
    args: PermissionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PermissionsCommand::List => {
            let perms = client.permissions().await?;
            let out = output::render_list(
                &global.output,
                &perms,
                |p| PermissionRow::from(p),
                |p| format!("{}@{}", p.user, p.vhost),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PermissionsCommand::Get { user, vhost } => {
            let identifier = format!("{user}@{}", vhost.vhost);
            let perm = client
                .permission(&vhost.vhost, &user)
                .await
                .map_err(|e| util::or_not_found(e, "permission", &identifier, "permissions list"))?;
            let out = output::render_single(&global.output, &perm, detail, |p| {
                format!("{}@{}", p.user, p.vhost)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PermissionsCommand::Set {
            user,
            vhost,
            configure,
            write,
            read,
        } => {
            let params = PermissionParams {
                configure,
                write,
                read,
            };
            client.set_permission(&vhost.vhost, &user, &params).await?;
            output::notice(
                &format!("Permissions for '{user}' on '{}' set", vhost.vhost),
                global.quiet,
            );
            Ok(())
        }

        PermissionsCommand::Delete { user, vhost } => {
            if !util::confirm(
                &format!("Revoke all permissions of '{user}' on '{}'?", vhost.vhost),
                global.yes,
            )? {
                return Ok(());
            }
            let identifier = format!("{user}@{}", vhost.vhost);
            client
                .delete_permission(&vhost.vhost, &user)
                .await
                .map_err(|e| util::or_not_found(e, "permission", &identifier, "permissions list"))?;
            output::notice(&format!("Permissions for {identifier} revoked"), global.quiet);
            Ok(())
        }
    }
}
