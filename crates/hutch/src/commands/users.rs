//! User command handlers. Every call here needs an administrator.

use secrecy::SecretString;
use tabled::Tabled;

use hutch_api::Client;
use hutch_api::models::{Tags, User, UserParams};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;
use super::vhosts::PermissionRow;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Admin")]
    admin: &'static str,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            name: u.name.clone(),
            tags: u.tags.to_string(),
            admin: output::yes_no(u.tags.is_administrator()),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!("Name:      {}", u.name),
        format!("Tags:      {}", if u.tags.is_empty() { "-".into() } else { u.tags.to_string() }),
        format!("Hashing:   {}", u.hashing_algorithm.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

fn read_password(name: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(format!("Password for '{name}': "))?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = client.users().await?;
            let out = output::render_list(
                &global.output,
                &users,
                |u| UserRow::from(u),
                |u| u.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { name } => {
            let user = client
                .user(&name)
                .await
                .map_err(|e| util::or_not_found(e, "user", &name, "users list"))?;
            let out = output::render_single(&global.output, &user, detail, |u| u.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            name,
            user_password,
            tags,
        } => {
            let password = match user_password {
                Some(pw) => SecretString::from(pw),
                None => read_password(&name)?,
            };
            let params = UserParams {
                password,
                tags: Tags::parse(&tags),
            };
            client.create_user(&name, &params).await?;
            output::notice(&format!("User '{name}' saved"), global.quiet);
            Ok(())
        }

        UsersCommand::Delete { name } => {
            if !util::confirm(&format!("Delete user '{name}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_user(&name)
                .await
                .map_err(|e| util::or_not_found(e, "user", &name, "users list"))?;
            output::notice(&format!("User '{name}' deleted"), global.quiet);
            Ok(())
        }

        UsersCommand::Permissions { name } => {
            let perms = client
                .user_permissions(&name)
                .await
                .map_err(|e| util::or_not_found(e, "user", &name, "users list"))?;
            let out = output::render_list(
                &global.output,
                &perms,
                |p| PermissionRow::from(p),
                |p| p.vhost.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
