//! Command dispatch: bridges CLI args -> `hutch_api::Client` calls -> output.

pub mod bindings;
pub mod config_cmd;
pub mod connections;
pub mod exchanges;
pub mod permissions;
pub mod queues;
pub mod system;
pub mod users;
pub mod util;
pub mod vhosts;

use hutch_api::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a broker-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &Client, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Overview => system::overview(client, global).await,
        Command::Whoami => system::whoami(client, global).await,
        Command::Alive { vhost } => system::alive(client, &vhost, global).await,
        Command::Nodes { name } => system::nodes(client, name.as_deref(), global).await,
        Command::Vhosts(args) => vhosts::handle(client, args, global).await,
        Command::Exchanges(args) => exchanges::handle(client, args, global).await,
        Command::Queues(args) => queues::handle(client, args, global).await,
        Command::Bindings(args) => bindings::handle(client, args, global).await,
        Command::Connections(args) => connections::handle(client, args, global).await,
        Command::Channels(args) => connections::handle_channels(client, args, global).await,
        Command::Users(args) => users::handle(client, args, global).await,
        Command::Permissions(args) => permissions::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
