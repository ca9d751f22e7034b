//! Clap derive structures for the `hutch` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hutch -- RabbitMQ management from the command line
#[derive(Debug, Parser)]
#[command(
    name = "hutch",
    version,
    about = "Manage RabbitMQ brokers through the management HTTP API",
    long_about = "Inspect and administer RabbitMQ brokers over the management plugin's\n\
        HTTP API: vhosts, exchanges, queues, bindings, connections, users\n\
        and permissions.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Broker profile to use
    #[arg(long, short = 'p', env = "HUTCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Management API address, e.g. localhost:15672 (overrides profile)
    #[arg(long, short = 'u', env = "HUTCH_URL", global = true)]
    pub url: Option<String>,

    /// User name (overrides profile)
    #[arg(long, short = 'U', env = "HUTCH_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (prefer HUTCH_PASSWORD or the keyring)
    #[arg(long, global = true, hide = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HUTCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "HUTCH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 5]
    #[arg(long, env = "HUTCH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the broker overview
    Overview,

    /// Show the authenticated user and its tags
    Whoami,

    /// Run the aliveness test on a vhost (administrator only)
    Alive {
        /// Virtual host to test
        #[arg(default_value = "/")]
        vhost: String,
    },

    /// List cluster nodes, or show one
    Nodes {
        /// Node name, e.g. rabbit@host
        name: Option<String>,
    },

    /// Manage virtual hosts
    #[command(alias = "vh")]
    Vhosts(VhostsArgs),

    /// Manage exchanges
    #[command(alias = "ex")]
    Exchanges(ExchangesArgs),

    /// Manage queues
    #[command(alias = "q")]
    Queues(QueuesArgs),

    /// Manage bindings
    #[command(alias = "b")]
    Bindings(BindingsArgs),

    /// Inspect and close client connections
    #[command(alias = "conn")]
    Connections(ConnectionsArgs),

    /// Inspect channels
    Channels(ChannelsArgs),

    /// Manage users (administrator only)
    Users(UsersArgs),

    /// Manage user permissions (administrator only)
    #[command(alias = "perms")]
    Permissions(PermissionsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Virtual host of a single object.
#[derive(Debug, Args)]
pub struct VhostArg {
    /// Virtual host
    #[arg(long = "vhost", default_value = "/")]
    pub vhost: String,
}

/// Optional vhost filter for list commands.
#[derive(Debug, Args)]
pub struct VhostFilter {
    /// Only this virtual host (default: all)
    #[arg(long = "vhost")]
    pub vhost: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VHOSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VhostsArgs {
    #[command(subcommand)]
    pub command: VhostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VhostsCommand {
    /// List virtual hosts
    #[command(alias = "ls")]
    List,

    /// Show one virtual host
    Get { name: String },

    /// Create a virtual host
    Create { name: String },

    /// Delete a virtual host and everything in it
    #[command(alias = "rm")]
    Delete { name: String },

    /// List permissions granted on a virtual host (administrator only)
    Permissions { name: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EXCHANGES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ExchangesArgs {
    #[command(subcommand)]
    pub command: ExchangesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ExchangesCommand {
    /// List exchanges
    #[command(alias = "ls")]
    List(VhostFilter),

    /// Show one exchange
    Get {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Declare an exchange
    Create {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,

        /// Exchange type: direct, fanout, topic, headers, or a plugin type
        #[arg(long = "type", short = 't', default_value = "direct")]
        kind: String,

        /// Do not survive a broker restart
        #[arg(long)]
        transient: bool,

        /// Delete when the last binding is removed
        #[arg(long)]
        auto_delete: bool,

        /// Only reachable from other exchanges
        #[arg(long)]
        internal: bool,

        /// Extra argument as key=value (value parsed as JSON when possible)
        #[arg(long = "argument", short = 'a', value_name = "KEY=VALUE")]
        arguments: Vec<String>,
    },

    /// Delete an exchange
    #[command(alias = "rm")]
    Delete {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Publish one message through an exchange
    Publish {
        /// Exchange name ("amq.default" for the default exchange)
        exchange: String,

        /// Message body
        payload: String,

        #[command(flatten)]
        vhost: VhostArg,

        /// Routing key
        #[arg(long, short = 'r', default_value = "")]
        routing_key: String,

        /// The payload is base64-encoded
        #[arg(long)]
        base64: bool,

        /// Message property as key=value (e.g. content_type=text/plain)
        #[arg(long = "property", value_name = "KEY=VALUE")]
        properties: Vec<String>,
    },

    /// List bindings where the exchange is the source (or destination)
    Bindings {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,

        /// Show bindings with this exchange as destination instead
        #[arg(long)]
        destination: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUEUES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct QueuesArgs {
    #[command(subcommand)]
    pub command: QueuesCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueuesCommand {
    /// List queues
    #[command(alias = "ls")]
    List(VhostFilter),

    /// Show one queue
    Get {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Declare a queue
    Create {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,

        /// Survive a broker restart (broker default when omitted)
        #[arg(long)]
        durable: Option<bool>,

        /// Delete when the last consumer goes away
        #[arg(long)]
        auto_delete: Option<bool>,

        /// Node to place the queue on
        #[arg(long)]
        node: Option<String>,

        /// Extra argument as key=value (e.g. x-queue-type=quorum)
        #[arg(long = "argument", short = 'a', value_name = "KEY=VALUE")]
        arguments: Vec<String>,
    },

    /// Delete a queue and its messages
    #[command(alias = "rm")]
    Delete {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Drop all ready messages from one or more queues
    Purge {
        #[arg(required = true)]
        names: Vec<String>,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Show message counts (all queues in the vhost when none named)
    Depth {
        names: Vec<String>,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Take messages off a queue
    GetMessages {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,

        /// How many messages to take
        #[arg(long, short = 'n', default_value = "1")]
        count: u32,

        /// Put the messages back (marked redelivered)
        #[arg(long)]
        requeue: bool,

        /// Always return payloads base64-encoded
        #[arg(long)]
        base64: bool,

        /// Truncate payloads longer than this many bytes
        #[arg(long)]
        truncate: Option<u64>,
    },

    /// List bindings on a queue
    Bindings {
        name: String,
        #[command(flatten)]
        vhost: VhostArg,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BINDINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BindingsArgs {
    #[command(subcommand)]
    pub command: BindingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BindingsCommand {
    /// List bindings
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        vhost: VhostFilter,

        /// Only bindings from this exchange (requires --queue)
        #[arg(long, requires = "queue")]
        exchange: Option<String>,

        /// Only bindings to this queue (requires --exchange)
        #[arg(long, requires = "exchange")]
        queue: Option<String>,
    },

    /// Bind a queue (or exchange) to an exchange
    Create {
        /// Source exchange
        exchange: String,
        /// Destination queue, or exchange with --to-exchange
        destination: String,
        #[command(flatten)]
        vhost: VhostArg,

        #[arg(long, short = 'r', default_value = "")]
        routing_key: String,

        /// The destination is an exchange
        #[arg(long)]
        to_exchange: bool,

        #[arg(long = "argument", short = 'a', value_name = "KEY=VALUE")]
        arguments: Vec<String>,
    },

    /// Remove a binding without arguments
    #[command(alias = "rm")]
    Delete {
        exchange: String,
        destination: String,
        #[command(flatten)]
        vhost: VhostArg,

        #[arg(long, short = 'r', default_value = "")]
        routing_key: String,

        #[arg(long)]
        to_exchange: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONNECTIONS / CHANNELS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConnectionsArgs {
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List client connections
    #[command(alias = "ls")]
    List,

    /// Show one connection
    Get { name: String },

    /// Force-close a connection
    Close {
        name: String,

        /// Reason sent to the client
        #[arg(long)]
        reason: Option<String>,
    },

    /// List the channels of a connection
    Channels { name: String },
}

#[derive(Debug, Args)]
pub struct ChannelsArgs {
    #[command(subcommand)]
    pub command: ChannelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChannelsCommand {
    /// List channels
    #[command(alias = "ls")]
    List,

    /// Show one channel
    Get { name: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS / PERMISSIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List,

    /// Show one user
    Get { name: String },

    /// Create a user (or replace its password and tags)
    Create {
        name: String,

        /// Password for the new user (prompted when omitted)
        #[arg(long = "user-password")]
        user_password: Option<String>,

        /// Comma-separated tags, e.g. administrator or management,monitoring
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete { name: String },

    /// List a user's permissions across vhosts
    Permissions { name: String },
}

#[derive(Debug, Args)]
pub struct PermissionsArgs {
    #[command(subcommand)]
    pub command: PermissionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PermissionsCommand {
    /// List all permissions
    #[command(alias = "ls")]
    List,

    /// Show a user's permissions on a vhost
    Get {
        user: String,
        #[command(flatten)]
        vhost: VhostArg,
    },

    /// Grant a user permissions on a vhost
    Set {
        user: String,
        #[command(flatten)]
        vhost: VhostArg,

        /// Configure regex
        #[arg(long, default_value = ".*")]
        configure: String,

        /// Write regex
        #[arg(long, default_value = ".*")]
        write: String,

        /// Read regex
        #[arg(long, default_value = ".*")]
        read: String,
    },

    /// Revoke a user's permissions on a vhost
    #[command(alias = "rm")]
    Delete {
        user: String,
        #[command(flatten)]
        vhost: VhostArg,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Print the config file location
    Path,

    /// Display the current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// One of: url, username, password_env, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
