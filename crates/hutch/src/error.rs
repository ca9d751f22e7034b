//! CLI error types with miette diagnostics.
//!
//! Maps `hutch_api::Error` and `hutch_config::ConfigError` into user-facing
//! errors with actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use hutch_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the management API")]
    #[diagnostic(
        code(hutch::connection_failed),
        help(
            "Check that the broker is running and the management plugin is enabled\n\
             (rabbitmq-plugins enable rabbitmq_management), then verify --url."
        )
    )]
    ConnectionFailed {
        #[source]
        source: hutch_api::Error,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(hutch::tls_error),
        help("Use --insecure (-k) for self-signed brokers, or set ca_cert in your profile.")
    )]
    Tls { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(hutch::timeout),
        help("Increase the timeout with --timeout or check broker responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication / authorization ──────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(hutch::auth_failed),
        help(
            "Verify the user name and password.\n\
             Store a password with: hutch config set-password --profile <name>"
        )
    )]
    AuthFailed {
        #[source]
        source: hutch_api::Error,
    },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(hutch::no_credentials),
        help(
            "Set a username and password with: hutch config init\n\
             Or pass --username and set HUTCH_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("User '{user}' may not run '{operation}'")]
    #[diagnostic(
        code(hutch::permission_denied),
        help("This operation needs a user tagged 'administrator'.")
    )]
    PermissionDenied { user: String, operation: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(hutch::not_found),
        help("Run: hutch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(hutch::api_error))]
    Api(hutch_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hutch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hutch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hutch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No broker configured")]
    #[diagnostic(
        code(hutch::no_config),
        help(
            "Create a profile with: hutch config init\n\
             Expected at: {path}\n\
             Or pass --url and --username."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(hutch::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(hutch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(hutch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Api(err) => match err.status() {
                Some(404) => exit_code::NOT_FOUND,
                Some(401) => exit_code::AUTH,
                Some(403) => exit_code::PERMISSION,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }
}

// ── hutch_api::Error → CliError ──────────────────────────────────────

impl From<hutch_api::Error> for CliError {
    fn from(err: hutch_api::Error) -> Self {
        use hutch_api::Error as ApiError;

        match err {
            ApiError::Network(_) => Self::ConnectionFailed { source: err },
            ApiError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            ApiError::Tls(message) => Self::Tls { message },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            ApiError::DotSegment { segment, .. } => Self::Validation {
                field: "name".into(),
                reason: format!("'{segment}' cannot be addressed through the management API"),
            },
            ApiError::Permission { user, operation } => {
                Self::PermissionDenied { user, operation }
            }
            ApiError::Http { status: 401, .. } => Self::AuthFailed { source: err },
            other => Self::Api(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> hutch_api::Error {
        hutch_api::Error::Http {
            status,
            reason: String::new(),
            detail: None,
            path: "queues/%2F/jobs".into(),
            body: None,
        }
    }

    #[test]
    fn exit_codes_follow_status() {
        assert_eq!(CliError::from(http(401)).exit_code(), exit_code::AUTH);
        assert_eq!(CliError::from(http(403)).exit_code(), exit_code::PERMISSION);
        assert_eq!(CliError::from(http(404)).exit_code(), exit_code::NOT_FOUND);
        assert_eq!(CliError::from(http(500)).exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn gate_refusal_is_permission() {
        let err = CliError::from(hutch_api::Error::Permission {
            user: "guest".into(),
            operation: "users".into(),
        });
        assert_eq!(err.exit_code(), exit_code::PERMISSION);
        assert_eq!(err.to_string(), "User 'guest' may not run 'users'");
    }

    #[test]
    fn dot_names_are_usage_errors() {
        let err = CliError::from(hutch_api::Error::DotSegment {
            template: "queues/{}/{}",
            segment: "..".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn timeout_and_config_errors() {
        let err = CliError::from(hutch_api::Error::Timeout { timeout_secs: 5 });
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);

        let err = CliError::from(ConfigError::NoCredentials {
            profile: "lab".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
