//! CLI configuration: thin wrapper around `hutch_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --username, --password, --insecure, --timeout).

use secrecy::SecretString;

use hutch_api::{ClientConfig, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hutch_config::{
    Config, Profile, config_path, keyring_entry, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-joined profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ClientConfig` from the config file, active profile and flags.
///
/// Flags take priority over profile values. Without a profile, `--url`
/// and `--username` must be given on the command line (or via env).
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None if global.url.is_none() => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        None => Profile::default(),
    };

    // Overrides (flag > env > profile)
    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let password = global.password.clone().map(SecretString::from);
    let client_config =
        hutch_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults, password)?;
    tracing::debug!(
        profile = %profile_name,
        url = %client_config.url,
        insecure = matches!(client_config.transport.tls, TlsMode::DangerAcceptInvalid),
        timeout_secs = client_config.transport.timeout.as_secs(),
        "resolved broker settings"
    );
    Ok(client_config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["hutch"];
        argv.extend_from_slice(args);
        argv.push("overview");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_the_active_profile() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                username: Some("ops".into()),
                password: Some("from-file".into()),
                ..Profile::new("rabbit.lab:15672")
            },
        );

        let resolved = resolve_client_config(
            &global(&["--url", "rabbit.prod:15672", "--password", "from-flag", "--timeout", "11"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(resolved.url, "rabbit.prod:15672");
        assert_eq!(resolved.credentials.username, "ops");
        assert_eq!(resolved.credentials.password.expose_secret(), "from-flag");
        assert_eq!(resolved.transport.timeout.as_secs(), 11);
    }

    #[test]
    fn url_flag_alone_needs_a_username() {
        let err = resolve_client_config(
            &global(&["--url", "localhost:15672", "--password", "pw"]),
            &Config::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { ref profile } if profile == "default"));
    }
}
