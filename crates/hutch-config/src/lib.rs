//! Shared configuration for the hutch CLI.
//!
//! TOML broker profiles, password resolution (env + keyring + plaintext),
//! and translation to `hutch_api::ClientConfig`. The CLI layers its flag
//! overrides on top of this.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hutch_api::{ClientConfig, Credentials, TlsMode, TransportConfig};

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "hutch";

/// Environment variable consulted for the password after `password_env`.
pub const PASSWORD_ENV: &str = "HUTCH_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named broker profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    5
}

/// A named broker profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Management address: `host:port` or a full URL.
    pub url: String,

    pub username: Option<String>,

    /// Plaintext password (prefer the keyring or `password_env`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// PEM file with an extra CA to trust.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "hutch", "hutch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hutch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config layered as: defaults, then `path`, then `HUTCH_*` variables.
///
/// Nested keys use a double underscore: `HUTCH_DEFAULTS__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HUTCH_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring entry name for a profile's password.
pub fn keyring_entry(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Resolve the password for a profile.
///
/// Order: the profile's `password_env` variable, `HUTCH_PASSWORD`, the
/// system keyring, then the plaintext `password` field.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |entry| {
            let entry = keyring::Entry::new(KEYRING_SERVICE, entry).ok()?;
            entry.get_password().ok()
        },
    )
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 2. HUTCH_PASSWORD
    if let Some(pw) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring(&keyring_entry(profile_name)) {
        debug!(profile = profile_name, "password found in keyring");
        return Ok(SecretString::from(pw));
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve username + password for a profile.
///
/// An explicit `password` skips the lookup chain of [`resolve_password`].
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    password: Option<SecretString>,
) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("HUTCH_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = match password {
        Some(pw) => pw,
        None => resolve_password(profile, profile_name)?,
    };
    Ok(Credentials { username, password })
}

/// Build the transport settings from a profile and the global defaults.
pub fn transport_for(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    }
}

/// Build a `ClientConfig` from a profile.
///
/// Callers apply their own overrides to `profile` first; `password`, when
/// given, wins over every configured source.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    password: Option<SecretString>,
) -> Result<ClientConfig, ConfigError> {
    if profile.url.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("profile '{profile_name}' has no broker URL"),
        });
    }

    Ok(ClientConfig {
        url: profile.url.clone(),
        credentials: resolve_credentials(profile, profile_name, password)?,
        transport: transport_for(profile, defaults),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "prod"

[defaults]
timeout = 12

[profiles.prod]
url = "https://rabbit.example.com"
username = "ops"
password_env = "PROD_RABBIT_PASSWORD"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
        assert_eq!(cfg.defaults.timeout, 12);
        assert_eq!(cfg.defaults.output, "table");
        let prod = &cfg.profiles["prod"];
        assert_eq!(prod.url, "https://rabbit.example.com");
        assert_eq!(prod.username.as_deref(), Some("ops"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 5);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("localhost:15672");
        profile.username = Some("guest".into());
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"].url, "localhost:15672");
        assert!(loaded.profiles["default"].password.is_none());
    }

    #[test]
    fn password_env_wins_over_everything() {
        let mut profile = Profile::new("localhost:15672");
        profile.password_env = Some("MY_PW".into());
        profile.password = Some("plain".into());

        let pw = resolve_password_with(
            &profile,
            "default",
            |name| match name {
                "MY_PW" => Some("from-profile-env".into()),
                PASSWORD_ENV => Some("from-hutch-env".into()),
                _ => None,
            },
            |_| Some("from-keyring".into()),
        )
        .unwrap();
        assert_eq!(pw.expose_secret(), "from-profile-env");
    }

    #[test]
    fn keyring_beats_plaintext() {
        let mut profile = Profile::new("localhost:15672");
        profile.password = Some("plain".into());

        let pw = resolve_password_with(&profile, "staging", no_env, |entry| {
            (entry == "staging/password").then(|| "from-keyring".into())
        })
        .unwrap();
        assert_eq!(pw.expose_secret(), "from-keyring");
    }

    #[test]
    fn plaintext_is_last_resort() {
        let mut profile = Profile::new("localhost:15672");
        profile.password = Some("plain".into());

        let pw = resolve_password_with(&profile, "default", no_env, |_| None).unwrap();
        assert_eq!(pw.expose_secret(), "plain");
    }

    #[test]
    fn no_password_anywhere_is_an_error() {
        let profile = Profile::new("localhost:15672");
        let err = resolve_password_with(&profile, "lab", no_env, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "lab"));
    }

    #[test]
    fn transport_prefers_insecure_over_ca() {
        let mut profile = Profile::new("https://rabbit");
        profile.ca_cert = Some("/etc/ca.pem".into());
        let defaults = Defaults::default();

        let t = transport_for(&profile, &defaults);
        assert_eq!(t.tls, TlsMode::CustomCa("/etc/ca.pem".into()));
        assert_eq!(t.timeout, Duration::from_secs(5));

        profile.insecure = Some(true);
        profile.timeout = Some(30);
        let t = transport_for(&profile, &defaults);
        assert_eq!(t.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(t.timeout, Duration::from_secs(30));
    }

    #[test]
    fn empty_url_is_rejected() {
        let profile = Profile::default();
        let err =
            profile_to_client_config(&profile, "default", &Defaults::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));
    }

    #[test]
    fn explicit_password_wins_over_profile() {
        let profile = Profile {
            username: Some("ops".into()),
            password: Some("from-file".into()),
            timeout: Some(9),
            ..Profile::new("rabbit.lab:15672")
        };
        let cfg = profile_to_client_config(
            &profile,
            "lab",
            &Defaults::default(),
            Some(SecretString::from("from-flag")),
        )
        .unwrap();
        assert_eq!(cfg.url, "rabbit.lab:15672");
        assert_eq!(cfg.credentials.username, "ops");
        assert_eq!(cfg.credentials.password.expose_secret(), "from-flag");
        assert_eq!(cfg.transport.timeout, Duration::from_secs(9));
    }
}
