//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn store_in_keyring(profile_name: &str, secret: &str) -> Result<(), CliError> {
    let keyring_err = |e: keyring::Error| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to store password in keyring: {e}"),
    };
    let entry = keyring::Entry::new(
        hutch_config::KEYRING_SERVICE,
        &config::keyring_entry(profile_name),
    )
    .map_err(keyring_err)?;
    entry.set_password(secret).map_err(keyring_err)
}

/// Copy of the config with plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    cfg
}

fn show_detail(cfg: &Config) -> String {
    let mut lines = vec![
        format!("Default profile: {}", cfg.default_profile.as_deref().unwrap_or("-")),
        format!("Output:          {}", cfg.defaults.output),
        format!("Timeout:         {}s", cfg.defaults.timeout),
        format!("Insecure:        {}", output::yes_no(cfg.defaults.insecure)),
    ];
    for (name, p) in &cfg.profiles {
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  url:          {}", p.url));
        lines.push(format!("  username:     {}", p.username.as_deref().unwrap_or("-")));
        if let Some(ref pw) = p.password {
            lines.push(format!("  password:     {pw}"));
        }
        if let Some(ref env) = p.password_env {
            lines.push(format!("  password_env: {env}"));
        }
        if let Some(ref ca) = p.ca_cert {
            lines.push(format!("  ca_cert:      {}", ca.display()));
        }
        if let Some(insecure) = p.insecure {
            lines.push(format!("  insecure:     {insecure}"));
        }
        if let Some(timeout) = p.timeout {
            lines.push(format!("  timeout:      {timeout}s"));
        }
    }
    lines.join("\n")
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("hutch configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let url: String = Input::new()
                .with_prompt("Management API address")
                .default("localhost:15672".into())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username")
                .default("guest".into())
                .interact_text()
                .map_err(prompt_err)?;

            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password_field = if store_selection == 0 {
                store_in_keyring(&profile_name, &password)?;
                eprintln!("   Password stored in system keyring");
                None
            } else {
                Some(password)
            };

            let profile = Profile {
                username: Some(username),
                password: password_field,
                ..Profile::new(url)
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: hutch overview");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, show_detail, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "url" => profile.url = value,
                "username" => profile.username = Some(value),
                "password_env" | "password-env" => profile.password_env = Some(value),
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = Some(parse_value("insecure", &value, "'true' or 'false'")?);
                }
                "timeout" => {
                    profile.timeout = Some(parse_value("timeout", &value, "a number (seconds)")?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: url, username, \
                             password_env, ca_cert, insecure, timeout"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            output::notice(&format!("Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: hutch config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::notice(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            store_in_keyring(&profile_name, &secret)?;
            output::notice(
                &format!("Password stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                username: Some("guest".into()),
                password: Some("hunter2".into()),
                ..Profile::new("localhost:15672")
            },
        );
        let text = show_detail(&redacted(&cfg));
        assert!(text.contains("[lab]"));
        assert!(text.contains("********"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn set_values_are_validated() {
        assert_eq!(parse_value::<u64>("timeout", "30", "a number").ok(), Some(30));
        assert!(parse_value::<bool>("insecure", "maybe", "'true' or 'false'").is_err());
    }
}
