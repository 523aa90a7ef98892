//! Configuration loading
//!
//! Settings resolve through four tiers, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable (`PULSE_BIND`, `PULSE_DATABASE`, `PULSE_ADMIN_TOKEN`)
//! 3. TOML config file (`~/.config/pulse/config.toml`)
//! 4. Compiled default

use std::path::PathBuf;

/// Default bind address for the pulse-server HTTP listener
pub const DEFAULT_BIND: &str = "127.0.0.1:5740";

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: String,
    /// Path to the SQLite database file
    pub database: PathBuf,
    /// Shared token for admin endpoints; empty disables the admin auth check
    pub admin_token: String,
}

impl ServerConfig {
    /// Resolve configuration from CLI arguments, environment, config file,
    /// and defaults, in that priority order.
    pub fn resolve(
        cli_bind: Option<&str>,
        cli_database: Option<&str>,
        cli_admin_token: Option<&str>,
    ) -> Self {
        let file = load_config_file();

        let bind = resolve_setting(cli_bind, "PULSE_BIND", file.as_ref(), "bind")
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let database = resolve_setting(cli_database, "PULSE_DATABASE", file.as_ref(), "database")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let admin_token =
            resolve_setting(cli_admin_token, "PULSE_ADMIN_TOKEN", file.as_ref(), "admin_token")
                .unwrap_or_default();

        Self {
            bind,
            database,
            admin_token,
        }
    }
}

fn resolve_setting(
    cli: Option<&str>,
    env_var: &str,
    file: Option<&toml::Value>,
    key: &str,
) -> Option<String> {
    // Priority 1: command-line argument
    if let Some(value) = cli {
        return Some(value.to_string());
    }

    // Priority 2: environment variable
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    // Priority 3: TOML config file
    if let Some(config) = file {
        if let Some(value) = config.get(key).and_then(|v| v.as_str()) {
            return Some(value.to_string());
        }
    }

    None
}

fn load_config_file() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("pulse").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Default database location: `<data_dir>/pulse/pulse.db`
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pulse")
        .join("pulse.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let config = ServerConfig::resolve(Some("0.0.0.0:9000"), Some("/tmp/x.db"), Some("t"));
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.database, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.admin_token, "t");
    }

    #[test]
    fn test_defaults_apply_when_nothing_set() {
        let config = ServerConfig::resolve(None, None, None);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert!(config.database.ends_with("pulse/pulse.db"));
    }
}
