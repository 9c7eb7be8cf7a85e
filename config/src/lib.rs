//! Configuration for Nebula.
//!
//! Everything lives under `~/.nebula/`:
//!
//! ```text
//! ~/.nebula/config.toml    optional user configuration
//! ~/.nebula/known_users    identities that already saw the first-run greeting
//! ~/.nebula/logs/          tracing output
//! ```
//!
//! A missing config file is not an error; every section is optional and the
//! shell falls back to built-in defaults.

mod known_users;

pub use known_users::KnownIdentities;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT_PROBE_TIMEOUT_MS: u64 = 200;
pub const DEFAULT_ISSUE_USERNAME: &str = "Nebula Terminal Community Issues";

/// Parsed `config.toml`.
///
/// ```toml
/// [app]
/// start_dir = "~/projects"
///
/// [settings]
/// font_color = "cyan"
///
/// [commands]
/// timeout_seconds = 30
///
/// [issues]
/// webhook_url = "${NEBULA_ISSUE_WEBHOOK}"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct NebulaConfig {
    pub app: Option<AppConfig>,
    /// Overrides for the settings store defaults. Values are type-checked by
    /// the store when applied, not here.
    pub settings: Option<toml::Table>,
    pub commands: Option<CommandsConfig>,
    pub issues: Option<IssuesConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Initial working directory. `~` expands to the home directory.
    pub start_dir: Option<String>,
    /// Override for the known-identities file location.
    pub known_users_file: Option<String>,
}

/// External process limits.
#[derive(Debug, Default, Deserialize)]
pub struct CommandsConfig {
    pub timeout_seconds: Option<u64>,
    pub port_probe_timeout_ms: Option<u64>,
}

/// Issue webhook delivery.
#[derive(Debug, Default, Deserialize)]
pub struct IssuesConfig {
    /// Webhook endpoint. `${VAR}` references are expanded from the environment.
    pub webhook_url: Option<String>,
    pub username: Option<String>,
}

impl NebulaConfig {
    /// Load `~/.nebula/config.toml`. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// `[settings]` entries as `(key, raw value)` pairs, sorted by key.
    ///
    /// Strings are passed through unquoted; other scalars use their TOML
    /// rendering (`14`, `0.5`, `true`). Arrays and tables are skipped with a
    /// warning since no setting holds them.
    #[must_use]
    pub fn setting_overrides(&self) -> Vec<(String, String)> {
        let Some(table) = &self.settings else {
            return Vec::new();
        };

        let mut overrides = Vec::with_capacity(table.len());
        for (key, value) in table {
            let raw = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => {
                    tracing::warn!(key = %key, "Ignoring non-scalar settings override");
                    continue;
                }
            };
            overrides.push((key.clone(), raw));
        }
        overrides
    }

    /// Configured start directory with `~` expanded.
    #[must_use]
    pub fn start_dir(&self, home: &Path) -> Option<PathBuf> {
        let raw = self.app.as_ref()?.start_dir.as_deref()?;
        Some(expand_home(&expand_env_vars(raw), home))
    }

    #[must_use]
    pub fn known_users_path(&self, home: &Path) -> Option<PathBuf> {
        let raw = self.app.as_ref()?.known_users_file.as_deref()?;
        Some(expand_home(&expand_env_vars(raw), home))
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        let secs = self
            .commands
            .as_ref()
            .and_then(|c| c.timeout_seconds)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    #[must_use]
    pub fn port_probe_timeout(&self) -> Duration {
        let ms = self
            .commands
            .as_ref()
            .and_then(|c| c.port_probe_timeout_ms)
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_PORT_PROBE_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    /// Webhook URL after env expansion; `None` when unset or blank.
    #[must_use]
    pub fn webhook_url(&self) -> Option<String> {
        let raw = self.issues.as_ref()?.webhook_url.as_deref()?;
        let expanded = expand_env_vars(raw);
        let trimmed = expanded.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn issue_username(&self) -> String {
        self.issues
            .as_ref()
            .and_then(|i| i.username.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ISSUE_USERNAME.to_string())
    }
}

/// Replace `${VAR}` references with environment values. Unset variables
/// become empty; an unclosed `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if var.is_empty() {
                    out.push_str("${}");
                } else {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

/// `~/.nebula`
#[must_use]
pub fn nebula_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".nebula"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    nebula_dir().map(|dir| dir.join("config.toml"))
}

#[must_use]
pub fn known_users_path() -> Option<PathBuf> {
    nebula_dir().map(|dir| dir.join("known_users"))
}

#[must_use]
pub fn log_file_path() -> Option<PathBuf> {
    nebula_dir().map(|dir| dir.join("logs").join("nebula.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_env_vars_no_vars() {
        assert_eq!(expand_env_vars("hello world"), "hello world");
    }

    #[test]
    fn expand_env_vars_single_var() {
        unsafe {
            std::env::set_var("NEBULA_TEST_HOOK", "https://hooks.example/abc");
        }
        assert_eq!(
            expand_env_vars("${NEBULA_TEST_HOOK}"),
            "https://hooks.example/abc"
        );
        unsafe {
            std::env::remove_var("NEBULA_TEST_HOOK");
        }
    }

    #[test]
    fn expand_env_vars_missing_var_becomes_empty() {
        assert_eq!(
            expand_env_vars("a${NEBULA_DEFINITELY_UNSET_VAR}b"),
            "ab"
        );
    }

    #[test]
    fn expand_env_vars_unclosed_brace_preserved() {
        assert_eq!(expand_env_vars("prefix ${OPEN"), "prefix ${OPEN");
    }

    #[test]
    fn expand_env_vars_empty_var_name_preserved() {
        assert_eq!(expand_env_vars("x${}y"), "x${}y");
    }

    #[test]
    fn parse_empty_config() {
        let config: NebulaConfig = toml::from_str("").unwrap();
        assert!(config.app.is_none());
        assert!(config.setting_overrides().is_empty());
        assert_eq!(config.command_timeout(), Duration::from_secs(30));
        assert_eq!(config.port_probe_timeout(), Duration::from_millis(200));
        assert!(config.webhook_url().is_none());
        assert_eq!(config.issue_username(), DEFAULT_ISSUE_USERNAME);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[app]
start_dir = "~/work"

[settings]
font_size = 14
transparency_level = 0.5
cursor_blink = false
font_color = "cyan"

[commands]
timeout_seconds = 5

[issues]
webhook_url = "  https://hooks.example/1  "
username = "bot"
"#;
        let config: NebulaConfig = toml::from_str(toml_str).unwrap();
        let home = Path::new("/home/tester");
        assert_eq!(config.start_dir(home), Some(home.join("work")));
        assert_eq!(config.command_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.webhook_url().as_deref(),
            Some("https://hooks.example/1")
        );
        assert_eq!(config.issue_username(), "bot");

        let overrides = config.setting_overrides();
        assert!(overrides.contains(&("font_size".to_string(), "14".to_string())));
        assert!(overrides.contains(&("transparency_level".to_string(), "0.5".to_string())));
        assert!(overrides.contains(&("cursor_blink".to_string(), "false".to_string())));
        assert!(overrides.contains(&("font_color".to_string(), "cyan".to_string())));
    }

    #[test]
    fn non_scalar_overrides_are_skipped() {
        let config: NebulaConfig =
            toml::from_str("[settings]\nfont_size = [1, 2]\nmargin = 3\n").unwrap();
        assert_eq!(
            config.setting_overrides(),
            vec![("margin".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config: NebulaConfig = toml::from_str("[commands]\ntimeout_seconds = 0\n").unwrap();
        assert_eq!(config.command_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn blank_webhook_is_none() {
        let config: NebulaConfig =
            toml::from_str("[issues]\nwebhook_url = \"${NEBULA_UNSET_HOOK_VAR}\"\n").unwrap();
        assert!(config.webhook_url().is_none());
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "invalid toml [").unwrap();
        let err = NebulaConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn load_from_reports_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = NebulaConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn expand_home_variants() {
        let home = Path::new("/home/u");
        assert_eq!(expand_home("~", home), PathBuf::from("/home/u"));
        assert_eq!(expand_home("~/x", home), PathBuf::from("/home/u/x"));
        assert_eq!(expand_home("/abs", home), PathBuf::from("/abs"));
    }
}
