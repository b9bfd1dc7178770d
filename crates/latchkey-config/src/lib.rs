//! Configuration and persistence for the latchkey CLI.
//!
//! A TOML config file with env overrides, the file-backed session store
//! that survives between invocations, and auth-key resolution
//! (flag, env, keyring, prompt).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use latchkey_api::session::{ConnectionDetails, SessionState, SessionStore};
use latchkey_api::transport::DEFAULT_TIMEOUT;
use latchkey_core::{CoreError, Theme, ThemeStore};

/// Keyring service name; entries are keyed by device IP.
pub const KEYRING_SERVICE: &str = "latchkey";

/// Env var consulted for the auth key when no flag is given.
pub const AUTH_KEY_ENV: &str = "LATCHKEY_AUTH_KEY";

/// Env var overriding the session state directory.
pub const STATE_DIR_ENV: &str = "LATCHKEY_STATE_DIR";

const SESSION_FILE: &str = "session.toml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no auth key available for device {ip}")]
    NoCredentials { ip: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Device used by `login` when no address is given.
    pub device: Option<DeviceDefaults>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Theme used when none has been chosen yet.
    pub theme: Option<Theme>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            theme: None,
        }
    }
}

impl Defaults {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceDefaults {
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    80
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "latchkey", "latchkey")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "latchkey", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding the session file. `LATCHKEY_STATE_DIR` wins.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(STATE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    project_dirs().map_or_else(
        || home_fallback(&[".local", "state", "latchkey"]),
        |dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .to_path_buf()
        },
    )
}

pub fn session_path() -> PathBuf {
    state_dir().join(SESSION_FILE)
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus `LATCHKEY_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if present), then env.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LATCHKEY_").split("_"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Session file ────────────────────────────────────────────────────

/// On-disk layout of the session file.
#[derive(Debug, Default, Deserialize, Serialize)]
struct StateFile {
    #[serde(default)]
    authorized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection: Option<ConnectionDetails>,
}

/// Session context and theme choice, kept in one TOML file.
///
/// Writes are read-modify-write: saving the session keeps the stored
/// theme and vice versa. There is no file locking.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default session path.
    pub fn open_default() -> Self {
        Self::new(session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StateFile, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StateFile::default()),
            Err(e) => return Err(e.into()),
        };
        // A half-written or hand-mangled file reads as logged out; the next
        // save replaces it.
        match toml::from_str(&raw) {
            Ok(file) => Ok(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(StateFile::default())
            }
        }
    }

    fn write(&self, file: &StateFile) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string_pretty(file)?)?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "session state written");
        Ok(())
    }
}

// The file holds the auth key in clear.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<SessionState, latchkey_api::Error> {
        let file = self
            .read()
            .map_err(|e| latchkey_api::Error::Session(e.to_string()))?;
        Ok(SessionState {
            connection: file.connection,
            authorized: file.authorized,
        })
    }

    fn save(&self, state: &SessionState) -> Result<(), latchkey_api::Error> {
        let to_session = |e: ConfigError| latchkey_api::Error::Session(e.to_string());
        let mut file = self.read().map_err(to_session)?;
        file.connection.clone_from(&state.connection);
        file.authorized = state.authorized;
        self.write(&file).map_err(to_session)
    }
}

impl ThemeStore for FileSessionStore {
    fn load_theme(&self) -> Result<Option<Theme>, CoreError> {
        self.read()
            .map(|file| file.theme)
            .map_err(|e| CoreError::Storage(e.to_string()))
    }

    fn save_theme(&self, theme: Theme) -> Result<(), CoreError> {
        let to_core = |e: ConfigError| CoreError::Storage(e.to_string());
        let mut file = self.read().map_err(to_core)?;
        file.theme = Some(theme);
        self.write(&file).map_err(to_core)
    }
}

// ── Auth-key resolution ─────────────────────────────────────────────

/// Resolve the auth key for `ip`: flag, then `LATCHKEY_AUTH_KEY`, then the
/// system keyring, then the key remembered from the last session, then
/// (when `interactive`) a hidden prompt.
pub fn resolve_auth_key(
    flag: Option<SecretString>,
    remembered: Option<SecretString>,
    ip: &str,
    interactive: bool,
) -> Result<SecretString, ConfigError> {
    resolve_chain(
        flag,
        std::env::var(AUTH_KEY_ENV).ok(),
        || keyring_lookup(ip).or_else(|| remembered.map(|k| k.expose_secret().to_owned())),
        || {
            if interactive {
                rpassword::prompt_password(format!("Auth key for {ip}: "))
                    .map(Some)
                    .map_err(ConfigError::from)
            } else {
                Ok(None)
            }
        },
    )?
    .ok_or_else(|| ConfigError::NoCredentials { ip: ip.into() })
}

fn resolve_chain(
    flag: Option<SecretString>,
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    prompt: impl FnOnce() -> Result<Option<String>, ConfigError>,
) -> Result<Option<SecretString>, ConfigError> {
    if let Some(key) = flag {
        return Ok(Some(key));
    }
    if let Some(key) = env.filter(|k| !k.is_empty()) {
        debug!("auth key taken from environment");
        return Ok(Some(SecretString::from(key)));
    }
    if let Some(key) = keyring() {
        debug!("auth key taken from keyring or previous session");
        return Ok(Some(SecretString::from(key)));
    }
    Ok(prompt()?
        .filter(|k| !k.is_empty())
        .map(SecretString::from))
}

fn keyring_lookup(ip: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, ip)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Remember the auth key for `ip` in the system keyring.
pub fn store_auth_key(ip: &str, key: &SecretString) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, ip)?.set_password(key.expose_secret())?;
    Ok(())
}

/// Forget the stored auth key for `ip`. Missing entries are not an error.
pub fn forget_auth_key(ip: &str) -> Result<(), ConfigError> {
    match keyring::Entry::new(KEYRING_SERVICE, ip)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
