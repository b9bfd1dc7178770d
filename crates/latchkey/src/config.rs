//! CLI configuration: thin layer over `latchkey_config`.
//!
//! Global flags win over `config.toml`, which wins over built-in defaults.
//! Also wires the session file, HTTP client, and theme together.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use tracing::debug;

use latchkey_api::{DeviceClient, Session, TransportConfig};
use latchkey_config::{Config, FileSessionStore};
use latchkey_core::ThemePreference;
use latchkey_core::theme::system_prefers_dark;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::commands::Ctx;
use crate::error::CliError;
use crate::output::{self, Painter};

/// Settings after merging flags over the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub output: OutputFormat,
    pub color: ColorMode,
    pub timeout: Duration,
}

pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Resolved {
    let output = global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table);
    let color = global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto);
    let timeout = global
        .timeout
        .map_or_else(|| cfg.defaults.timeout(), Duration::from_secs);
    Resolved {
        output,
        color,
        timeout,
    }
}

/// Load everything a command needs from disk.
pub fn build_context(global: &GlobalOpts) -> Result<Ctx, CliError> {
    let cfg = latchkey_config::load_config_or_default();
    let settings = resolve(global, &cfg);
    let store = FileSessionStore::open_default();
    debug!(session = %store.path().display(), ?settings, "building context");

    let session = Arc::new(Session::load(Arc::new(store.clone()))?);
    let transport = TransportConfig::default().with_timeout(settings.timeout);
    let client = DeviceClient::new(session, &transport)?;

    let system_dark = cfg
        .defaults
        .theme
        .map_or_else(system_prefers_dark, latchkey_core::Theme::is_dark);
    let theme = ThemePreference::load(store, system_dark)?;

    let color = output::should_color(settings.color);
    Ok(Ctx {
        client,
        output: settings.output,
        quiet: global.quiet,
        yes: global.yes,
        color,
        painter: Painter::new(theme.theme().palette(), color),
        theme,
        flash: latchkey_core::Flash::default(),
        device: cfg.device,
    })
}
