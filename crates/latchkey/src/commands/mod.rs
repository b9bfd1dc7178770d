//! Command dispatch: route guard -> handler -> output formatting.

pub mod cards;
pub mod config_cmd;
pub mod dashboard;
pub mod firmware;
pub mod logs;
pub mod menu;
pub mod reads;
pub mod schedules;
pub mod session;
pub mod theme;
pub mod util;
pub mod wifi;

use latchkey_api::DeviceClient;
use latchkey_config::{DeviceDefaults, FileSessionStore};
use latchkey_core::{Flash, FlashKind, Route, ThemePreference, navigate};
use tracing::debug;

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Painter};

/// Everything a handler needs for one invocation.
pub struct Ctx {
    pub client: DeviceClient,
    pub output: OutputFormat,
    pub quiet: bool,
    pub yes: bool,
    pub color: bool,
    pub painter: Painter,
    pub theme: ThemePreference<FileSessionStore>,
    pub flash: Flash,
    /// `[device]` from the config file.
    pub device: Option<DeviceDefaults>,
}

impl Ctx {
    /// Show a result message through the flash and print it.
    pub fn notify(&mut self, kind: FlashKind, message: impl Into<String>) {
        let shown = self.flash.show(message, kind);
        output::print_flash(shown, self.painter, self.quiet);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(FlashKind::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(FlashKind::Info, message);
    }

    /// Print rendered output unless `--quiet`.
    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.quiet);
    }

    /// Re-derive colors after a theme change.
    pub fn repaint(&mut self) {
        self.painter = Painter::new(self.theme.theme().palette(), self.color);
    }
}

/// Outcome of passing a command's route through the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Proceed,
    /// Login requested while already authenticated.
    AlreadyLoggedIn,
}

/// Navigate to `route` with the current authorized flag.
fn enter(ctx: &Ctx, route: Route) -> Result<Entry, CliError> {
    let landed = navigate(ctx.client.session(), route);
    debug!(requested = %route, landed = %landed, "route guard");
    if landed == route {
        return Ok(Entry::Proceed);
    }
    match landed {
        Route::Login => Err(CliError::NotLoggedIn { route: route.path() }),
        _ if route == Route::Login => Ok(Entry::AlreadyLoggedIn),
        other => Err(CliError::Internal(format!(
            "navigation to {} ended at {}",
            route.path(),
            other.path()
        ))),
    }
}

/// Dispatch a command to its handler after the route guard.
pub async fn dispatch(cmd: Command, ctx: &mut Ctx) -> Result<(), CliError> {
    if let Some(route) = cmd.route() {
        if enter(ctx, route)? == Entry::AlreadyLoggedIn {
            let at = ctx
                .client
                .session()
                .connection()
                .map(|c| format!(" to {}:{}", c.ip, c.port))
                .unwrap_or_default();
            ctx.info(format!("Already logged in{at}. Run `latchkey logout` first."));
            return Ok(());
        }
    }

    match cmd {
        Command::Login(args) => session::login(ctx, args).await,
        Command::Logout(args) => session::logout(ctx, &args),
        Command::Status => session::status(ctx),
        Command::Dashboard => dashboard::handle(ctx).await,
        Command::Cards(args) => cards::handle(ctx, args).await,
        Command::Reads(args) => reads::handle(ctx, args).await,
        Command::Wifi(args) => wifi::handle(ctx, args).await,
        Command::Config(args) => config_cmd::handle(ctx, args).await,
        Command::Logs(args) => logs::handle(ctx, args).await,
        Command::Schedules(args) => schedules::handle(ctx, args).await,
        Command::Firmware(args) => firmware::handle(ctx, args).await,
        Command::Theme(args) => theme::handle(ctx, args),
        Command::Menu => menu::handle(ctx),
        // Completions are handled before a context exists
        Command::Completions(_) => Ok(()),
    }
}
