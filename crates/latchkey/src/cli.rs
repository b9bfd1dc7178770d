//! Clap derive structures for the `latchkey` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use latchkey_api::resources::{DEFAULT_PAGE, DEFAULT_PER_PAGE, LOGS_PER_PAGE};
use latchkey_core::{Route, Theme};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// latchkey -- manage RFID access-control devices from the command line
#[derive(Debug, Parser)]
#[command(
    name = "latchkey",
    version,
    about = "Manage latchkey RFID access-control devices from the command line",
    long_about = "Administer a latchkey door controller over its local REST API.\n\n\
        Log in once with `latchkey login <ip>`; the session is remembered\n\
        until `latchkey logout`.",
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
    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "LATCHKEY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds [default: from config, else 5]
    #[arg(long, env = "LATCHKEY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect to a device and verify its auth key
    Login(LoginArgs),

    /// End the session (the device address is kept for next login)
    Logout(LogoutArgs),

    /// Show the current session
    Status,

    /// Device health: WiFi, memory, storage, card and read counts
    #[command(alias = "dash")]
    Dashboard,

    /// Manage registered RFID cards
    #[command(alias = "c")]
    Cards(CardsArgs),

    /// Inspect and prune card read history
    Reads(ReadsArgs),

    /// Manage stored WiFi networks
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// View and change device configuration
    Config(ConfigArgs),

    /// Inspect and prune device logs
    Logs(LogsArgs),

    /// Manage scheduled restarts
    #[command(alias = "sched")]
    Schedules(SchedulesArgs),

    /// Upload and flash a firmware image (max 2 MiB)
    Firmware(FirmwareArgs),

    /// Show or change the color theme
    Theme(ThemeArgs),

    /// List the available sections
    Menu,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// The screen a command belongs to; `None` for local-only commands.
    pub fn route(&self) -> Option<Route> {
        match self {
            Self::Login(_) => Some(Route::Login),
            Self::Dashboard => Some(Route::Dashboard),
            Self::Cards(_) => Some(Route::Cards),
            Self::Reads(_) => Some(Route::CardReads),
            Self::Wifi(_) => Some(Route::Wifi),
            Self::Config(_) => Some(Route::Config),
            Self::Logs(_) => Some(Route::Logs),
            Self::Schedules(_) => Some(Route::RestartSchedules),
            Self::Firmware(_) => Some(Route::FirmwareUpdate),
            Self::Logout(_) | Self::Status | Self::Theme(_) | Self::Menu | Self::Completions(_) => {
                None
            }
        }
    }
}

// ── Shared List Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, short = 'p', default_value_t = DEFAULT_PAGE)]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Device IPv4 address [default: last session, else config]
    pub ip: Option<String>,

    /// Device HTTP port
    #[arg(long, short = 'P')]
    pub port: Option<u16>,

    /// Auth key (else LATCHKEY_AUTH_KEY, keyring, or a prompt)
    #[arg(long)]
    pub auth_key: Option<String>,

    /// Store the auth key in the system keyring after a successful login
    #[arg(long)]
    pub remember: bool,
}

#[derive(Debug, Args)]
pub struct LogoutArgs {
    /// Also remove the auth key from the system keyring
    #[arg(long)]
    pub forget: bool,
}

// ── Cards ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CardsArgs {
    #[command(subcommand)]
    pub command: CardsCommand,
}

#[derive(Debug, Args)]
pub struct CardFields {
    /// Card number as printed or read
    #[arg(long, short = 'n')]
    pub number: Option<String>,

    /// Holder's personal ID
    #[arg(long)]
    pub personal_id: Option<String>,

    /// First valid day (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last valid day (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CardsCommand {
    /// List registered cards
    #[command(alias = "ls")]
    List(PageArgs),

    /// Register a card
    Create(CardFields),

    /// Change a registered card
    Update {
        id: u32,
        #[command(flatten)]
        fields: CardFields,
    },

    /// Remove a registered card
    #[command(alias = "rm")]
    Delete { id: u32 },

    /// Remove every registered card
    Clear,

    /// Cards seen by the reader but not registered
    Unregistered,
}

// ── Card reads ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReadsArgs {
    #[command(subcommand)]
    pub command: ReadsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReadsCommand {
    /// List card reads, newest first
    #[command(alias = "ls")]
    List(PageArgs),

    /// Remove one read
    #[command(alias = "rm")]
    Delete { id: u32 },

    /// Remove the whole read history
    Clear,
}

// ── WiFi ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// List stored networks and the current connection
    #[command(alias = "ls")]
    List(PageArgs),

    /// Store a network
    Add {
        ssid: String,
        /// Passphrase (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Change a stored network
    Update {
        id: u32,
        #[arg(long)]
        ssid: String,
        /// Passphrase (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove a stored network
    #[command(alias = "rm")]
    Delete { id: u32 },

    /// Remove all stored networks (the default credentials are kept)
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the device configuration
    Get,

    /// Change device configuration; unset flags keep their value
    Set(ConfigSetArgs),
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    /// Lock hardware: SOLENOID or MAGNETIC
    #[arg(long)]
    pub door_lock_variant: Option<String>,

    /// Seconds the lock stays open
    #[arg(long)]
    pub door_lock_duration: Option<String>,

    /// Run the access program when the clock is not set
    #[arg(long)]
    pub run_program_without_time: Option<bool>,

    /// Enable or disable access control
    #[arg(long)]
    pub active: Option<bool>,

    /// Replace the auth key (the session follows the new key)
    #[arg(long)]
    pub new_auth_key: Option<String>,
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List log entries
    #[command(alias = "ls")]
    List {
        #[arg(long, short = 'p', default_value_t = DEFAULT_PAGE)]
        page: u32,
        #[arg(long, default_value_t = LOGS_PER_PAGE)]
        per_page: u32,
    },

    /// Remove one log entry
    #[command(alias = "rm")]
    Delete { id: String },

    /// Remove all log entries
    Clear,
}

// ── Restart schedules ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchedulesArgs {
    #[command(subcommand)]
    pub command: SchedulesCommand,
}

#[derive(Debug, Args)]
pub struct ScheduleFields {
    /// Time of day (HH:MM, 24-hour)
    #[arg(long, short = 't')]
    pub time: String,

    /// daily, weekly, monthly, or once
    #[arg(long = "type", short = 'T', default_value = "daily")]
    pub schedule_type: String,

    /// Days of week for weekly schedules (0 = Sunday), comma separated
    #[arg(long, value_delimiter = ',')]
    pub days_of_week: Vec<u8>,

    /// Days of month for monthly schedules (1-31), comma separated
    #[arg(long, value_delimiter = ',')]
    pub days_of_month: Vec<u8>,

    /// Date for one-off schedules (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    /// List restart schedules
    #[command(alias = "ls")]
    List(PageArgs),

    /// Add a restart schedule
    Create(ScheduleFields),

    /// Replace a restart schedule
    Update {
        id: u32,
        #[command(flatten)]
        fields: ScheduleFields,
    },

    /// Remove a restart schedule
    #[command(alias = "rm")]
    Delete { id: u32 },

    /// Remove all restart schedules
    Clear,
}

// ── Firmware ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FirmwareArgs {
    /// Path to the firmware image (.bin)
    pub path: PathBuf,
}

// ── Theme ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the active theme (default)
    Show,
    /// Switch between light and dark
    Toggle,
    /// Choose a theme explicitly
    Set { theme: ThemeChoice },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => Self::Light,
            ThemeChoice::Dark => Self::Dark,
        }
    }
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
