//! Clap derive structures for the `domus` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// domus -- control your home from the command line
#[derive(Debug, Parser)]
#[command(
    name = "domus",
    version,
    about = "Control rooms, devices, thermostats and security on a Domus home server",
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
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DOMUS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DOMUS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "DOMUS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Log in and store the session
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Check connectivity, server version and session
    Status,

    /// Refresh and show the whole dashboard
    #[command(alias = "dash")]
    Dashboard,

    /// Manage rooms
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Manage and switch devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage thermostats and set target temperatures
    #[command(alias = "temp", alias = "t")]
    Thermostats(ThermostatsArgs),

    /// Show, arm or disarm the security system
    #[command(alias = "sec")]
    Security(SecurityArgs),

    /// Manage the server endpoint and CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long, short = 'u', env = "DOMUS_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "DOMUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List,

    /// Create a room
    Create {
        /// Room name
        name: String,
    },

    /// Rename a room
    Rename {
        /// Room ID
        id: String,
        /// New name
        name: String,
    },

    /// Delete a room
    #[command(alias = "rm")]
    Delete {
        /// Room ID
        id: String,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List {
        /// Only devices in this room
        #[arg(long)]
        room: Option<String>,
    },

    /// Switch a device on or off
    Toggle {
        /// Device ID
        id: String,
    },

    /// Create a device
    Create(DeviceFields),

    /// Update a device
    Update {
        /// Device ID
        id: String,
        #[command(flatten)]
        fields: DeviceFields,
    },

    /// Delete a device
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DeviceFields {
    /// Device name
    #[arg(long)]
    pub name: Option<String>,

    /// Room the device belongs to
    #[arg(long)]
    pub room: Option<String>,

    /// Device type (e.g. light, socket)
    #[arg(long = "type")]
    pub device_type: Option<String>,

    /// Display color
    #[arg(long)]
    pub color: Option<String>,
}

// ── Thermostats ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThermostatsArgs {
    #[command(subcommand)]
    pub command: ThermostatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThermostatsCommand {
    /// List thermostats
    #[command(alias = "ls")]
    List,

    /// Set the target temperature (16-30 °C)
    Set {
        /// Thermostat ID
        id: String,
        /// Target temperature in °C
        #[arg(allow_negative_numbers = true)]
        temperature: f64,
    },

    /// Create a thermostat
    Create(ThermostatFields),

    /// Update a thermostat
    Update {
        /// Thermostat ID
        id: String,
        #[command(flatten)]
        fields: ThermostatFields,
    },

    /// Delete a thermostat
    #[command(alias = "rm")]
    Delete {
        /// Thermostat ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ThermostatFields {
    /// Thermostat name
    #[arg(long)]
    pub name: Option<String>,

    /// Room the thermostat belongs to
    #[arg(long)]
    pub room: Option<String>,

    /// Initial target temperature in °C
    #[arg(long)]
    pub temperature: Option<f64>,
}

// ── Security ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SecurityArgs {
    #[command(subcommand)]
    pub command: SecurityCommand,
}

#[derive(Debug, Subcommand)]
pub enum SecurityCommand {
    /// Show the current state
    Status,
    /// Arm the system
    Arm,
    /// Disarm the system
    Disarm,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Show the stored server endpoint
    GetEndpoint,

    /// Validate and store a new server endpoint
    SetEndpoint {
        /// Server address, e.g. 192.168.1.100:5000 or https://home.example
        url: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
