//! Clap derive structures for the `airq` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends on clap alone so `build.rs` can render man pages from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// airq -- air-quality sensor network from the command line
#[derive(Debug, Parser)]
#[command(
    name = "airq",
    version,
    about = "Monitor air-quality sensors, alerts, and placement requests",
    long_about = "Command-line client for the airq air-quality monitoring platform.\n\n\
        Log in once with `airq login`; the session is kept in your data\n\
        directory until you log out or the server rejects it.",
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
    /// Backend API base URL (overrides config)
    #[arg(long, env = "AIRQ_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "AIRQ_OUTPUT", global = true)]
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "AIRQ_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "AIRQ_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory holding the persisted session (overrides config)
    #[arg(long, env = "AIRQ_SESSION_DIR", global = true)]
    pub session_dir: Option<PathBuf>,

    /// Keep the session in memory only; nothing is read or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,
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
    /// Log in and persist the session
    Login(LoginArgs),

    /// Forget the current session
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Show the logged-in user
    Whoami {
        /// Fetch the profile from the server instead of the local session
        #[arg(long)]
        refresh: bool,
    },

    /// Manage your profile
    Profile(ProfileArgs),

    /// Browse and manage sensors
    #[command(alias = "s")]
    Sensors(SensorsArgs),

    /// Manage alert subscriptions
    #[command(alias = "subs")]
    Subscriptions(SubscriptionsArgs),

    /// Community sensor-placement requests
    #[command(alias = "req")]
    Requests(RequestsArgs),

    /// Account administration (admin only)
    Users(UsersArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Account email
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from the first line of stdin (no confirmation prompt)
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Update fields of your profile
    Update {
        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// Set an arbitrary field (repeatable), e.g. --set city=Leeds
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SENSORS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SensorsArgs {
    #[command(subcommand)]
    pub command: SensorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SensorsCommand {
    /// List sensors
    #[command(alias = "ls")]
    List,

    /// Show one sensor
    Get {
        /// Sensor ID
        id: String,
    },

    /// Recent readings for a sensor
    Readings {
        /// Sensor ID
        id: String,

        /// Maximum number of readings
        #[arg(long, short = 'l')]
        limit: Option<u32>,
    },

    /// Register a sensor (admin only)
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long)]
        status: Option<SensorStatusArg>,
    },

    /// Change a sensor (admin only); omitted fields keep their value
    Update {
        /// Sensor ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long)]
        status: Option<SensorStatusArg>,
    },

    /// Remove a sensor (admin only)
    #[command(alias = "rm")]
    Delete {
        /// Sensor ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SensorStatusArg {
    Active,
    Inactive,
    Maintenance,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SUBSCRIPTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SubscriptionsArgs {
    #[command(subcommand)]
    pub command: SubscriptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubscriptionsCommand {
    /// List your alert subscriptions
    #[command(alias = "ls")]
    List,

    /// Alert me when a sensor's AQI crosses a threshold
    Create {
        /// Sensor ID
        #[arg(long, default_value = "")]
        sensor: String,

        /// AQI threshold (0-500)
        #[arg(long, allow_hyphen_values = true)]
        threshold: i64,

        #[arg(long, default_value = "email")]
        channel: ChannelArg,
    },

    /// Remove a subscription
    #[command(alias = "rm")]
    Delete {
        /// Subscription ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    Email,
    Sms,
    Push,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PLACEMENT REQUESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RequestsArgs {
    #[command(subcommand)]
    pub command: RequestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RequestsCommand {
    /// List placement requests
    #[command(alias = "ls")]
    List,

    /// Ask for a sensor at a location
    Create {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Street address or landmark
        #[arg(long)]
        address: Option<String>,

        /// Why a sensor is needed here (10-500 characters)
        #[arg(long)]
        reason: String,
    },

    /// Approve a request (admin only)
    Approve {
        /// Request ID
        id: String,
    },

    /// Reject a request (admin only)
    Reject {
        /// Request ID
        id: String,
    },

    /// Withdraw a request
    #[command(alias = "rm")]
    Delete {
        /// Request ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List accounts
    #[command(alias = "ls")]
    List,

    /// Change an account's role
    SetRole {
        /// User ID
        id: String,

        /// New role, e.g. ADMIN, EDITOR, VIEWER
        role: String,
    },

    /// Remove an account
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file (prompts for anything not given as a flag)
    Init,

    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
