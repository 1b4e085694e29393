//! Clap derive structures for the `spyderwatch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// spyderwatch -- read-only monitor for Spyder heating controllers
#[derive(Debug, Parser)]
#[command(
    name = "spyderwatch",
    version,
    about = "Monitor Spyder heating controllers from the command line",
    long_about = "Polls a Spyder controller's status endpoint and projects\n\
        per-output and system readings (temperature, power, alarms,\n\
        reset counts, relay status) as read-only sensors.",
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
    /// Controller host (hostname, IP, or host:port)
    #[arg(long, short = 'H', env = "SPYDER_HOST", global = true)]
    pub host: Option<String>,

    /// Output format (defaults to the configured value, then table)
    #[arg(long, short = 'o', env = "SPYDER_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SPYDER_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Seconds between polls (watch)
    #[arg(long, env = "SPYDER_POLL_INTERVAL_SECS", global = true)]
    pub interval: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
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

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Fetch and show the current controller status
    #[command(alias = "st")]
    Status,

    /// List the sensors projected from the current status
    #[command(alias = "sens")]
    Sensors,

    /// Poll continuously and print each refresh
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage the spyderwatch configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many refreshes (default: run until Ctrl-C)
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Persist the controller host (the one-field setup flow)
    Init {
        /// Controller host (hostname, IP, or host:port)
        host: String,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}
