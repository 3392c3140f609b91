//! CLI argument definitions for the migration generator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "reglament-migrate",
    version,
    about = "Generate a PL/pgSQL script that adds rejection reasons from service reglaments",
    long_about = "Scan service reglaments for rejection reasons and negative-meaning criteria,\n\
                  resolve their record identifiers from the dictionaries and write one\n\
                  PL/pgSQL script that inserts them into every selected schema."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the migration script.
    Generate(GenerateArgs),

    /// List discovered reglaments and the dictionaries that would serve them.
    Services(ServicesArgs),
}

/// Input directories shared by every command.
#[derive(Args)]
pub struct InputArgs {
    /// Directory searched recursively for reglament XML files.
    #[arg(long = "reglaments", value_name = "DIR", default_value = "reglaments")]
    pub reglaments: PathBuf,

    /// Directory holding `<service>_<dictionary>.xml` and `<dictionary>.xml` files.
    #[arg(long = "dictionaries", value_name = "DIR", default_value = "dictionaries")]
    pub dictionaries: PathBuf,
}

#[derive(Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path of the generated script.
    #[arg(
        long = "output",
        short = 'o',
        value_name = "FILE",
        default_value = "script_to_add_rejection_reasons.sql"
    )]
    pub output: PathBuf,

    /// Schema to migrate (repeatable, default: kostgo).
    #[arg(long = "scheme", value_name = "NAME", conflicts_with = "all_schemes")]
    pub schemes: Vec<String>,

    /// Migrate every schema listed in the projects table.
    #[arg(long = "all-schemes")]
    pub all_schemes: bool,

    /// `full_name` of the dependent type the rows are attached to.
    #[arg(long = "dependent-type", value_name = "NAME")]
    pub dependent_type: Option<String>,

    /// Prefix of the generated row aliases.
    #[arg(long = "alias-prefix", value_name = "PREFIX")]
    pub alias_prefix: Option<String>,

    /// Write a JSON run report to this path.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Assemble and summarize without writing the script.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ServicesArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
