//! Clap derive structures for the `thinqlink` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// thinqlink -- bridge ThinQ air conditioners to a smart-home hub
#[derive(Debug, Parser)]
#[command(
    name = "thinqlink",
    version,
    about = "Inspect and control ThinQ air conditioners from the command line",
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

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to thinqlink.toml (defaults to the platform config dir)
    #[arg(long, env = "THINQLINK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List appliances registered to the account
    #[command(alias = "dev", alias = "ls")]
    Devices,

    /// Stream capability updates for bridged air conditioners
    Watch(WatchArgs),

    /// Read one capability's current value
    Get(GetArgs),

    /// Write one capability
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Watch a single device id instead of every air conditioner
    pub device: Option<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Device id (see `thinqlink devices`)
    pub device: String,

    /// Capability name, e.g. `active`, `rotation-speed`, `target-state`
    pub capability: String,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Device id (see `thinqlink devices`)
    pub device: String,

    /// Capability name, e.g. `active`, `rotation-speed`, `target-state`
    pub capability: String,

    /// Value: `on`/`off`, an integer, or a decimal number
    pub value: String,
}
