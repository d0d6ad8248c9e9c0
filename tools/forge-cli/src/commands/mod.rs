//! CLI command implementations.

pub mod add;
pub mod doctor;
pub mod init;

use clap::{Args, Subcommand};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Project name, or "." for the current directory.
    #[arg(default_value = ".")]
    pub name: String,

    /// WooCommerce store URL.
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Module to enable (repeatable).
    #[arg(short, long = "module")]
    pub modules: Vec<String>,

    /// Accept defaults instead of prompting.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    #[command(subcommand)]
    pub target: AddTarget,
}

/// What to add to the project.
#[derive(Subcommand)]
pub enum AddTarget {
    /// Enable a module in storeforge.toml.
    Module {
        /// Module name.
        name: String,
    },

    /// Set the child theme in storeforge.toml.
    Theme {
        /// Theme name.
        name: String,
    },
}

/// Arguments for the doctor command.
#[derive(Args)]
pub struct DoctorArgs {
    /// Connection check timeout in seconds.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}
