//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Settings;

/// The ColdShard CLI. For more information, use the help command.
#[derive(Parser, Debug)]
#[command(name = "coldshard", version)]
pub struct Cli {
    /// Credential file location
    #[arg(long, env = "COLDSHARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Panel API root
    #[arg(long, env = "COLDSHARD_PANEL_URL", global = true)]
    pub panel_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings::new(self.panel_url.clone(), self.config.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Login to the panel using your API key
    Login {
        /// API key; prompted for with hidden input when omitted
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Logout of the panel
    Logout,
    /// Get information about your account
    Account,
    /// Commands related to servers
    Servers {
        #[command(subcommand)]
        command: ServerCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// List your servers
    List(ListArgs),
    /// View information about a specific server
    View,
    /// Start a server
    Start,
    /// Stop a server
    Stop,
    /// Restart a server
    Restart,
    /// Kill the power on a server
    Kill,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only list your servers
    #[arg(long)]
    pub mine: bool,

    /// Hide suspended servers
    #[arg(long)]
    pub hide_suspended: bool,

    /// The amount of servers to list
    #[arg(long, default_value_t = 10)]
    pub count: usize,
}
