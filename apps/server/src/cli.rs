use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Periodic HTTP uptime pinger with a small control API
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config file, created with defaults when missing
    #[arg(short, long, env = "PINGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind the control API to
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to bind the control API to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Wait for POST /start instead of pinging right away
    #[arg(long)]
    pub no_autostart: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_autostart {
            config.monitor.autostart = false;
        }
    }
}
