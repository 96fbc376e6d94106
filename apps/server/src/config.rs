use std::{env, fmt, fs, path};

use logger::LogFormat;
use pinger::ConfigError;
use pinger::config::{LogConfig, MonitorConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub log: LogConfig,
    pub server: Server,
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub format: LogFormat,
}

impl Default for Server {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 5000 }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/pinger/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Some(config_home) = env::var_os("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::var_os("HOME") {
        path::PathBuf::from(home_dir).join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("pinger/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Current Pinger Configuration:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Targets", &self.monitor.targets.len())?;
        for target in &self.monitor.targets {
            write_2(f, "Target", target)?;
        }
        write_1(f, "Interval (s)", &self.monitor.interval_seconds)?;
        write_1(f, "Timeout (s)", &self.monitor.timeout_seconds)?;
        write_1(f, "Autostart", &self.monitor.autostart)?;
        write_title_1(f, "Log")?;
        write_1(f, "Path", &self.log.path.display())?;
        write_1(f, "Download Name", &self.log.download_name)?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;
        write_title_1(f, "Logging")?;
        write_1(f, "Format", &self.logging.format)?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/pinger/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::Read { path: config_path.clone(), source })?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }
}
