//! Configuration for the word2vec server

use std::path::{Path, PathBuf};

use core_config::{AppInfo, FromEnv, app_info, file::load_toml, server::ServerConfig};
use domain_word2vec::ModelFormat;
use serde::Deserialize;

pub use core_config::Environment;

/// Raw TOML layout of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub global: GlobalSection,
    pub w2v_server: W2vSection,
}

/// `[global]`: process-level settings, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalSection {
    /// Falls back to `HOST`, then 0.0.0.0
    pub host: Option<String>,
    /// Falls back to `PORT`, then 8080
    pub port: Option<u16>,
    /// No PID file is written when absent
    pub pid_file: Option<PathBuf>,
    pub run_user: Option<String>,
    pub run_group: Option<String>,
}

/// `[w2v_server]`: model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct W2vSection {
    pub model_file: PathBuf,
    /// Defaults to true (original C binary format)
    pub binary: Option<bool>,
    /// Defaults to the model's own vocabulary
    pub vocabulary_file: Option<PathBuf>,
}

/// Account to switch to once the listener is bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunAs {
    pub user: String,
    pub group: String,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub pid_file: Option<PathBuf>,
    pub run_user: Option<String>,
    pub run_group: Option<String>,
    pub model_file: PathBuf,
    pub model_format: ModelFormat,
    pub vocabulary_file: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let file: ConfigFile = load_toml(path)?;
        Self::from_file(file)
    }

    pub fn from_file(file: ConfigFile) -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server =
            ServerConfig::from_env()?.with_overrides(file.global.host, file.global.port);

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            pid_file: file.global.pid_file,
            run_user: file.global.run_user,
            run_group: file.global.run_group,
            model_file: file.w2v_server.model_file,
            model_format: ModelFormat::from_binary_flag(file.w2v_server.binary.unwrap_or(true)),
            vocabulary_file: file.w2v_server.vocabulary_file,
        })
    }

    /// Privileges are only dropped when both user and group are configured.
    pub fn run_as(&self) -> Option<RunAs> {
        match (&self.run_user, &self.run_group) {
            (Some(user), Some(group)) => Some(RunAs {
                user: user.clone(),
                group: group.clone(),
            }),
            _ => None,
        }
    }
}
