use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indoc::formatdoc;
use log::{debug, Level, LevelFilter};
use serde::Deserialize;
use strum::{Display, EnumString};

pub const CONFIG_FILE_NAME: &str = "tfsutil.toml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MISSING_URL_HELP: &str = "This tool requires a TFS base url to operate.\n\n\
Please specify one on the command line or in the config file 'tfsutil.toml'\n\
For help creating a config file, see the command 'tfsutil config create'";

const MISSING_PAT_HELP: &str = "This tool requires a TFS Personal Access Token (pat) for authentication.\n\n\
Please specify a pat on the command line or in the config file 'tfsutil.toml'\n\
For help creating a config file, see the command 'tfsutil config create'";

/// Expands environment variables in a string value.
/// Supports ${VAR} and $VAR syntax.
pub fn expand_env_vars(value: &str) -> Result<String> {
    shellexpand::env(value)
        .map(|s| s.into_owned())
        .map_err(|e| anyhow::anyhow!("Failed to expand environment variable in '{}': {}", value, e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a configured level, falling back to `WARN` for anything unknown.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(level) => level.parse().unwrap_or_else(|_| {
                eprintln!("Unknown log level '{level}', using {}", LogLevel::default());
                LogLevel::default()
            }),
            None => LogLevel::default(),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// Candidate config file locations, in the order they are tried.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tfsutil").join(CONFIG_FILE_NAME));
    }
    paths
}

/// Settings as they appear in `tfsutil.toml`. Every key is optional; flags and
/// environment variables are layered on top with [`TfsutilConfig::with_overrides`].
#[derive(Deserialize, Default, Clone, PartialEq)]
pub struct TfsutilConfig {
    pub tfsurl: Option<String>,
    pub pat: Option<String>,
    pub collection: Option<String>,
    pub project: Option<String>,
    pub loglevel: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Option<u64>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
    /// A `--config` path that was asked for but does not exist.
    #[serde(skip)]
    pub missing: Option<PathBuf>,
}

impl std::fmt::Debug for TfsutilConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfsutilConfig")
            .field("tfsurl", &self.tfsurl)
            .field("pat", &self.pat.as_ref().map(|_| "***redacted***"))
            .field("collection", &self.collection)
            .field("project", &self.project)
            .field("loglevel", &self.loglevel)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .field("path", &self.path)
            .field("missing", &self.missing)
            .finish()
    }
}

impl TfsutilConfig {
    /// Reads the config file at `config_path`, or the first default location
    /// that exists. A missing file gives an empty config; a broken one is an error.
    pub fn from_file(config_path: Option<&PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(path) => Some(path.clone()),
            None => default_config_paths().into_iter().find(|p| p.exists()),
        };

        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self {
                missing: config_path.cloned(),
                ..Self::default()
            });
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        let mut config = Self::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.path = Some(path);
        Ok(config)
    }

    pub fn from_str(config: &str) -> Result<Self> {
        let config: TfsutilConfig = toml::from_str(config)?;
        Ok(config)
    }

    /// Layers `overrides` on top of `self`; any value set in `overrides` wins.
    #[must_use]
    pub fn with_overrides(self, overrides: TfsutilConfig) -> Self {
        Self {
            tfsurl: overrides.tfsurl.or(self.tfsurl),
            pat: overrides.pat.or(self.pat),
            collection: overrides.collection.or(self.collection),
            project: overrides.project.or(self.project),
            loglevel: overrides.loglevel.or(self.loglevel),
            proxy: overrides.proxy.or(self.proxy),
            timeout: overrides.timeout.or(self.timeout),
            path: self.path,
            missing: self.missing,
        }
    }

    /// Says where the settings came from when no file was read. Loading
    /// happens before the logger exists, so the caller logs this afterwards.
    pub fn source_notice(&self) -> Option<(Level, String)> {
        if self.path.is_some() {
            return None;
        }
        Some(match &self.missing {
            Some(requested) => (
                Level::Warn,
                format!("Config file {} not found, using defaults", requested.display()),
            ),
            None => (
                Level::Info,
                format!("No {CONFIG_FILE_NAME} found, using defaults"),
            ),
        })
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse_or_default(self.loglevel.as_deref())
    }

    /// Renders the starter config written by `tfsutil config create`.
    pub fn template(created: &str) -> String {
        formatdoc! {r#"
            # Config created {created}
            tfsurl = "http://YOURSERVER:8080/tfs"
            pat = "YOUR_PERSONAL_ACCESS_TOKEN"
            collection = "OPTIONAL_DEFAULT_COLLECTION"
            project = "OPTIONAL_DEFAULT_PROJECT"
            loglevel = "WARN"
            # proxy = "http://proxy.example.com:8080"
            # timeout = {timeout}
        "#, created = created, timeout = DEFAULT_TIMEOUT_SECS}
    }

    /// Writes `contents` to `path` with owner-only permissions on Unix, since
    /// the file holds an access token.
    pub fn write_file(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            anyhow::bail!(
                "{} already exists, use --force to overwrite it",
                path.display()
            );
        }

        #[cfg(unix)]
        let mut file = {
            use std::os::unix::fs::OpenOptionsExt;
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .mode(0o600)
                .open(path)?
        };

        #[cfg(not(unix))]
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;

        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

/// Everything the client needs to address the server, resolved once at startup.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub tfsurl: String,
    pub pat: String,
    pub collection: String,
    pub project: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("tfsurl", &self.tfsurl)
            .field("pat", &"***redacted***")
            .field("collection", &self.collection)
            .field("project", &self.project)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TryFrom<&TfsutilConfig> for ConnectionConfig {
    type Error = anyhow::Error;

    fn try_from(config: &TfsutilConfig) -> Result<Self, Self::Error> {
        let expand = |value: &Option<String>| -> Result<String> {
            value
                .as_deref()
                .map(str::trim)
                .map_or_else(|| Ok(String::new()), expand_env_vars)
        };

        let tfsurl = expand(&config.tfsurl)?;
        if tfsurl.trim().is_empty() {
            anyhow::bail!(MISSING_URL_HELP);
        }
        let pat = expand(&config.pat)?;
        if pat.trim().is_empty() {
            anyhow::bail!(MISSING_PAT_HELP);
        }
        let proxy = match &config.proxy {
            Some(proxy) if !proxy.trim().is_empty() => Some(expand_env_vars(proxy.trim())?),
            _ => None,
        };

        if let Some(path) = &config.path {
            debug!("Using config file: {}", path.display());
        }
        debug!("Using TFS url: {tfsurl}");
        debug!(
            "Using PAT that starts with: '{}'",
            pat.chars().take(4).collect::<String>()
        );

        Ok(Self {
            tfsurl,
            pat: pat.trim().to_string(),
            collection: expand(&config.collection)?,
            project: expand(&config.project)?,
            proxy,
            timeout: Duration::from_secs(config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}
