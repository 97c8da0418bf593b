//! Configuration file support for guidepost.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Per-project credential variables (`<PROJECT>_GUIDEPOST_ZENDESK_EMAIL`,
//!    `<PROJECT>_GUIDEPOST_ZENDESK_PASSWORD_TOKEN`), credentials only
//! 3. Environment variables (prefixed with `GUIDEPOST_`, sections separated by
//!    `__`, e.g. `GUIDEPOST_ZENDESK__SUBDOMAIN`)
//! 4. Config file (./guidepost.toml, then ~/.config/guidepost/config.toml)
//! 5. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [zendesk]
//! subdomain = "acme"          # https://acme.zendesk.com
//! project = "helpdesk"        # reads HELPDESK_GUIDEPOST_ZENDESK_* variables
//! email = "agent@acme.com"    # optional when the project variables are set
//! token = "..."
//!
//! [backup]
//! dir = "/var/backups/guidepost"
//! sideload = true
//! all_locales = true
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use guidepost::zendesk::DEFAULT_TIMEOUT;
use guidepost::{Credentials, SyncOptions, ZendeskError};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub zendesk: ZendeskConfig,
    pub backup: BackupConfig,
    pub http: HttpConfig,
}

/// Zendesk account and credentials.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZendeskConfig {
    /// Help-center subdomain (`<subdomain>.zendesk.com`).
    pub subdomain: Option<String>,
    /// Deployment identifier used to name the credential variables.
    pub project: Option<String>,
    /// Agent email for API token auth.
    pub email: Option<String>,
    /// API token.
    pub token: Option<String>,
}

/// Default backup options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Root directory for backup blobs.
    /// Defaults to `<data dir>/guidepost/backups`.
    pub dir: Option<PathBuf>,
    pub sideload: bool,
    pub all_locales: bool,
    /// Locale to back up when not backing up every locale.
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// A broken config source is logged and replaced by the defaults.
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::default_config_path()
            && path.exists()
        {
            tracing::debug!("Loading config from {:?}", path);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let local_config = PathBuf::from("guidepost.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./guidepost.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // GUIDEPOST_BACKUP__ALL_LOCALES -> backup.all_locales
        builder = builder.add_source(
            Environment::with_prefix("GUIDEPOST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    pub fn subdomain(&self) -> Option<&str> {
        self.zendesk.subdomain.as_deref().filter(|s| !s.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Resolve API credentials from the process environment and the config.
    pub fn credentials(&self) -> Result<Credentials, ZendeskError> {
        self.credentials_from(|name| std::env::var(name).ok())
    }

    /// Resolve API credentials, reading variables through `lookup`.
    ///
    /// The per-project variables win over `[zendesk] email/token`.
    pub fn credentials_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Credentials, ZendeskError> {
        let (email_var, token_var) = match self.project_prefix() {
            Some(prefix) => (
                Some(format!("{prefix}_GUIDEPOST_ZENDESK_EMAIL")),
                Some(format!("{prefix}_GUIDEPOST_ZENDESK_PASSWORD_TOKEN")),
            ),
            None => (None, None),
        };

        let email = email_var
            .as_deref()
            .and_then(&lookup)
            .or_else(|| self.zendesk.email.clone())
            .unwrap_or_default();
        let token = token_var
            .as_deref()
            .and_then(&lookup)
            .or_else(|| self.zendesk.token.clone())
            .unwrap_or_default();

        Credentials::new(email, token)
    }

    fn project_prefix(&self) -> Option<String> {
        self.zendesk
            .project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_uppercase().replace('-', "_"))
    }

    /// Backup root directory, falling back to the platform data directory.
    pub fn backup_dir(&self) -> Option<PathBuf> {
        self.backup.dir.clone().or_else(|| {
            ProjectDirs::from("", "", "guidepost").map(|dirs| dirs.data_dir().join("backups"))
        })
    }

    /// Sync options from the `[backup]` section.
    pub fn sync_options(&self) -> SyncOptions {
        let mut options = SyncOptions::default()
            .with_sideload(self.backup.sideload)
            .with_all_locales(self.backup.all_locales);
        if let Some(locale) = &self.backup.locale {
            options = options.with_locale(locale.clone());
        }
        options
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "guidepost").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
