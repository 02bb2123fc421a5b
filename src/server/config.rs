//! Application configuration.
//!
//! Configuration is split in two explicit objects that are handed to collaborators at
//! construction time rather than read from process-wide state:
//!
//! - [`Settings`] configures the application object itself (template/static roots,
//!   cookie signing, escaping policy).
//! - [`ServiceSettings`] describes the services the application talks to (database,
//!   IRC announcements, the internal API endpoint).
//!
//! Both are plain values; the `with_*` methods return modified copies so a caller can
//! derive a per-run configuration without touching the original.

use std::path::PathBuf;

use crate::server::error::config::ConfigError;

/// Settings of the application object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root directory of static assets
    pub static_path: PathBuf,
    /// Root directory of page templates
    pub template_path: PathBuf,
    /// Secret used to sign session cookies, sessions are disabled without one
    pub cookie_secret: Option<String>,
    /// Whether rendered template output is HTML-escaped
    pub autoescape: bool,
}

impl Settings {
    /// Creates settings with the given roots, no cookie secret and escaping enabled.
    pub fn new(static_path: impl Into<PathBuf>, template_path: impl Into<PathBuf>) -> Self {
        Self {
            static_path: static_path.into(),
            template_path: template_path.into(),
            cookie_secret: None,
            autoescape: true,
        }
    }

    /// Returns a copy with the session cookie signing secret set.
    pub fn with_cookie_secret(mut self, secret: impl Into<String>) -> Self {
        self.cookie_secret = Some(secret.into());
        self
    }

    /// Returns a copy with the given escaping policy.
    pub fn with_autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }
}

/// Identity used when announcing pushes on IRC.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IrcSettings {
    /// Nickname of the announcement bot
    pub nickname: String,
    /// Channel announcements are sent to, without the leading `#`
    pub channel: String,
}

impl IrcSettings {
    /// Creates IRC settings from a nickname and channel
    pub fn new(nickname: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            channel: channel.into(),
        }
    }
}

/// Location of the application serving the JSON API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiAppSettings {
    /// Host name of the API application
    pub domain: String,
    /// Port of the API application
    pub port: u16,
}

impl ApiAppSettings {
    /// Creates API endpoint settings from a host and port
    pub fn new(domain: impl Into<String>, port: u16) -> Self {
        Self {
            domain: domain.into(),
            port,
        }
    }

    /// Base URL of the API application, e.g. `http://localhost:8080`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.domain, self.port)
    }
}

impl Default for ApiAppSettings {
    fn default() -> Self {
        Self::new("localhost", 8080)
    }
}

/// Settings of the services the application depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Connection string of the database
    pub db_uri: String,
    /// IRC announcement identity
    pub irc: IrcSettings,
    /// Where the JSON API is served
    pub api_app: ApiAppSettings,
}

impl ServiceSettings {
    /// Returns a copy pointing at another database.
    pub fn with_db_uri(mut self, db_uri: impl Into<String>) -> Self {
        self.db_uri = db_uri.into();
        self
    }

    /// Returns a copy with another IRC identity.
    pub fn with_irc(mut self, irc: IrcSettings) -> Self {
        self.irc = irc;
        self
    }

    /// Returns a copy with another API endpoint.
    pub fn with_api_app(mut self, api_app: ApiAppSettings) -> Self {
        self.api_app = api_app;
        self
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            db_uri: "sqlite::memory:".to_string(),
            irc: IrcSettings::default(),
            api_app: ApiAppSettings::default(),
        }
    }
}

/// Complete configuration of the binary, read from the environment.
pub struct Config {
    /// Application object settings
    pub settings: Settings,
    /// Service endpoints
    pub services: ServiceSettings,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// # Required
    /// `STATIC_PATH`, `TEMPLATE_PATH`, `DATABASE_URL`, `IRC_NICKNAME`, `IRC_CHANNEL`,
    /// `API_DOMAIN`, `API_PORT`, `PORT`
    ///
    /// # Optional
    /// `COOKIE_SECRET`, sessions are disabled when unset
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError::MissingEnvVar)` - A required variable is unset
    /// - `Err(ConfigError::InvalidEnvValue)` - A port is not a valid number
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Settings::new(required("STATIC_PATH")?, required("TEMPLATE_PATH")?);
        if let Ok(secret) = std::env::var("COOKIE_SECRET") {
            settings = settings.with_cookie_secret(secret);
        }

        let services = ServiceSettings {
            db_uri: required("DATABASE_URL")?,
            irc: IrcSettings::new(required("IRC_NICKNAME")?, required("IRC_CHANNEL")?),
            api_app: ApiAppSettings::new(required("API_DOMAIN")?, port("API_PORT")?),
        };

        Ok(Self {
            settings,
            services,
            port: port("PORT")?,
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn port(var: &str) -> Result<u16, ConfigError> {
    let value = required(var)?;

    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("{value:?} is not a valid port: {e}"),
        })
}
