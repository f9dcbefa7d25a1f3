//! Where the scanner configuration comes from.
//!
//! Every source yields a [`ScannerConfig`]; any failure to fetch or decode it
//! is a [`ScanError::ConfigLoad`], which is fatal for the invocation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_appconfigdata::error::DisplayErrorContext;
use aws_sdk_appconfigdata::Client as AppConfigClient;
use reqwest::Client as HttpClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use zonescan_core::validate::{split_list, CHAR_SET_ENV_KEY};
use zonescan_core::{
    Alert, FieldSource, ProcessEnv, RequiredField, Result, ScanError, ScannerConfig,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable that routes AppConfig reads through a local agent
pub const APPCONFIG_AGENT_URL_ENV_KEY: &str = "APPCONFIG_AGENT_URL";

/// Environment variable holding the title of the environment-only alert
pub const ALERT_TITLE_ENV_KEY: &str = "ALERT_TITLE";

/// Produces the scanner configuration for one invocation
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch and decode the configuration
    async fn load(&self) -> Result<ScannerConfig>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

fn load_error(what: &str, cause: impl std::fmt::Display) -> ScanError {
    ScanError::ConfigLoad(format!("{what}: {cause}"))
}

/// Configuration stored in a local file.
///
/// Files ending in `.toml` are decoded as TOML, everything else as JSON.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_toml(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    async fn load(&self) -> Result<ScannerConfig> {
        let what = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| load_error(&what, e))?;

        if self.is_toml() {
            let text = std::str::from_utf8(&bytes).map_err(|e| load_error(&what, e))?;
            toml::from_str(text).map_err(|e| load_error(&what, e))
        } else {
            ScannerConfig::from_json_slice(&bytes)
        }
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Configuration served as JSON over HTTP
pub struct HttpSource {
    http: HttpClient,
    url: String,
    bearer_token: Option<String>,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(format!("zonescan/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScanError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: url.into(),
            bearer_token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with the request
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ConfigSource for HttpSource {
    async fn load(&self) -> Result<ScannerConfig> {
        debug!(url = %self.url, "fetching scanner configuration");

        let mut request = self.http.get(&self.url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| load_error(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(&self.url, format!("unexpected status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| load_error(&self.url, e))?;
        ScannerConfig::from_json_slice(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Configuration held in AWS AppConfig.
///
/// By default the document is fetched with the AppConfigData API: a
/// configuration session is started for the application, environment and
/// profile, and its initial token is exchanged for the latest document.
/// [`AppConfigSource::with_agent`] reads through a local AppConfig agent
/// instead.
pub struct AppConfigSource {
    application: String,
    environment: String,
    profile: String,
    backend: Backend,
}

enum Backend {
    /// AppConfigData API; the default AWS configuration is loaded when unset
    Api(Option<SdkConfig>),
    Agent(HttpSource),
}

impl AppConfigSource {
    /// Default application identifier
    pub const DEFAULT_APPLICATION: &'static str = "cloudflare-scanner";
    /// Default configuration profile
    pub const DEFAULT_PROFILE: &'static str = "default";
    /// Default environment
    pub const DEFAULT_ENVIRONMENT: &'static str = "prod";

    pub fn new(
        application: impl Into<String>,
        environment: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            application: application.into(),
            environment: environment.into(),
            profile: profile.into(),
            backend: Backend::Api(None),
        }
    }

    /// Call AppConfigData with `config` instead of the default AWS configuration
    #[must_use]
    pub fn with_sdk_config(mut self, config: SdkConfig) -> Self {
        self.backend = Backend::Api(Some(config));
        self
    }

    /// Read through the AppConfig agent listening at `agent_url`
    pub fn with_agent(mut self, agent_url: &str) -> Result<Self> {
        let url = format!(
            "{}/applications/{}/environments/{}/configurations/{}",
            agent_url.trim_end_matches('/'),
            self.application,
            self.environment,
            self.profile
        );
        self.backend = Backend::Agent(HttpSource::new(url)?);
        Ok(self)
    }

    /// Identifiers from `APPLICATION_IDENTIFIER`, `ENVIRONMENT` and
    /// `CONFIG_PROFILE_IDENTIFIER`, with defaults for unset variables.
    /// `APPCONFIG_AGENT_URL` switches to the local agent.
    pub fn from_env() -> Result<Self> {
        Self::from_fields(&ProcessEnv)
    }

    pub fn from_fields(fields: &dyn FieldSource) -> Result<Self> {
        let get = |key: &str, default: &str| fields.lookup(key).unwrap_or_else(|| default.to_string());
        let source = Self::new(
            get("APPLICATION_IDENTIFIER", Self::DEFAULT_APPLICATION),
            get("ENVIRONMENT", Self::DEFAULT_ENVIRONMENT),
            get("CONFIG_PROFILE_IDENTIFIER", Self::DEFAULT_PROFILE),
        );
        match fields.lookup(APPCONFIG_AGENT_URL_ENV_KEY) {
            Some(agent_url) => source.with_agent(&agent_url),
            None => Ok(source),
        }
    }

    /// Agent endpoint, when reading through the agent
    pub fn agent_url(&self) -> Option<&str> {
        match &self.backend {
            Backend::Agent(http) => Some(http.url()),
            Backend::Api(_) => None,
        }
    }

    async fn fetch(&self, sdk_config: Option<&SdkConfig>) -> Result<ScannerConfig> {
        let what = self.describe();
        let loaded;
        let sdk_config = match sdk_config {
            Some(config) => config,
            None => {
                loaded = aws_config::load_defaults(BehaviorVersion::latest()).await;
                &loaded
            }
        };
        let client = AppConfigClient::new(sdk_config);

        debug!(source = %what, "starting AppConfig session");
        let session = client
            .start_configuration_session()
            .application_identifier(&self.application)
            .environment_identifier(&self.environment)
            .configuration_profile_identifier(&self.profile)
            .send()
            .await
            .map_err(|e| load_error(&what, DisplayErrorContext(&e)))?;
        let token = session
            .initial_configuration_token()
            .ok_or_else(|| load_error(&what, "no initial configuration token"))?;

        let latest = client
            .get_latest_configuration()
            .configuration_token(token)
            .send()
            .await
            .map_err(|e| load_error(&what, DisplayErrorContext(&e)))?;
        let document: &[u8] = latest
            .configuration()
            .map(|blob| blob.as_ref())
            .unwrap_or_default();
        if document.is_empty() {
            return Err(load_error(&what, "empty configuration document"));
        }
        ScannerConfig::from_json_slice(document)
    }
}

#[async_trait]
impl ConfigSource for AppConfigSource {
    async fn load(&self) -> Result<ScannerConfig> {
        match &self.backend {
            Backend::Api(sdk_config) => self.fetch(sdk_config.as_ref()).await,
            Backend::Agent(http) => http.load().await,
        }
    }

    fn describe(&self) -> String {
        format!(
            "appconfig {}/{}/{}",
            self.application, self.environment, self.profile
        )
    }
}

/// A single alert described entirely by environment variables
pub struct EnvSource<F = ProcessEnv> {
    fields: F,
}

impl EnvSource {
    pub const fn new() -> Self {
        Self { fields: ProcessEnv }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FieldSource> EnvSource<F> {
    /// Read from `fields` instead of the process environment
    pub const fn with_fields(fields: F) -> Self {
        Self { fields }
    }

    fn scalar(&self, field: RequiredField) -> String {
        self.fields.lookup(field.env_key()).unwrap_or_default()
    }

    fn list(&self, field: RequiredField) -> Vec<String> {
        self.fields
            .lookup(field.env_key())
            .map(|v| split_list(&v))
            .unwrap_or_default()
    }

    fn build(&self) -> ScannerConfig {
        let alert = Alert {
            title: self
                .fields
                .lookup(ALERT_TITLE_ENV_KEY)
                .unwrap_or_else(|| "environment".to_string()),
            provider_credential: self.scalar(RequiredField::Credential),
            zone_names: self.list(RequiredField::ZoneNames),
            contains_strings: self.list(RequiredField::ContainsStrings),
            char_set: String::new(),
            return_to_address: String::new(),
            subject_text: self.scalar(RequiredField::SubjectText),
            recipient_emails: self.list(RequiredField::RecipientEmails),
        };

        ScannerConfig {
            default_char_set: self.fields.lookup(CHAR_SET_ENV_KEY).unwrap_or_default(),
            default_return_to_address: self.scalar(RequiredField::ReturnToAddress),
            alerts: vec![alert],
        }
    }
}

#[async_trait]
impl<F: FieldSource + Send + Sync> ConfigSource for EnvSource<F> {
    async fn load(&self) -> Result<ScannerConfig> {
        Ok(self.build())
    }

    fn describe(&self) -> String {
        "environment".to_string()
    }
}
