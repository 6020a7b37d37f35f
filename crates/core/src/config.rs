use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub email: EmailConfig,
    pub queue: QueueConfig,
    pub storage: StorageConfig,
    pub site: SiteConfig,
    pub analytics: AnalyticsConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub gateway_port: u16,
    pub dispatcher_port: u16,
    pub site_port: u16,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub endpoint: String,
    pub api_key: Option<SecretString>,
    pub source_address: String,
    pub operator_address: String,
}

#[derive(Clone, Debug)]
pub struct QueueConfig {
    pub endpoint: Option<String>,
    pub token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub bucket: String,
    pub public_domain: String,
    pub records_endpoint: Option<String>,
    pub objects_endpoint: Option<String>,
    pub api_token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub asset_dir: PathBuf,
    pub company_name: String,
    pub ga_measurement_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AnalyticsConfig {
    pub enabled: bool,
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub dispatcher_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub gateway_port: Option<u16>,
    pub dispatcher_port: Option<u16>,
    pub site_port: Option<u16>,
    pub llm_api_key: Option<String>,
    pub email_api_key: Option<String>,
    pub queue_endpoint: Option<String>,
    pub asset_dir: Option<PathBuf>,
    pub dispatcher_url: Option<String>,
    pub analytics_enabled: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                gateway_port: 8788,
                dispatcher_port: 8787,
                site_port: 8789,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4-turbo".to_string(),
                max_tokens: 256,
                temperature: 0.7,
            },
            email: EmailConfig {
                endpoint: "https://api.resend.com/emails".to_string(),
                api_key: None,
                source_address: "contact@brush-and-ladder.example".to_string(),
                operator_address: "office@brush-and-ladder.example".to_string(),
            },
            queue: QueueConfig { endpoint: None, token: None },
            storage: StorageConfig {
                bucket: "paint-uploads".to_string(),
                public_domain: "r2.cloudflarestorage.com".to_string(),
                records_endpoint: None,
                objects_endpoint: None,
                api_token: None,
            },
            site: SiteConfig {
                asset_dir: PathBuf::from("assets"),
                company_name: "Brush & Ladder Painting".to_string(),
                ga_measurement_id: None,
            },
            analytics: AnalyticsConfig { enabled: true },
            gateway: GatewayConfig { dispatcher_url: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("paintd.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Base URL the gateway proxies unmatched `/api/*` requests to. Defaults
    /// to the dispatcher listener of this same process.
    pub fn dispatcher_url(&self) -> String {
        self.gateway.dispatcher_url.clone().unwrap_or_else(|| {
            format!("http://{}:{}", self.server.bind_address, self.server.dispatcher_port)
        })
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(gateway_port) = server.gateway_port {
                self.server.gateway_port = gateway_port;
            }
            if let Some(dispatcher_port) = server.dispatcher_port {
                self.server.dispatcher_port = dispatcher_port;
            }
            if let Some(site_port) = server.site_port {
                self.server.site_port = site_port;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(max_tokens) = llm.max_tokens {
                self.llm.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
        }

        if let Some(email) = patch.email {
            if let Some(endpoint) = email.endpoint {
                self.email.endpoint = endpoint;
            }
            if let Some(api_key) = email.api_key {
                self.email.api_key = Some(secret_value(api_key));
            }
            if let Some(source_address) = email.source_address {
                self.email.source_address = source_address;
            }
            if let Some(operator_address) = email.operator_address {
                self.email.operator_address = operator_address;
            }
        }

        if let Some(queue) = patch.queue {
            if let Some(endpoint) = queue.endpoint {
                self.queue.endpoint = Some(endpoint);
            }
            if let Some(token) = queue.token {
                self.queue.token = Some(secret_value(token));
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(bucket) = storage.bucket {
                self.storage.bucket = bucket;
            }
            if let Some(public_domain) = storage.public_domain {
                self.storage.public_domain = public_domain;
            }
            if let Some(records_endpoint) = storage.records_endpoint {
                self.storage.records_endpoint = Some(records_endpoint);
            }
            if let Some(objects_endpoint) = storage.objects_endpoint {
                self.storage.objects_endpoint = Some(objects_endpoint);
            }
            if let Some(api_token) = storage.api_token {
                self.storage.api_token = Some(secret_value(api_token));
            }
        }

        if let Some(site) = patch.site {
            if let Some(asset_dir) = site.asset_dir {
                self.site.asset_dir = PathBuf::from(asset_dir);
            }
            if let Some(company_name) = site.company_name {
                self.site.company_name = company_name;
            }
            if let Some(ga_measurement_id) = site.ga_measurement_id {
                self.site.ga_measurement_id = Some(ga_measurement_id);
            }
        }

        if let Some(analytics) = patch.analytics {
            if let Some(enabled) = analytics.enabled {
                self.analytics.enabled = enabled;
            }
        }

        if let Some(gateway) = patch.gateway {
            if let Some(dispatcher_url) = gateway.dispatcher_url {
                self.gateway.dispatcher_url = Some(dispatcher_url);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PAINTD_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("PAINTD_SERVER_GATEWAY_PORT") {
            self.server.gateway_port = parse_u16("PAINTD_SERVER_GATEWAY_PORT", &value)?;
        }
        if let Some(value) = read_env("PAINTD_SERVER_DISPATCHER_PORT") {
            self.server.dispatcher_port = parse_u16("PAINTD_SERVER_DISPATCHER_PORT", &value)?;
        }
        if let Some(value) = read_env("PAINTD_SERVER_SITE_PORT") {
            self.server.site_port = parse_u16("PAINTD_SERVER_SITE_PORT", &value)?;
        }

        if let Some(value) = read_env("PAINTD_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PAINTD_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("PAINTD_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("PAINTD_LLM_MAX_TOKENS") {
            self.llm.max_tokens = parse_u32("PAINTD_LLM_MAX_TOKENS", &value)?;
        }
        if let Some(value) = read_env("PAINTD_LLM_TEMPERATURE") {
            self.llm.temperature = parse_f32("PAINTD_LLM_TEMPERATURE", &value)?;
        }

        if let Some(value) = read_env("PAINTD_EMAIL_ENDPOINT") {
            self.email.endpoint = value;
        }
        if let Some(value) = read_env("PAINTD_EMAIL_API_KEY") {
            self.email.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PAINTD_EMAIL_SOURCE_ADDRESS") {
            self.email.source_address = value;
        }
        if let Some(value) = read_env("PAINTD_EMAIL_OPERATOR_ADDRESS") {
            self.email.operator_address = value;
        }

        if let Some(value) = read_env("PAINTD_QUEUE_ENDPOINT") {
            self.queue.endpoint = Some(value);
        }
        if let Some(value) = read_env("PAINTD_QUEUE_TOKEN") {
            self.queue.token = Some(secret_value(value));
        }

        if let Some(value) = read_env("PAINTD_STORAGE_BUCKET") {
            self.storage.bucket = value;
        }
        if let Some(value) = read_env("PAINTD_STORAGE_PUBLIC_DOMAIN") {
            self.storage.public_domain = value;
        }
        if let Some(value) = read_env("PAINTD_STORAGE_RECORDS_ENDPOINT") {
            self.storage.records_endpoint = Some(value);
        }
        if let Some(value) = read_env("PAINTD_STORAGE_OBJECTS_ENDPOINT") {
            self.storage.objects_endpoint = Some(value);
        }
        if let Some(value) = read_env("PAINTD_STORAGE_API_TOKEN") {
            self.storage.api_token = Some(secret_value(value));
        }

        if let Some(value) = read_env("PAINTD_SITE_ASSET_DIR") {
            self.site.asset_dir = PathBuf::from(value);
        }
        if let Some(value) = read_env("PAINTD_SITE_COMPANY_NAME") {
            self.site.company_name = value;
        }
        if let Some(value) = read_env("PAINTD_SITE_GA_MEASUREMENT_ID") {
            self.site.ga_measurement_id = Some(value);
        }

        if let Some(value) = read_env("PAINTD_ANALYTICS_ENABLED") {
            self.analytics.enabled = parse_bool("PAINTD_ANALYTICS_ENABLED", &value)?;
        }

        if let Some(value) = read_env("PAINTD_GATEWAY_DISPATCHER_URL") {
            self.gateway.dispatcher_url = Some(value);
        }

        let log_level = read_env("PAINTD_LOGGING_LEVEL").or_else(|| read_env("PAINTD_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PAINTD_LOGGING_FORMAT").or_else(|| read_env("PAINTD_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(gateway_port) = overrides.gateway_port {
            self.server.gateway_port = gateway_port;
        }
        if let Some(dispatcher_port) = overrides.dispatcher_port {
            self.server.dispatcher_port = dispatcher_port;
        }
        if let Some(site_port) = overrides.site_port {
            self.server.site_port = site_port;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(email_api_key) = overrides.email_api_key {
            self.email.api_key = Some(secret_value(email_api_key));
        }
        if let Some(queue_endpoint) = overrides.queue_endpoint {
            self.queue.endpoint = Some(queue_endpoint);
        }
        if let Some(asset_dir) = overrides.asset_dir {
            self.site.asset_dir = asset_dir;
        }
        if let Some(dispatcher_url) = overrides.dispatcher_url {
            self.gateway.dispatcher_url = Some(dispatcher_url);
        }
        if let Some(analytics_enabled) = overrides.analytics_enabled {
            self.analytics.enabled = analytics_enabled;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_llm(&self.llm)?;
        validate_email(&self.email)?;
        validate_url_option("queue.endpoint", self.queue.endpoint.as_deref())?;
        validate_storage(&self.storage)?;
        validate_url_option("gateway.dispatcher_url", self.gateway.dispatcher_url.as_deref())?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    let ports = [
        ("server.gateway_port", server.gateway_port),
        ("server.dispatcher_port", server.dispatcher_port),
        ("server.site_port", server.site_port),
    ];
    for (name, port) in ports {
        if port == 0 {
            return Err(ConfigError::Validation(format!("{name} must be greater than zero")));
        }
    }
    if server.gateway_port == server.dispatcher_port
        || server.gateway_port == server.site_port
        || server.dispatcher_port == server.site_port
    {
        return Err(ConfigError::Validation(
            "server ports must be distinct per surface".to_string(),
        ));
    }
    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if let Some(api_key) = &llm.api_key {
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::Validation("llm.api_key must not be blank".to_string()));
        }
    }
    if !llm.base_url.starts_with("http://") && !llm.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "llm.base_url must start with http:// or https://".to_string(),
        ));
    }
    if llm.max_tokens == 0 {
        return Err(ConfigError::Validation("llm.max_tokens must be greater than zero".to_string()));
    }
    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::Validation(
            "llm.temperature must be between 0.0 and 2.0".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &EmailConfig) -> Result<(), ConfigError> {
    validate_url_option("email.endpoint", Some(&email.endpoint))?;
    for (name, address) in [
        ("email.source_address", &email.source_address),
        ("email.operator_address", &email.operator_address),
    ] {
        if !address.contains('@') {
            return Err(ConfigError::Validation(format!("{name} must be an email address")));
        }
    }
    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.bucket.trim().is_empty() {
        return Err(ConfigError::Validation("storage.bucket must not be empty".to_string()));
    }
    if storage.public_domain.trim().is_empty() {
        return Err(ConfigError::Validation("storage.public_domain must not be empty".to_string()));
    }
    validate_url_option("storage.records_endpoint", storage.records_endpoint.as_deref())?;
    validate_url_option("storage.objects_endpoint", storage.objects_endpoint.as_deref())?;
    Ok(())
}

fn validate_url_option(name: &str, value: Option<&str>) -> Result<(), ConfigError> {
    if let Some(url) = value {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "{name} must start with http:// or https://"
            )));
        }
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn resolve_config_path(requested: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = requested {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Some(value) = read_env("PAINTD_CONFIG") {
        let path = PathBuf::from(value);
        return path.exists().then_some(path);
    }
    let default = PathBuf::from("paintd.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    llm: Option<LlmPatch>,
    email: Option<EmailPatch>,
    queue: Option<QueuePatch>,
    storage: Option<StoragePatch>,
    site: Option<SitePatch>,
    analytics: Option<AnalyticsPatch>,
    gateway: Option<GatewayPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    gateway_port: Option<u16>,
    dispatcher_port: Option<u16>,
    site_port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct EmailPatch {
    endpoint: Option<String>,
    api_key: Option<String>,
    source_address: Option<String>,
    operator_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QueuePatch {
    endpoint: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    bucket: Option<String>,
    public_domain: Option<String>,
    records_endpoint: Option<String>,
    objects_endpoint: Option<String>,
    api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SitePatch {
    asset_dir: Option<String>,
    company_name: Option<String>,
    ga_measurement_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsPatch {
    enabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct GatewayPatch {
    dispatcher_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_validate() {
        let _guard = env_lock().lock().expect("env lock");
        let config = AppConfig::load(LoadOptions::default()).expect("defaults should load");
        assert_eq!(config.server.dispatcher_port, 8787);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.dispatcher_url(), "http://127.0.0.1:8787");
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let _guard = env_lock().lock().expect("env lock");
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("paintd.toml");
        fs::write(
            &path,
            r#"
[server]
dispatcher_port = 9100
gateway_port = 9101
site_port = 9102

[llm]
api_key = "sk-from-file"
model = "gpt-4o-mini"

[storage]
bucket = "jobsite-photos"

[logging]
level = "warn"
format = "json"
"#,
        )
        .expect("write config");

        let config =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .expect("config should load");

        assert_eq!(config.server.dispatcher_port, 9100);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(
            config.llm.api_key.as_ref().map(|key| key.expose_secret().to_string()),
            Some("sk-from-file".to_string())
        );
        assert_eq!(config.storage.bucket, "jobsite-photos");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn env_beats_file_and_overrides_beat_env() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("PAINTD_LOG_LEVEL", "debug");
        env::set_var("PAINTD_STORAGE_BUCKET", "bucket-from-env");

        let result = (|| {
            let dir = TempDir::new().expect("tempdir");
            let path = dir.path().join("paintd.toml");
            fs::write(
                &path,
                r#"
[storage]
bucket = "bucket-from-file"

[logging]
level = "warn"
"#,
            )
            .expect("write config");

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("error".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .expect("config should load");

            assert_eq!(config.storage.bucket, "bucket-from-env");
            assert_eq!(config.logging.level, "error");
        })();

        clear_vars(&["PAINTD_LOG_LEVEL", "PAINTD_STORAGE_BUCKET"]);
        result
    }

    #[test]
    fn invalid_numeric_env_value_is_rejected() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("PAINTD_SERVER_DISPATCHER_PORT", "not-a-port");

        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&["PAINTD_SERVER_DISPATCHER_PORT"]);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvOverride { ref key, .. })
                if key == "PAINTD_SERVER_DISPATCHER_PORT"
        ));
    }

    #[test]
    fn colliding_surface_ports_fail_validation() {
        let _guard = env_lock().lock().expect("env lock");
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                gateway_port: Some(9000),
                dispatcher_port: Some(9000),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        assert!(matches!(
            result,
            Err(ConfigError::Validation(ref message)) if message.contains("distinct")
        ));
    }

    #[test]
    fn required_file_must_exist() {
        let _guard = env_lock().lock().expect("env lock");
        let missing = PathBuf::from("/definitely/not/here/paintd.toml");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(missing.clone()),
            require_file: true,
            ..LoadOptions::default()
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(path)) if path == missing));
    }

    #[test]
    fn secrets_do_not_leak_through_debug() {
        let _guard = env_lock().lock().expect("env lock");
        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                llm_api_key: Some("sk-super-secret".to_string()),
                email_api_key: Some("re-super-secret".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config should load");

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-super-secret"));
        assert!(!debug.contains("re-super-secret"));
    }
}
