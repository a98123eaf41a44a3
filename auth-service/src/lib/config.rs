use std::env;
use std::time::Duration;

use auth::TokenPolicy;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub hospital_service: HospitalServiceConfig,
    pub recovery: RecoveryConfig,
    pub provisioning: ProvisioningConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// PEM text; literal `\n` sequences are accepted for single-line env vars
    pub private_key: String,
    pub public_key: String,
    pub issuer: String,
    pub access_token_expiry: String,
    pub refresh_token_expiry: String,
    pub track_refresh_tokens: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    /// Unset keeps volatile state in process memory
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HospitalServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecoveryConfig {
    pub code_ttl_secs: u64,

    /// SMS gateway endpoint; codes are only logged when unset
    pub webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvisioningConfig {
    /// 0 disables the sweeper
    pub sweep_interval_secs: u64,
    pub stale_after_secs: u64,
}

impl JwtConfig {
    pub fn private_key_pem(&self) -> String {
        normalize_pem(&self.private_key)
    }

    pub fn public_key_pem(&self) -> String {
        normalize_pem(&self.public_key)
    }

    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            issuer: self.issuer.clone(),
            access_lifetime: self.access_token_expiry.clone(),
            refresh_lifetime: self.refresh_token_expiry.clone(),
        }
    }
}

impl HospitalServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RecoveryConfig {
    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}

impl ProvisioningConfig {
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.stale_after_secs as i64)
    }
}

fn normalize_pem(pem: &str) -> String {
    pem.replace("\\n", "\n")
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__PRIVATE_KEY, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: HOSPITAL_SERVICE__BASE_URL=http://... overrides hospital_service.base_url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
