use crate::shared::error::{SyncError, SyncResult};
use serde::Deserialize;
use std::fmt;

pub const ENV_CLIENT_ID: &str = "CLIENT-ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT-SECRET";
pub const ENV_TENANT_ID: &str = "TENANT-ID";
pub const ENV_ASSET_API_TOKEN: &str = "SNIPE-API";
pub const ENV_ASSET_BASE_URL: &str = "SNIPE-TENANT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub assets: AssetsConfig,
    pub http: HttpConfig,
}

/// Провайдер удостоверений и API службы каталога
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub login_url: String,
    pub graph_url: String,
    pub scope: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Статус "готов к выдаче"
    pub ready_to_deploy_status_id: i64,
    /// Пауза после каждой записи
    pub write_delay_ms: u64,
    /// Верхняя граница для паузы по Retry-After
    pub max_retry_after_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[directory]
login_url = "https://login.microsoft.com"
graph_url = "https://graph.microsoft.com/v1.0"
scope = "https://graph.microsoft.com/.default"

[assets]
ready_to_deploy_status_id = 2
write_delay_ms = 1000
max_retry_after_secs = 60

[http]
timeout_secs = 30
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Учётные данные из окружения (.env подгружается в main)
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub asset_api_token: String,
    /// Базовый адрес API системы учёта, например `https://assets.example.com/api/v1`
    pub asset_base_url: String,
}

impl Credentials {
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Собрать учётные данные через произвольный источник значений
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = value(ENV_CLIENT_ID);
        let client_secret = value(ENV_CLIENT_SECRET);
        let tenant_id = value(ENV_TENANT_ID);
        let asset_api_token = value(ENV_ASSET_API_TOKEN);

        let missing: Vec<&str> = [
            (ENV_CLIENT_ID, client_id.is_none()),
            (ENV_CLIENT_SECRET, client_secret.is_none()),
            (ENV_TENANT_ID, tenant_id.is_none()),
            (ENV_ASSET_API_TOKEN, asset_api_token.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key)
        .collect();

        let (Some(client_id), Some(client_secret), Some(tenant_id), Some(asset_api_token)) =
            (client_id, client_secret, tenant_id, asset_api_token)
        else {
            return Err(SyncError::Config(format!(
                "Environment variables are not set or empty: {}",
                missing.join(", ")
            )));
        };

        // Адрес системы учёта не проверяется: ошибка проявится на первом запросе
        let asset_base_url = lookup(ENV_ASSET_BASE_URL).unwrap_or_default();
        if asset_base_url.trim().is_empty() {
            tracing::warn!("{} is not set", ENV_ASSET_BASE_URL);
        }

        Ok(Self {
            client_id,
            client_secret,
            tenant_id,
            asset_api_token,
            asset_base_url: asset_base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("asset_api_token", &"***")
            .field("asset_base_url", &self.asset_base_url)
            .finish()
    }
}
