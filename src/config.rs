use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tenant: TenantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 会话闲置多久后被清理（秒）
    #[serde(default = "default_max_idle_secs")]
    pub max_idle_secs: u64,
    /// 清理任务执行间隔（秒）
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_cookie_max_age_secs")]
    pub cookie_max_age_secs: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_idle_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    600
}

fn default_cookie_name() -> String {
    "lottery_tenant_name".to_string()
}

fn default_cookie_max_age_secs() -> i64 {
    3600 * 24 * 365
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_idle_secs: default_max_idle_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_max_age_secs: default_cookie_max_age_secs(),
        }
    }
}

impl SessionConfig {
    pub fn max_idle(&self) -> Duration {
        // 上限十年，避免溢出
        Duration::seconds(self.max_idle_secs.min(10 * 365 * 24 * 3600) as i64)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时完全依赖环境变量与默认值
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Config file {config_path} not found, using environment and defaults");
                Config::default()
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config =
            toml::from_str(config_str).map_err(|e| format!("解析配置文件失败: {e}"))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("SESSION_MAX_IDLE_SECS")
            && let Ok(n) = v.parse()
        {
            self.session.max_idle_secs = n;
        }
        if let Ok(v) = env::var("SESSION_SWEEP_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.session.sweep_interval_secs = n;
        }
        if let Ok(v) = env::var("TENANT_COOKIE_NAME") {
            self.tenant.cookie_name = v;
        }
        if let Ok(v) = env::var("TENANT_COOKIE_MAX_AGE_SECS")
            && let Ok(n) = v.parse()
        {
            self.tenant.cookie_max_age_secs = n;
        }
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.session.max_idle_secs == 0 {
            return Err("session.max_idle_secs 必须大于 0".into());
        }
        if self.session.sweep_interval_secs == 0 {
            return Err("session.sweep_interval_secs 必须大于 0".into());
        }
        if self.tenant.cookie_name.trim().is_empty() {
            return Err("tenant.cookie_name 不能为空".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.max_idle(), Duration::hours(1));
        assert_eq!(
            config.session.sweep_interval(),
            std::time::Duration::from_secs(600)
        );
        assert_eq!(config.tenant.cookie_name, "lottery_tenant_name");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [session]
            max_idle_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.session.max_idle_secs, 120);
        assert_eq!(config.session.sweep_interval_secs, 600);
        assert_eq!(config.tenant.cookie_max_age_secs, 31_536_000);
    }

    #[test]
    fn test_zero_idle_rejected() {
        let mut config = Config::default();
        config.session.max_idle_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("[server\nport = 1").is_err());
    }
}
