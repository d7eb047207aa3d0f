//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 注册网关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub register_path: String,
    pub timeout_ms: u64,
}

/// 注册规则配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// 父域名，提交时拼接为 `<name>.<parent_domain>`
    pub parent_domain: String,
    /// 地址记录使用的币种编号（SLIP-44，60 = ETH）
    pub coin_type: u32,
    /// 名称输入的防抖窗口
    pub debounce_ms: u64,
    /// 注册成功后的名称管理页面
    pub manager_url: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:8787".into()),
            register_path: std::env::var("GATEWAY_REGISTER_PATH")
                .unwrap_or_else(|_| "/api/register".into()),
            timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            parent_domain: std::env::var("PARENT_DOMAIN").unwrap_or_else(|_| "bico.eth".into()),
            coin_type: 60,
            debounce_ms: std::env::var("NAME_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(500),
            manager_url: std::env::var("MANAGER_URL")
                .unwrap_or_else(|_| "https://ens.app".into()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl GatewayConfig {
    /// 完整的注册接口地址
    pub fn register_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.register_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RegistrationConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// 注册成功后展示的名称管理链接，如 `https://ens.app/ens.bico.eth`
    pub fn manager_link(&self, full_name: &str) -> String {
        format!("{}/{}", self.manager_url.trim_end_matches('/'), full_name)
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self::default())
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                // 文件中缺失的段落和字段回落到环境变量默认值
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if !self.gateway.base_url.starts_with("http://")
            && !self.gateway.base_url.starts_with("https://")
        {
            anyhow::bail!("GATEWAY_URL must start with http:// or https://");
        }

        if self.gateway.timeout_ms == 0 {
            anyhow::bail!("GATEWAY_TIMEOUT_MS must be greater than 0");
        }

        // 父域名的每一段都必须是合法标签
        let labels_ok = self
            .registration
            .parent_domain
            .split('.')
            .all(crate::domain::name::is_valid_name);
        if !labels_ok {
            anyhow::bail!(
                "PARENT_DOMAIN is not a valid domain: {}",
                self.registration.parent_domain
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}
