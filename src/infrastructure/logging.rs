//! 日志系统配置模块
//! 支持结构化日志和日志级别配置

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// 初始化日志系统
///
/// `RUST_LOG` 优先于配置中的级别。
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_ansi(true))
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_error_not_panic() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };

        let _ = init_logging(&config);
        // 全局订阅者只能设置一次
        assert!(init_logging(&config).is_err());
    }
}
