//! 注册网关客户端
//!
//! `POST <gateway>/api/register`，JSON 请求体为注册请求。
//! 不做自动重试：已签名的注册请求在用户不知情时重发可能导致重复提交。

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::GatewayConfig,
    domain::registration_request::RegistrationRequest,
    error::GatewayError,
    infrastructure::log_redact::SensitiveRedact,
};

/// 网关提交能力
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// 提交注册请求，2xx 返回响应体（空响应体为 `Value::Null`）
    async fn register(&self, request: &RegistrationRequest) -> Result<Value, GatewayError>;
}

/// 基于 reqwest 的网关客户端
pub struct HttpGateway {
    register_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            register_url: config.register_url(),
            client: reqwest::Client::builder()
                .timeout(config.timeout())
                .build()
                .context("Failed to create HTTP client")?,
        })
    }

    pub fn register_url(&self) -> &str {
        &self.register_url
    }
}

#[async_trait]
impl GatewayClient for HttpGateway {
    async fn register(&self, request: &RegistrationRequest) -> Result<Value, GatewayError> {
        tracing::info!(
            url = %self.register_url,
            name = %request.name,
            "submitting registration to gateway"
        );
        tracing::debug!(request = %request.redact(), "registration request body");

        let response = self
            .client
            .post(&self.register_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = GatewayError::from_response(status.as_u16(), &body);
            if err.is_conflict() {
                tracing::warn!(name = %request.name, "gateway reported name conflict");
            } else {
                tracing::error!(status = %status, body = %body, "gateway rejected registration");
            }
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        // 响应体格式由网关决定，非 JSON 时原样保留为字符串
        let value = serde_json::from_str(&body).unwrap_or(Value::String(body));
        tracing::info!(name = %request.name, "gateway accepted registration");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_url_from_config() {
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:8787/".into(),
            register_path: "api/register".into(),
            timeout_ms: 1000,
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(gateway.register_url(), "http://127.0.0.1:8787/api/register");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_network_error() {
        // 端口 9 (discard) 一般没有监听
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:9".into(),
            register_path: "/api/register".into(),
            timeout_ms: 1000,
        };
        let gateway = HttpGateway::new(&config).unwrap();
        let request: RegistrationRequest = serde_json::from_value(serde_json::json!({
            "name": "ens.bico.eth",
            "records": { "addresses": { "60": "0xABC" }, "text": {} },
            "signature": { "hash": "0xSIG", "message": "Register ens.bico.eth" }
        }))
        .unwrap();

        let err = gateway.register(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }
}
