//! 测试辅助模块
//! 提供可编排的钱包签名器、网关替身和本地 HTTP 模拟网关

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{http::StatusCode, routing::post, Json, Router};
use bico_registrar::{
    config::{GatewayConfig, RegistrationConfig},
    domain::RegistrationRequest,
    error::{GatewayError, SigningError},
    service::{GatewayClient, MessageSigner, SignedMessage},
};
use serde_json::Value;
use tokio::sync::Notify;

pub const TEST_ADDRESS: &str = "0xABC";

pub fn test_registration_config() -> RegistrationConfig {
    RegistrationConfig {
        parent_domain: "bico.eth".into(),
        coin_type: 60,
        debounce_ms: 500,
        manager_url: "https://ens.app".into(),
    }
}

/// 签名器行为
#[derive(Clone)]
pub enum SignerBehavior {
    /// 返回固定签名
    Sign(&'static str),
    /// 用户拒绝
    Reject,
    /// 永远不返回
    Hang,
}

/// 可编排的钱包签名器
pub struct MockSigner {
    behavior: SignerBehavior,
    address: String,
    messages: Mutex<Vec<String>>,
}

impl MockSigner {
    pub fn new(behavior: SignerBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            address: TEST_ADDRESS.to_string(),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn signed_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSigner for MockSigner {
    async fn sign_message(&self, message: &str) -> Result<SignedMessage, SigningError> {
        self.messages.lock().unwrap().push(message.to_string());
        match self.behavior {
            SignerBehavior::Sign(hash) => Ok(SignedMessage {
                signature: hash.to_string(),
                address: self.address.clone(),
            }),
            SignerBehavior::Reject => Err(SigningError::Rejected),
            SignerBehavior::Hang => std::future::pending().await,
        }
    }
}

/// 可编排的网关替身，记录收到的请求
pub struct MockGateway {
    response: Result<Value, GatewayError>,
    requests: Mutex<Vec<RegistrationRequest>>,
    calls: AtomicUsize,
    /// 设置后，网关在返回前等待放行
    gate: Option<Arc<Notify>>,
}

impl MockGateway {
    pub fn new(response: Result<Value, GatewayError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    pub fn gated(response: Result<Value, GatewayError>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: Some(gate),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RegistrationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayClient for MockGateway {
    async fn register(&self, request: &RegistrationRequest) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response.clone()
    }
}

/// 启动本地模拟网关，`/api/register` 返回固定状态码和响应体
///
/// 返回网关配置和收到的请求体列表。
pub async fn spawn_http_gateway(
    status: StatusCode,
    body: Value,
) -> (GatewayConfig, Arc<Mutex<Vec<Value>>>) {
    let received: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let received_clone = received.clone();

    let app = Router::new().route(
        "/api/register",
        post(move |Json(payload): Json<Value>| {
            let received = received_clone.clone();
            let body = body.clone();
            async move {
                received.lock().unwrap().push(payload);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = GatewayConfig {
        base_url: format!("http://{}", addr),
        register_path: "/api/register".into(),
        timeout_ms: 5_000,
    };
    (config, received)
}
