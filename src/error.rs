//! 注册流程错误类型
//!
//! 错误分类：
//! - 名称校验失败（本地处理，仅用于禁用提交并显示提示）
//! - 钱包签名被拒绝/失败（静默回到签名前状态）
//! - 网关网络错误 / 服务端错误（统一显示为通用失败）
//! - 名称冲突（显示"名称已被注册"）
//!
//! 所有错误均可通过用户重试恢复，不会导致宿主进程退出。

use serde::Deserialize;
use thiserror::Error;

/// 错误大类（与前端提示文案对齐）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    SigningDeclined,
    Network,
    Conflict,
    Server,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::SigningDeclined => "signing_declined",
            ErrorKind::Network => "network_error",
            ErrorKind::Conflict => "conflict_error",
            ErrorKind::Server => "server_error",
        }
    }
}

/// 会话拒绝用户操作时返回的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrarError {
    #[error("name must be lowercase alphanumeric: {0:?}")]
    InvalidName(String),

    #[error("no name has been entered")]
    NameMissing,

    #[error("wallet is not connected")]
    WalletNotConnected,

    #[error("a signature request is already pending")]
    SigningInProgress,

    #[error("name is already signed, change the name to start a new registration")]
    AlreadySigned,
}

impl RegistrarError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    /// 稳定的错误码
    pub fn code(&self) -> &'static str {
        match self {
            RegistrarError::InvalidName(_) => "invalid_name",
            RegistrarError::NameMissing => "name_missing",
            RegistrarError::WalletNotConnected => "wallet_not_connected",
            RegistrarError::SigningInProgress => "signing_in_progress",
            RegistrarError::AlreadySigned => "already_signed",
        }
    }
}

/// 钱包签名失败
///
/// 三种原因对用户不做区分，统一视为"未获得签名"。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("user rejected the signing request")]
    Rejected,

    #[error("wallet disconnected during signing")]
    Disconnected,

    #[error("wallet error: {0}")]
    Wallet(String),
}

impl SigningError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SigningDeclined
    }
}

/// 网关提交失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// 传输层失败（连接、超时、响应体读取）
    #[error("network error: {0}")]
    Network(String),

    /// 名称已被占用
    #[error("Conflict")]
    Conflict,

    /// 其他非 2xx 响应
    #[error("gateway returned {status}: {message}")]
    Server { status: u16, message: String },
}

/// 网关错误响应体，`error` 与 `message` 两种字段名都接受
#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GatewayError {
    /// 根据非 2xx 响应的状态码和响应体分类
    ///
    /// 优先使用状态码 409 判断冲突；响应体中 `"Conflict"` 消息作为兼容判断。
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 409 {
            return GatewayError::Conflict;
        }

        let reported = serde_json::from_str::<GatewayErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message));

        match reported {
            Some(msg) if msg == "Conflict" => GatewayError::Conflict,
            Some(msg) => GatewayError::Server {
                status,
                message: msg,
            },
            None => GatewayError::Server {
                status,
                message: if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, GatewayError::Conflict)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Network(_) => ErrorKind::Network,
            GatewayError::Conflict => ErrorKind::Conflict,
            GatewayError::Server { .. } => ErrorKind::Server,
        }
    }

    /// HTTP 状态码（网络错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Network(_) => None,
            GatewayError::Conflict => Some(409),
            GatewayError::Server { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_by_status() {
        assert_eq!(GatewayError::from_response(409, ""), GatewayError::Conflict);
        assert_eq!(
            GatewayError::from_response(409, r#"{"error":"whatever"}"#),
            GatewayError::Conflict
        );
    }

    #[test]
    fn test_conflict_by_message() {
        assert!(GatewayError::from_response(400, r#"{"error":"Conflict"}"#).is_conflict());
        assert!(GatewayError::from_response(500, r#"{"message":"Conflict"}"#).is_conflict());
        // 大小写不同不视为冲突
        assert!(!GatewayError::from_response(400, r#"{"error":"conflict"}"#).is_conflict());
    }

    #[test]
    fn test_server_error_message() {
        let err = GatewayError::from_response(500, r#"{"error":"boom"}"#);
        assert_eq!(
            err,
            GatewayError::Server {
                status: 500,
                message: "boom".into()
            }
        );
        assert_eq!(err.kind(), ErrorKind::Server);

        let err = GatewayError::from_response(502, "");
        assert_eq!(
            err,
            GatewayError::Server {
                status: 502,
                message: "HTTP 502".into()
            }
        );

        let err = GatewayError::from_response(503, "Service Unavailable\n");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(GatewayError::Network("x".into()).kind().as_str(), "network_error");
        assert_eq!(GatewayError::Conflict.kind().as_str(), "conflict_error");
        assert_eq!(SigningError::Rejected.kind(), ErrorKind::SigningDeclined);
        assert_eq!(RegistrarError::NameMissing.kind(), ErrorKind::Validation);
        assert_eq!(RegistrarError::AlreadySigned.code(), "already_signed");
    }
}
