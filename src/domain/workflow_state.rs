//! 注册流程状态
//!
//! 签名状态机：
//! ```text
//! NoSignature -> Signing -> Signed       (钱包签名成功)
//! NoSignature -> Signing -> NoSignature  (拒绝/断开/钱包错误)
//! ```
//! 提交状态机（每个签名最多一次）：
//! ```text
//! Idle -> Active(Pending) -> Active(Success | Conflict | Failure)
//! ```

use std::fmt;

use serde_json::Value;

use super::registration_request::{ProfileFields, SignatureArtifact};
use crate::error::GatewayError;

/// 一次"提交 -> 签名 -> 网关"尝试的编号，用于丢弃过期的异步结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 点击注册时一次性捕获的输入快照
///
/// 签名消息和请求体都从同一个快照构建，保证两者名称一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSnapshot {
    pub label: String,
    pub full_name: String,
    pub message: String,
    pub address: String,
    pub profile: ProfileFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningState {
    NoSignature,
    Signing {
        attempt: AttemptId,
        snapshot: AttemptSnapshot,
        /// 名称或钱包在签名期间被修改，签名结果到达后直接丢弃
        superseded: bool,
    },
    Signed {
        attempt: AttemptId,
        snapshot: AttemptSnapshot,
        artifact: SignatureArtifact,
    },
}

impl SigningState {
    pub fn is_signing(&self) -> bool {
        matches!(self, SigningState::Signing { .. })
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, SigningState::Signed { .. })
    }
}

/// 网关响应分类
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    Pending,
    Success(Value),
    Conflict,
    Failure(GatewayError),
}

impl GatewayOutcome {
    pub fn from_result(result: Result<Value, GatewayError>) -> Self {
        match result {
            Ok(body) => GatewayOutcome::Success(body),
            Err(GatewayError::Conflict) => GatewayOutcome::Conflict,
            Err(e) => GatewayOutcome::Failure(e),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GatewayOutcome::Pending)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Active {
        attempt: AttemptId,
        full_name: String,
        outcome: GatewayOutcome,
    },
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            SubmissionState::Active {
                outcome: GatewayOutcome::Pending,
                ..
            }
        )
    }
}
