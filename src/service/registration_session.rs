//! 注册会话状态机
//!
//! 签名协调、网关提交和展示状态由同一个状态机管理：
//! - 只有防抖后名称合法且钱包已连接时才能进入 `Signing`
//! - 同一时间只允许一个签名请求
//! - `Signing -> Signed` 转换时产生唯一一次提交命令，同一签名不会重复提交
//! - 名称或钱包变化时清空签名和网关结果，过期的异步结果按尝试编号丢弃
//!
//! 状态机本身是同步的，异步调用由 `Registrar` 执行。

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::RegistrationConfig,
    domain::{
        name,
        outcome::{classify, DisplayState},
        registration_request::{build_request, ProfileFields, RegistrationRequest, SignatureArtifact},
        workflow_state::{AttemptId, AttemptSnapshot, GatewayOutcome, SigningState, SubmissionState},
    },
    error::{GatewayError, RegistrarError, SigningError},
    infrastructure::log_redact::redact_address,
};

/// 需要发送给钱包的签名请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    pub attempt: AttemptId,
    pub message: String,
    /// 发起签名时连接的地址
    pub address: String,
}

/// 需要发送给网关的提交命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCommand {
    pub attempt: AttemptId,
    pub request: RegistrationRequest,
}

/// 表单控件状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormControls {
    /// 名称和资料输入框是否可编辑
    pub inputs_enabled: bool,
    /// 注册按钮是否可点击
    pub submit_enabled: bool,
    /// 注册按钮是否显示加载中
    pub loading: bool,
}

pub struct RegistrationSession {
    config: RegistrationConfig,
    candidate: Option<String>,
    debounced: Option<String>,
    address: Option<String>,
    profile: ProfileFields,
    signing: SigningState,
    submission: SubmissionState,
    next_attempt: u64,
}

impl RegistrationSession {
    pub fn new(config: RegistrationConfig) -> Self {
        Self {
            config,
            candidate: None,
            debounced: None,
            address: None,
            profile: ProfileFields::default(),
            signing: SigningState::NoSignature,
            submission: SubmissionState::Idle,
            next_attempt: 1,
        }
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    pub fn candidate(&self) -> Option<&str> {
        self.candidate.as_deref()
    }

    pub fn debounced_name(&self) -> Option<&str> {
        self.debounced.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn profile(&self) -> &ProfileFields {
        &self.profile
    }

    pub fn signing_state(&self) -> &SigningState {
        &self.signing
    }

    pub fn submission_state(&self) -> &SubmissionState {
        &self.submission
    }

    /// 当前防抖名称对应的完整名称
    pub fn full_name(&self) -> Option<String> {
        self.debounced
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| name::full_name(n, &self.config.parent_domain))
    }

    /// 用户输入名称（每次按键）
    pub fn set_candidate(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        if self.candidate.as_deref() == Some(raw.as_str()) {
            return;
        }
        self.candidate = Some(raw);
        self.invalidate("name changed", false);
    }

    /// 防抖器发布的名称
    ///
    /// 防抖名称变化后，按旧名称发起的签名与提交全部失效。
    pub fn settle_name(&mut self, settled: impl Into<String>) {
        let settled = settled.into();
        if self.debounced.as_deref() == Some(settled.as_str()) {
            return;
        }
        self.debounced = Some(settled);
        self.invalidate("debounced name changed", false);
    }

    /// 钱包连接变化（`None` 表示断开）
    pub fn set_address(&mut self, address: Option<String>) {
        if self.address == address {
            return;
        }
        tracing::info!(
            address = %address.as_deref().map(redact_address).unwrap_or_else(|| "none".into()),
            "wallet connection changed"
        );
        self.address = address;
        // 签名绑定地址，换钱包后旧签名失效，未完成的签名请求直接放弃
        self.invalidate("wallet changed", true);
    }

    /// 更新资料字段，已发起的尝试使用发起时的快照
    pub fn set_profile(&mut self, profile: ProfileFields) {
        self.profile = profile;
    }

    /// 检查当前是否允许发起签名
    pub fn can_submit(&self) -> Result<(), RegistrarError> {
        match self.signing {
            SigningState::Signing { .. } => return Err(RegistrarError::SigningInProgress),
            SigningState::Signed { .. } => return Err(RegistrarError::AlreadySigned),
            SigningState::NoSignature => {}
        }

        if self.address.is_none() {
            return Err(RegistrarError::WalletNotConnected);
        }

        match self.debounced.as_deref() {
            None | Some("") => Err(RegistrarError::NameMissing),
            Some(n) if !name::is_valid_name(n) => Err(RegistrarError::InvalidName(n.to_string())),
            Some(_) => Ok(()),
        }
    }

    /// 用户点击注册：捕获输入快照并进入 `Signing`
    pub fn begin_signing(&mut self) -> Result<SignatureRequest, RegistrarError> {
        self.can_submit()?;

        let (label, address) = match (self.debounced.clone(), self.address.clone()) {
            (Some(label), Some(address)) => (label, address),
            _ => return Err(RegistrarError::NameMissing),
        };

        let attempt = AttemptId(self.next_attempt);
        self.next_attempt += 1;

        let full_name = name::full_name(&label, &self.config.parent_domain);
        let message = name::signing_message(&full_name);
        let snapshot = AttemptSnapshot {
            label,
            full_name,
            message: message.clone(),
            address: address.clone(),
            profile: self.profile.clone(),
        };

        tracing::info!(
            attempt = %attempt,
            name = %snapshot.full_name,
            "requesting wallet signature"
        );

        self.signing = SigningState::Signing {
            attempt,
            snapshot,
            superseded: false,
        };

        Ok(SignatureRequest {
            attempt,
            message,
            address,
        })
    }

    /// 钱包签名返回
    ///
    /// 签名成功时转换到 `Signed` 并返回唯一一次提交命令。
    pub fn on_signature(
        &mut self,
        attempt: AttemptId,
        result: Result<SignatureArtifact, SigningError>,
    ) -> Option<SubmitCommand> {
        let (snapshot, superseded) = match &self.signing {
            SigningState::Signing {
                attempt: current,
                snapshot,
                superseded,
            } if *current == attempt => (snapshot.clone(), *superseded),
            _ => {
                tracing::debug!(attempt = %attempt, "ignoring signature for inactive attempt");
                return None;
            }
        };

        if superseded {
            tracing::info!(attempt = %attempt, "discarding signature for superseded attempt");
            self.signing = SigningState::NoSignature;
            return None;
        }

        let artifact = match result {
            Ok(artifact) if artifact.message == snapshot.message => artifact,
            Ok(artifact) => {
                tracing::warn!(
                    attempt = %attempt,
                    signed = %artifact.message,
                    expected = %snapshot.message,
                    "wallet signed a different message"
                );
                self.signing = SigningState::NoSignature;
                return None;
            }
            Err(e) => {
                // 拒绝/断开/钱包错误对用户不做区分，回到签名前状态
                tracing::info!(attempt = %attempt, error = %e, "no signature obtained");
                self.signing = SigningState::NoSignature;
                return None;
            }
        };

        let request = build_request(
            &snapshot.label,
            &self.config.parent_domain,
            self.config.coin_type,
            &snapshot.address,
            &snapshot.profile,
            &artifact,
        );

        self.submission = SubmissionState::Active {
            attempt,
            full_name: snapshot.full_name.clone(),
            outcome: GatewayOutcome::Pending,
        };
        self.signing = SigningState::Signed {
            attempt,
            snapshot,
            artifact,
        };

        Some(SubmitCommand { attempt, request })
    }

    /// 网关响应返回，返回值表示结果是否被采纳
    pub fn on_gateway_response(
        &mut self,
        attempt: AttemptId,
        result: Result<Value, GatewayError>,
    ) -> bool {
        match &mut self.submission {
            SubmissionState::Active {
                attempt: current,
                outcome,
                full_name,
            } if *current == attempt && !outcome.is_terminal() => {
                *outcome = GatewayOutcome::from_result(result);
                tracing::info!(
                    attempt = %attempt,
                    name = %full_name,
                    outcome = ?outcome,
                    "registration attempt finished"
                );
                true
            }
            _ => {
                tracing::debug!(attempt = %attempt, "ignoring gateway response for inactive attempt");
                false
            }
        }
    }

    pub fn display_state(&self) -> DisplayState {
        classify(&self.signing, &self.submission, self.debounced.as_deref())
    }

    /// 注册成功后的管理页面链接
    pub fn follow_up_link(&self) -> Option<String> {
        self.display_state().follow_up_link(&self.config)
    }

    pub fn controls(&self) -> FormControls {
        FormControls {
            inputs_enabled: self.address.is_some() && !self.signing.is_signed(),
            submit_enabled: self.can_submit().is_ok(),
            loading: self.signing.is_signing() || self.submission.is_loading(),
        }
    }

    /// 清空签名和网关结果
    ///
    /// `release_signing` 为 false 时，进行中的签名请求标记为过期，结果到达时丢弃，
    /// 期间不允许发起新的签名；为 true 时直接回到 `NoSignature`，迟到的结果按尝试编号丢弃。
    fn invalidate(&mut self, reason: &str, release_signing: bool) {
        let had_state = !matches!(self.signing, SigningState::NoSignature)
            || !matches!(self.submission, SubmissionState::Idle);

        self.signing = match std::mem::replace(&mut self.signing, SigningState::NoSignature) {
            SigningState::Signing {
                attempt, snapshot, ..
            } if !release_signing => SigningState::Signing {
                attempt,
                snapshot,
                superseded: true,
            },
            _ => SigningState::NoSignature,
        };
        self.submission = SubmissionState::Idle;

        if had_state {
            tracing::info!(reason, "cleared signature and gateway result");
        }
    }
}
