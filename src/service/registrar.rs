//! 注册流程驱动
//!
//! 把用户输入送入防抖器和会话状态机，执行状态机产生的钱包签名与网关提交。
//! 会话锁不会跨越任何异步调用持有，调用被取消时由守卫结束未完成的尝试。

use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    debounce::Debouncer,
    gateway_client::GatewayClient,
    registration_session::{FormControls, RegistrationSession},
    signing::{same_account, MessageSigner},
};
use crate::{
    config::RegistrationConfig,
    domain::{
        outcome::DisplayState,
        registration_request::{ProfileFields, SignatureArtifact},
        workflow_state::AttemptId,
    },
    error::{GatewayError, RegistrarError, SigningError},
};

fn lock_session(session: &Mutex<RegistrationSession>) -> MutexGuard<'_, RegistrationSession> {
    match session.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(), // 避免因锁污染导致 panic
    }
}

enum AttemptStage {
    Signing,
    Submitting,
}

/// 注册调用的RAII守卫
/// `register` 的 future 被丢弃（如宿主超时）时结束未完成的尝试，避免会话卡在加载状态
struct AttemptGuard<'a> {
    session: &'a Mutex<RegistrationSession>,
    attempt: AttemptId,
    stage: Option<AttemptStage>,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let Some(stage) = self.stage.take() else {
            return;
        };
        let mut session = lock_session(self.session);
        match stage {
            AttemptStage::Signing => {
                let _ = session.on_signature(self.attempt, Err(SigningError::Disconnected));
            }
            AttemptStage::Submitting => {
                session.on_gateway_response(
                    self.attempt,
                    Err(GatewayError::Network("registration cancelled".into())),
                );
            }
        }
        tracing::info!(attempt = %self.attempt, "registration call cancelled");
    }
}

pub struct Registrar {
    session: Mutex<RegistrationSession>,
    name_debouncer: Debouncer<String>,
    signer: Arc<dyn MessageSigner>,
    gateway: Arc<dyn GatewayClient>,
}

impl Registrar {
    /// 创建注册流程（需要在 tokio 运行时内调用）
    pub fn new(
        config: RegistrationConfig,
        signer: Arc<dyn MessageSigner>,
        gateway: Arc<dyn GatewayClient>,
    ) -> Self {
        Self {
            name_debouncer: Debouncer::new(config.debounce_window()),
            session: Mutex::new(RegistrationSession::new(config)),
            signer,
            gateway,
        }
    }

    /// 名称输入框变化
    pub async fn input_name(&self, raw: &str) {
        self.session().set_candidate(raw);
        self.name_debouncer.push(raw.to_string());
    }

    pub async fn set_profile(&self, profile: ProfileFields) {
        self.session().set_profile(profile);
    }

    /// 钱包连接或断开
    pub async fn connect_wallet(&self, address: Option<String>) {
        self.session().set_address(address);
    }

    /// 等待防抖名称追上当前输入
    pub async fn wait_until_settled(&self) {
        let mut rx = self.name_debouncer.subscribe();
        loop {
            let candidate = self.session().candidate().map(str::to_string);
            let Some(candidate) = candidate else {
                return;
            };
            if rx.borrow_and_update().as_deref() == Some(candidate.as_str()) {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
        self.sync_debounced();
    }

    /// 点击注册：请求签名，签名成功后自动提交到网关
    ///
    /// 返回本次调用结束时的展示状态。
    pub async fn register(&self) -> Result<DisplayState, RegistrarError> {
        self.sync_debounced();
        let request = self.session().begin_signing()?;
        let mut guard = AttemptGuard {
            session: &self.session,
            attempt: request.attempt,
            stage: Some(AttemptStage::Signing),
        };

        let result = match self.signer.sign_message(&request.message).await {
            Ok(signed) if same_account(&signed.address, &request.address) => Ok(SignatureArtifact {
                message: request.message.clone(),
                hash: signed.signature,
            }),
            // 签名期间切换了钱包账户
            Ok(_) => Err(SigningError::Disconnected),
            Err(e) => Err(e),
        };

        let command = self.session().on_signature(request.attempt, result);

        if let Some(command) = command {
            guard.stage = Some(AttemptStage::Submitting);
            let response = self.gateway.register(&command.request).await;
            self.session()
                .on_gateway_response(command.attempt, response);
        }
        guard.stage = None;

        Ok(self.display_state().await)
    }

    pub async fn display_state(&self) -> DisplayState {
        self.sync_debounced();
        self.session().display_state()
    }

    pub async fn controls(&self) -> FormControls {
        self.sync_debounced();
        self.session().controls()
    }

    pub async fn follow_up_link(&self) -> Option<String> {
        self.sync_debounced();
        self.session().follow_up_link()
    }

    /// 只读访问会话状态
    pub async fn with_session<R>(&self, f: impl FnOnce(&RegistrationSession) -> R) -> R {
        self.sync_debounced();
        f(&self.session())
    }

    fn session(&self) -> MutexGuard<'_, RegistrationSession> {
        lock_session(&self.session)
    }

    /// 把防抖器最近发布的名称同步到会话
    fn sync_debounced(&self) {
        if let Some(settled) = self.name_debouncer.latest() {
            self.session().settle_name(settled);
        }
    }
}
