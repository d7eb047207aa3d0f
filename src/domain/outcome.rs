//! 展示状态分类
//!
//! 按固定优先级把流程状态映射为唯一的展示状态：
//! ```text
//! 1. 提交成功            -> Registered(full_name)
//! 2. 提交失败且为冲突      -> NameTaken
//! 3. 提交失败（其他原因）   -> GenericError
//! 4. 防抖后名称非空且非法   -> InvalidName
//! 5. 签名中 / 提交中       -> AwaitingSignature / Submitting
//! 6. 其他                -> NotStarted
//! ```
//! 网关终态优先于本地校验提示。

use serde::Serialize;

use super::{
    name,
    workflow_state::{GatewayOutcome, SigningState, SubmissionState},
};
use crate::config::RegistrationConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "name", rename_all = "snake_case")]
pub enum DisplayState {
    NotStarted,
    InvalidName,
    AwaitingSignature,
    Submitting,
    Registered(String),
    NameTaken,
    GenericError,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayState::NotStarted => "not_started",
            DisplayState::InvalidName => "invalid_name",
            DisplayState::AwaitingSignature => "awaiting_signature",
            DisplayState::Submitting => "submitting",
            DisplayState::Registered(_) => "registered",
            DisplayState::NameTaken => "name_taken",
            DisplayState::GenericError => "generic_error",
        }
    }

    /// 表单下方的提示文案
    pub fn helper_text(&self) -> Option<&'static str> {
        match self {
            DisplayState::InvalidName => Some("Name must be lowercase alphanumeric"),
            DisplayState::NameTaken => Some("Somebody already registered that name"),
            DisplayState::GenericError => Some("Something went wrong"),
            DisplayState::Registered(_) => Some(
                "Visit the ENS Manager to see your name. It will stop working in 24 hours.",
            ),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            DisplayState::InvalidName | DisplayState::NameTaken | DisplayState::GenericError
        )
    }

    /// 注册成功后的管理页面链接
    pub fn follow_up_link(&self, config: &RegistrationConfig) -> Option<String> {
        match self {
            DisplayState::Registered(full_name) => Some(config.manager_link(full_name)),
            _ => None,
        }
    }
}

/// 计算当前展示状态
pub fn classify(
    signing: &SigningState,
    submission: &SubmissionState,
    debounced_name: Option<&str>,
) -> DisplayState {
    if let SubmissionState::Active {
        full_name, outcome, ..
    } = submission
    {
        match outcome {
            GatewayOutcome::Success(_) => return DisplayState::Registered(full_name.clone()),
            GatewayOutcome::Conflict => return DisplayState::NameTaken,
            GatewayOutcome::Failure(_) => return DisplayState::GenericError,
            GatewayOutcome::Pending => {}
        }
    }

    if let Some(n) = debounced_name {
        if !n.is_empty() && !name::is_valid_name(n) {
            return DisplayState::InvalidName;
        }
    }

    if signing.is_signing() {
        return DisplayState::AwaitingSignature;
    }
    if submission.is_loading() {
        return DisplayState::Submitting;
    }

    DisplayState::NotStarted
}
