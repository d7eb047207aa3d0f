//! Domain 模块
//!
//! 名称规则、注册请求和流程状态等纯领域模型

pub mod name;
pub mod outcome;
pub mod registration_request;
pub mod workflow_state;

// 重新导出常用类型
pub use name::{full_name, is_valid_name, signing_message};
pub use outcome::{classify, DisplayState};
pub use registration_request::{
    build_request, ProfileFields, RegistrationRequest, SignatureArtifact,
};
pub use workflow_state::{AttemptId, GatewayOutcome, SigningState, SubmissionState};
