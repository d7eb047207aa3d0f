//! bico-registrar - 链下子域名注册流程
//!
//! 钱包对 `Register <name>.bico.eth` 签名即可认领子域名，无需链上交易

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;

// 重新导出常用类型
pub use error::{ErrorKind, GatewayError, RegistrarError, SigningError};

pub mod prelude {
    pub use crate::{
        config::{Config, RegistrationConfig},
        domain::{DisplayState, ProfileFields, RegistrationRequest, SignatureArtifact},
        error::{GatewayError, RegistrarError, SigningError},
        service::{GatewayClient, HttpGateway, LocalWalletSigner, MessageSigner, Registrar},
    };
}
