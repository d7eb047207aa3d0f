//! 注册请求构建
//!
//! 请求体格式（与网关 `POST /api/register` 对齐）：
//! ```json
//! {
//!   "name": "ens.bico.eth",
//!   "records": {
//!     "addresses": { "60": "0x..." },
//!     "text": { "description": "..." }
//!   },
//!   "signature": { "hash": "0x...", "message": "Register ens.bico.eth" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::name;

/// 用户填写的资料字段（固定的文本记录键集合）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    /// 文本记录 `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProfileFields {
    pub const DESCRIPTION_KEY: &'static str = "description";

    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

/// 钱包返回的签名结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureArtifact {
    /// 实际签名的消息
    pub message: String,
    /// 0x 前缀的十六进制签名
    pub hash: String,
}

/// 名称记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    /// 币种编号（十进制字符串）-> 地址
    pub addresses: BTreeMap<String, String>,
    pub text: ProfileFields,
}

/// 请求中的签名部分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePayload {
    pub hash: String,
    pub message: String,
}

/// 提交给网关的注册请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub records: Records,
    pub signature: SignaturePayload,
}

/// 构建注册请求
///
/// 纯函数，不检查签名是否存在；调用方（注册会话）保证只在拿到签名后调用。
pub fn build_request(
    label: &str,
    parent_domain: &str,
    coin_type: u32,
    address: &str,
    profile: &ProfileFields,
    signature: &SignatureArtifact,
) -> RegistrationRequest {
    let mut addresses = BTreeMap::new();
    addresses.insert(coin_type.to_string(), address.to_string());

    RegistrationRequest {
        name: name::full_name(label, parent_domain),
        records: Records {
            addresses,
            text: profile.clone(),
        },
        signature: SignaturePayload {
            hash: signature.hash.clone(),
            message: signature.message.clone(),
        },
    }
}
