//! 日志脱敏
//! 钱包地址和签名在日志中只保留前后缀

use serde::Serialize;

use crate::domain::registration_request::RegistrationRequest;

/// 可脱敏trait
pub trait SensitiveRedact {
    fn redact(&self) -> String;
}

/// 脱敏十六进制字符串（显示前缀和后缀）
pub fn redact_hex_string(hex: &str, show_chars: usize) -> String {
    if hex.len() <= show_chars * 2 {
        return "*".repeat(hex.len());
    }

    let prefix = &hex[..show_chars];
    let suffix = &hex[hex.len() - show_chars..];
    format!("{}...{}", prefix, suffix)
}

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return "*".repeat(address.chars().count());
    }

    let prefix = &address[..6];
    let suffix = &address[address.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

#[derive(Debug, Serialize)]
struct RedactedRegistrationRequest<'a> {
    name: &'a str,
    addresses: Vec<(String, String)>,
    text_fields: usize,
    signature: String,
    message: &'a str,
}

impl SensitiveRedact for RegistrationRequest {
    fn redact(&self) -> String {
        let signature = if self.signature.hash.is_ascii() {
            redact_hex_string(&self.signature.hash, 10)
        } else {
            "***".to_string()
        };

        serde_json::to_string(&RedactedRegistrationRequest {
            name: &self.name,
            addresses: self
                .records
                .addresses
                .iter()
                .map(|(coin, addr)| (coin.clone(), redact_address(addr)))
                .collect(),
            text_fields: usize::from(self.records.text.description.is_some()),
            signature,
            message: &self.signature.message,
        })
        .unwrap_or_else(|_| "{ redacted }".to_string())
    }
}
