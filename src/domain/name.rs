//! 子域名校验与规范化
//!
//! 名称语法：`^[a-z0-9-]+$`，不限制长度（长度与保留名策略由网关决定）。
//! 提交时统一拼接父域名，签名消息与请求体中的名称由同一个函数生成。

use std::sync::LazyLock;

use regex::Regex;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// 名称是否合法：非空且只包含小写字母、数字和连字符
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// 拼接完整名称：`<label>.<parent_domain>`
pub fn full_name(label: &str, parent_domain: &str) -> String {
    format!("{}.{}", label, parent_domain)
}

/// 钱包签名消息：`Register <full_name>`
pub fn signing_message(full_name: &str) -> String {
    format!("Register {}", full_name)
}
