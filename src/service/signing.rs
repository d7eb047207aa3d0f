//! 钱包签名能力
//!
//! 注册流程只通过 `MessageSigner` 请求签名，不接触私钥。
//! `LocalWalletSigner` 使用本地私钥做 EIP-191 personal_sign，供命令行宿主和测试使用。

use std::str::FromStr;

use async_trait::async_trait;
use ethers::{
    signers::{LocalWallet, Signer},
    types::{Address, Signature},
    utils::to_checksum,
};

use crate::{domain::registration_request::SignatureArtifact, error::SigningError};

/// 钱包签名结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    /// 0x 前缀的 65 字节签名
    pub signature: String,
    /// 实际签名的账户地址
    pub address: String,
}

/// 已连接钱包的签名能力
#[async_trait]
pub trait MessageSigner: Send + Sync {
    async fn sign_message(&self, message: &str) -> Result<SignedMessage, SigningError>;
}

/// 基于本地私钥的签名器
pub struct LocalWalletSigner {
    wallet: LocalWallet,
}

impl LocalWalletSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    /// 从十六进制私钥创建（可带 0x 前缀）
    pub fn from_private_key(private_key: &str) -> anyhow::Result<Self> {
        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| anyhow::anyhow!("Invalid private key: {}", e))?;
        Ok(Self::new(wallet))
    }

    /// EIP-55 校验和格式的地址
    pub fn address(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }
}

#[async_trait]
impl MessageSigner for LocalWalletSigner {
    async fn sign_message(&self, message: &str) -> Result<SignedMessage, SigningError> {
        let signature = self
            .wallet
            .sign_message(message)
            .await
            .map_err(|e| SigningError::Wallet(e.to_string()))?;

        Ok(SignedMessage {
            signature: format!("0x{}", hex::encode(signature.to_vec())),
            address: self.address(),
        })
    }
}

/// 从签名结果恢复签名者地址
pub fn recover_signer(artifact: &SignatureArtifact) -> Result<Address, SigningError> {
    let signature = Signature::from_str(&artifact.hash)
        .map_err(|e| SigningError::Wallet(format!("Malformed signature: {}", e)))?;

    signature
        .recover(artifact.message.as_str())
        .map_err(|e| SigningError::Wallet(format!("Signature recovery failed: {}", e)))
}

/// 验证签名是否由指定地址产生
pub fn verify_artifact(artifact: &SignatureArtifact, address: &str) -> Result<bool, SigningError> {
    let expected = Address::from_str(address)
        .map_err(|e| SigningError::Wallet(format!("Invalid address {}: {}", address, e)))?;
    Ok(recover_signer(artifact)? == expected)
}

/// 两个地址是否指向同一账户（忽略大小写校验和差异）
pub fn same_account(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hardhat 默认账户 #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[tokio::test]
    async fn test_local_wallet_signs_and_recovers() {
        let signer = LocalWalletSigner::from_private_key(TEST_KEY).unwrap();
        assert_eq!(signer.address(), TEST_ADDRESS);

        let signed = signer.sign_message("Register ens.bico.eth").await.unwrap();
        assert!(signed.signature.starts_with("0x"));
        assert_eq!(signed.signature.len(), 2 + 65 * 2);
        assert_eq!(signed.address, TEST_ADDRESS);

        let artifact = SignatureArtifact {
            message: "Register ens.bico.eth".into(),
            hash: signed.signature,
        };
        assert!(verify_artifact(&artifact, TEST_ADDRESS).unwrap());
    }

    #[tokio::test]
    async fn test_signature_does_not_cover_other_name() {
        let signer = LocalWalletSigner::from_private_key(TEST_KEY).unwrap();
        let signed = signer.sign_message("Register ens.bico.eth").await.unwrap();

        let forged = SignatureArtifact {
            message: "Register vitalik.bico.eth".into(),
            hash: signed.signature,
        };
        assert!(!verify_artifact(&forged, TEST_ADDRESS).unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(LocalWalletSigner::from_private_key("not-a-key").is_err());

        let artifact = SignatureArtifact {
            message: "Register ens.bico.eth".into(),
            hash: "0xSIG".into(),
        };
        assert!(recover_signer(&artifact).is_err());
    }

    #[test]
    fn test_same_account() {
        assert!(same_account(
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            TEST_ADDRESS
        ));
        assert!(!same_account("0xABC", TEST_ADDRESS));
    }
}
