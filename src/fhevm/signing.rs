// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permit signers.
//!
//! Local keys are loaded from PEM (SEC1 or PKCS#8) or hex and signed with
//! alloy's [`PrivateKeySigner`]. Wallets and remote signers plug in through
//! [`SignerFn`].

use std::future::Future;
use std::path::Path;

use alloy::dyn_abi::TypedData;
use alloy::primitives::Bytes;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use k256::SecretKey;

use super::engine::BoxFuture;
use super::error::SignerError;
use super::permit::PermitSigner;

impl PermitSigner for PrivateKeySigner {
    fn sign_permit<'a>(
        &'a self,
        typed_data: &'a TypedData,
    ) -> BoxFuture<'a, Result<Bytes, SignerError>> {
        Box::pin(async move {
            let hash = typed_data
                .eip712_signing_hash()
                .map_err(|e| SignerError::new(format!("Invalid typed data: {}", e)))?;
            let signature = self
                .sign_hash_sync(&hash)
                .map_err(|e| SignerError::new(e.to_string()))?;
            Ok(Bytes::from(signature.as_bytes().to_vec()))
        })
    }
}

/// Adapter turning an async closure over the typed data into a
/// [`PermitSigner`].
///
/// ```ignore
/// let signer = SignerFn(|typed: TypedData| async move { wallet.sign(typed).await });
/// ```
pub struct SignerFn<F>(pub F);

impl<F, Fut> PermitSigner for SignerFn<F>
where
    F: Fn(TypedData) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Bytes, SignerError>> + Send + 'static,
{
    fn sign_permit<'a>(
        &'a self,
        typed_data: &'a TypedData,
    ) -> BoxFuture<'a, Result<Bytes, SignerError>> {
        Box::pin((self.0)(typed_data.clone()))
    }
}

/// Parse a PEM private key (SEC1 `EC PRIVATE KEY` or PKCS#8 `PRIVATE KEY`)
/// into a secp256k1 secret key.
fn secret_key_from_pem(pem_bytes: &[u8]) -> Result<SecretKey, SignerError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| SignerError::new(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str).map_err(|e| SignerError::new(format!("Invalid PEM: {}", e)))?;

    SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| {
            use k256::pkcs8::DecodePrivateKey;
            SecretKey::from_pkcs8_der(pem.contents())
        })
        .map_err(|e| SignerError::new(format!("Invalid key format: {}", e)))
}

/// Create a signer from a PEM-encoded private key.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, SignerError> {
    let secret_key = secret_key_from_pem(pem_bytes)?;
    PrivateKeySigner::from_slice(&secret_key.to_bytes())
        .map_err(|e| SignerError::new(format!("Invalid private key: {}", e)))
}

/// Create a signer from a PEM file on disk.
pub fn signer_from_pem_file(path: impl AsRef<Path>) -> Result<PrivateKeySigner, SignerError> {
    let path = path.as_ref();
    let pem_bytes = std::fs::read(path).map_err(|e| {
        SignerError::new(format!("Failed to read {}: {}", path.display(), e))
    })?;
    signer_from_pem(&pem_bytes)
}

/// Create a signer from a hex private key, with or without `0x`.
pub fn signer_from_hex(private_key: &str) -> Result<PrivateKeySigner, SignerError> {
    private_key
        .parse()
        .map_err(|e| SignerError::new(format!("Invalid private key: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fhevm::permit::permit_typed_data;
    use alloy::primitives::{Address, Signature};
    use k256::pkcs8::{EncodePrivateKey, LineEnding};
    use std::io::Write;

    const KEY: [u8; 32] = [0x42; 32];

    fn expected_address() -> Address {
        PrivateKeySigner::from_slice(&KEY).unwrap().address()
    }

    #[test]
    fn parses_pkcs8_pem() {
        let secret = SecretKey::from_slice(&KEY).unwrap();
        let pem = secret.to_pkcs8_pem(LineEnding::LF).unwrap();

        let signer = signer_from_pem(pem.as_bytes()).unwrap();

        assert_eq!(signer.address(), expected_address());
    }

    #[test]
    fn parses_sec1_pem() {
        let secret = SecretKey::from_slice(&KEY).unwrap();
        let pem = secret.to_sec1_pem(LineEnding::LF).unwrap();

        let signer = signer_from_pem(pem.as_bytes()).unwrap();

        assert_eq!(signer.address(), expected_address());
    }

    #[test]
    fn rejects_garbage_pem() {
        let err = signer_from_pem(b"not a pem").unwrap_err();
        assert!(err.to_string().starts_with("Invalid PEM"));

        let err = signer_from_pem(&[0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().starts_with("Invalid UTF-8"));
    }

    #[test]
    fn reads_pem_file() {
        let secret = SecretKey::from_slice(&KEY).unwrap();
        let pem = secret.to_pkcs8_pem(LineEnding::LF).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(pem.as_bytes()).unwrap();

        let signer = signer_from_pem_file(file.path()).unwrap();
        assert_eq!(signer.address(), expected_address());

        let missing = file.path().with_extension("missing");
        assert!(signer_from_pem_file(missing).is_err());
    }

    #[test]
    fn parses_hex_keys() {
        let hex = alloy::hex::encode(KEY);
        assert_eq!(signer_from_hex(&hex).unwrap().address(), expected_address());
        assert_eq!(
            signer_from_hex(&format!("0x{hex}")).unwrap().address(),
            expected_address()
        );
        assert!(signer_from_hex("0x1234").is_err());
    }

    #[tokio::test]
    async fn local_signature_recovers_to_signer() {
        let signer = PrivateKeySigner::from_slice(&KEY).unwrap();
        let typed = permit_typed_data(
            11155111,
            Address::repeat_byte(0xAA),
            signer.address(),
            &Bytes::from(vec![0x01, 0x02]),
        )
        .unwrap();

        let raw = signer.sign_permit(&typed).await.unwrap();
        assert_eq!(raw.len(), 65);

        let signature = Signature::try_from(raw.as_ref()).unwrap();
        let hash = typed.eip712_signing_hash().unwrap();
        assert_eq!(
            signature.recover_address_from_prehash(&hash).unwrap(),
            signer.address()
        );
    }
}
