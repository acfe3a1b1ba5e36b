//! Signed cookie issuance for the CDN edge.
//!
//! Policies are signed with RSA-SHA1 (PKCS#1 v1.5) and encoded with the
//! edge's cookie-safe base64 alphabet. The private key is read from disk on
//! every call so a rotated key takes effect without a restart.

use crate::policy::{next_local_midnight, resource_pattern, AccessPolicy};
use base64::Engine;
use chrono::Local;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Cookie names the edge expects.
pub const POLICY_COOKIE: &str = "CloudFront-Policy";
pub const SIGNATURE_COOKIE: &str = "CloudFront-Signature";
pub const KEY_PAIR_ID_COOKIE: &str = "CloudFront-Key-Pair-Id";

/// CDN signing errors
///
/// Messages never include key material; callers map these to 500-class
/// responses verbatim.
#[derive(Debug, Error)]
pub enum CdnError {
    #[error("Failed to read private key: {0}")]
    KeyRead(#[from] std::io::Error),

    #[error("Invalid private key: {0}")]
    KeyParse(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Failed to encode policy: {0}")]
    PolicyEncode(#[from] serde_json::Error),
}

pub type CdnResult<T> = Result<T, CdnError>;

/// The three cookie values granting playback access.
#[derive(Debug, Clone)]
pub struct SignedCookies {
    pub policy: String,
    pub signature: String,
    pub key_pair_id: String,
}

impl SignedCookies {
    /// Cookie name/value pairs in the order the edge documents them.
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (POLICY_COOKIE, self.policy.as_str()),
            (SIGNATURE_COOKIE, self.signature.as_str()),
            (KEY_PAIR_ID_COOKIE, self.key_pair_id.as_str()),
        ]
    }
}

/// Signs per-user access policies into CDN cookies.
#[derive(Clone)]
pub struct CookieSigner {
    cdn_domain: String,
    key_pair_id: String,
    private_key_path: PathBuf,
}

impl CookieSigner {
    pub fn new(
        cdn_domain: String,
        key_pair_id: String,
        private_key_path: impl Into<PathBuf>,
    ) -> Self {
        CookieSigner {
            cdn_domain,
            key_pair_id,
            private_key_path: private_key_path.into(),
        }
    }

    pub fn cdn_domain(&self) -> &str {
        &self.cdn_domain
    }

    /// Issue signed cookies granting `user_id` access to its manifest
    /// directory until the next local midnight.
    pub async fn access_cookies(&self, user_id: Uuid) -> CdnResult<SignedCookies> {
        let resource = resource_pattern(&self.cdn_domain, user_id);
        let expires = next_local_midnight(Local::now());
        let policy_json = AccessPolicy::new(resource, expires).to_json()?;

        tracing::debug!(
            user_id = %user_id,
            expires_epoch = expires,
            "Signing CDN access policy"
        );

        self.sign_policy(&policy_json).await
    }

    /// Sign an already-serialized policy document.
    ///
    /// Key material is read per call, never cached.
    pub async fn sign_policy(&self, policy_json: &str) -> CdnResult<SignedCookies> {
        let pem = tokio::fs::read_to_string(&self.private_key_path).await?;
        let key = parse_private_key(&pem)?;

        let digest = Sha1::digest(policy_json.as_bytes());
        let signature = key
            .sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
            .map_err(|e| CdnError::Signing(e.to_string()))?;

        Ok(SignedCookies {
            policy: cookie_safe_base64(policy_json.as_bytes()),
            signature: cookie_safe_base64(&signature),
            key_pair_id: self.key_pair_id.clone(),
        })
    }
}

fn parse_private_key(pem: &str) -> CdnResult<RsaPrivateKey> {
    if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| CdnError::KeyParse(e.to_string()))
    } else {
        RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| CdnError::KeyParse(e.to_string()))
    }
}

/// Standard base64 with the edge's cookie-safe substitutions
/// (`+` to `-`, `=` to `_`, `/` to `~`).
fn cookie_safe_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD
        .encode(data)
        .replace('+', "-")
        .replace('=', "_")
        .replace('/', "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};
    use rsa::RsaPublicKey;

    fn write_test_key(dir: &tempfile::TempDir) -> (RsaPrivateKey, std::path::PathBuf) {
        let key = RsaPrivateKey::new(&mut OsRng, 2048).expect("generate key");
        let pem = key.to_pkcs8_pem(LineEnding::LF).expect("encode key");
        let path = dir.path().join("private_key.pem");
        std::fs::write(&path, pem.as_bytes()).expect("write key");
        (key, path)
    }

    fn decode_cookie_value(value: &str) -> Vec<u8> {
        let standard = value
            .replace('-', "+")
            .replace('_', "=")
            .replace('~', "/");
        base64::engine::general_purpose::STANDARD
            .decode(standard)
            .expect("valid base64")
    }

    #[tokio::test]
    async fn access_cookies_carry_verifiable_signature() {
        let dir = tempfile::tempdir().unwrap();
        let (key, path) = write_test_key(&dir);
        let signer = CookieSigner::new(
            "https://cdn.example.com".to_string(),
            "KEYPAIR123".to_string(),
            path,
        );

        let user_id = Uuid::new_v4();
        let cookies = signer.access_cookies(user_id).await.unwrap();

        assert_eq!(cookies.key_pair_id, "KEYPAIR123");

        let policy_bytes = decode_cookie_value(&cookies.policy);
        let policy_json = String::from_utf8(policy_bytes.clone()).unwrap();
        assert!(policy_json
            .contains(&format!("https://cdn.example.com/users/{}/m3u8/*", user_id)));

        let signature = decode_cookie_value(&cookies.signature);
        let digest = Sha1::digest(&policy_bytes);
        RsaPublicKey::from(&key)
            .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, &signature)
            .expect("signature verifies against policy bytes");
    }

    #[tokio::test]
    async fn cookie_values_avoid_reserved_characters() {
        let dir = tempfile::tempdir().unwrap();
        let (_, path) = write_test_key(&dir);
        let signer = CookieSigner::new(
            "https://cdn.example.com".to_string(),
            "KP".to_string(),
            path,
        );

        let cookies = signer.access_cookies(Uuid::new_v4()).await.unwrap();
        for value in [&cookies.policy, &cookies.signature] {
            assert!(!value.contains('+'));
            assert!(!value.contains('='));
            assert!(!value.contains('/'));
        }
    }

    #[tokio::test]
    async fn key_rotation_takes_effect_without_restart() {
        let dir = tempfile::tempdir().unwrap();
        let (_, path) = write_test_key(&dir);
        let signer = CookieSigner::new(
            "https://cdn.example.com".to_string(),
            "KP".to_string(),
            path.clone(),
        );

        let policy = r#"{"Statement":[]}"#;
        let before = signer.sign_policy(policy).await.unwrap();

        let rotated = RsaPrivateKey::new(&mut OsRng, 2048).expect("generate key");
        let pem = rotated.to_pkcs8_pem(LineEnding::LF).expect("encode key");
        std::fs::write(&path, pem.as_bytes()).expect("rotate key");

        let after = signer.sign_policy(policy).await.unwrap();
        assert_ne!(before.signature, after.signature);

        let digest = Sha1::digest(policy.as_bytes());
        RsaPublicKey::from(&rotated)
            .verify(
                Pkcs1v15Sign::new::<Sha1>(),
                &digest,
                &decode_cookie_value(&after.signature),
            )
            .expect("second signature verifies against rotated key");
    }

    #[tokio::test]
    async fn missing_key_file_is_an_error() {
        let signer = CookieSigner::new(
            "https://cdn.example.com".to_string(),
            "KP".to_string(),
            "/nonexistent/private_key.pem",
        );

        let result = signer.access_cookies(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CdnError::KeyRead(_))));
    }

    #[tokio::test]
    async fn pkcs1_pem_is_accepted() {
        use rsa::pkcs1::EncodeRsaPrivateKey;

        let dir = tempfile::tempdir().unwrap();
        let key = RsaPrivateKey::new(&mut OsRng, 2048).expect("generate key");
        let pem = key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .expect("encode key");
        let path = dir.path().join("private_key.pem");
        std::fs::write(&path, pem.as_bytes()).expect("write key");

        let signer = CookieSigner::new(
            "https://cdn.example.com".to_string(),
            "KP".to_string(),
            path,
        );
        signer.access_cookies(Uuid::new_v4()).await.unwrap();
    }
}
