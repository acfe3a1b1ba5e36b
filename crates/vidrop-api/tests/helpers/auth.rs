//! Seeded users and bearer tokens for integration tests.

use sqlx::PgPool;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use vidrop_api::auth::JwtService;
use vidrop_db::UserRepository;

/// JWT secret for tests (must match create_test_config).
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// Seeded user plus a bearer token for requests.
pub struct TestUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Insert a user row and issue a matching bearer token.
pub async fn create_test_user(pool: &PgPool) -> TestUser {
    let email = format!("user-{}@example.com", Uuid::new_v4());
    let user = UserRepository::new(pool.clone())
        .create(&email, Some("Test User"))
        .await
        .expect("Failed to create test user");

    TestUser {
        user_id: user.id,
        email: user.email.clone(),
        token: bearer_token(user.id, &user.email),
    }
}

/// Valid token whose subject has no row in the users table.
pub fn token_for_unknown_user() -> String {
    bearer_token(Uuid::new_v4(), "ghost@example.com")
}

fn bearer_token(user_id: Uuid, email: &str) -> String {
    JwtService::new(TEST_JWT_SECRET, 24)
        .issue(user_id, email)
        .expect("Failed to issue test token")
}

/// Write a throwaway RSA key for the CDN signer; returns its path.
pub fn write_cdn_test_key(dir: &Path) -> PathBuf {
    use rsa::pkcs8::{EncodePrivateKey, LineEnding};

    let key = rsa::RsaPrivateKey::new(&mut rand_core::OsRng, 2048).expect("generate key");
    let pem = key.to_pkcs8_pem(LineEnding::LF).expect("encode key");
    let path = dir.join("cdn_private_key.pem");
    std::fs::write(&path, pem.as_bytes()).expect("write key");
    path
}
