//! パスワードハッシュ化のユニットテスト

use flag_service::auth::password::{PasswordHasher, MAX_PASSWORD_BYTES};

#[test]
fn test_hash_and_verify_roundtrip() {
    let hasher = PasswordHasher::new(4);
    let digest = hasher.hash("correct horse").unwrap();

    assert!(hasher.verify("correct horse", &digest).unwrap());
    assert!(!hasher.verify("wrong horse", &digest).unwrap());
}

#[test]
fn test_same_password_produces_distinct_digests() {
    let hasher = PasswordHasher::new(4);
    let first = hasher.hash("pw1").unwrap();
    let second = hasher.hash("pw1").unwrap();

    // ソルトが異なるためダイジェストも異なる
    assert_ne!(first, second);
    assert!(hasher.verify("pw1", &first).unwrap());
    assert!(hasher.verify("pw1", &second).unwrap());
}

#[test]
fn test_digest_never_contains_plaintext() {
    let hasher = PasswordHasher::new(4);
    let digest = hasher.hash("plaintext-marker").unwrap();
    assert!(!digest.contains("plaintext-marker"));
}

#[test]
fn test_verify_with_corrupted_digest_is_error() {
    let hasher = PasswordHasher::new(4);
    assert!(hasher.verify("pw1", "not-a-bcrypt-digest").is_err());
}

#[test]
fn test_hash_accepts_limit_length_password() {
    let hasher = PasswordHasher::new(4);
    let password = "a".repeat(MAX_PASSWORD_BYTES);
    let digest = hasher.hash(&password).unwrap();
    assert!(hasher.verify(&password, &digest).unwrap());
}
