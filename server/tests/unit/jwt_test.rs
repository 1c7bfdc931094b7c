//! JWT発行・検証のユニットテスト

use chrono::Duration;
use flag_service::auth::jwt::{TokenIssuer, TokenValidator};
use flag_service_common::error::TokenError;

const SECRET: &str = "unit-test-secret-for-token-validation-00";

const BASE64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// 署名部の先頭文字の1ビットを反転する
fn flip_signature_bit(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<u8> = signature.bytes().collect();
    let index = BASE64URL.iter().position(|&c| c == chars[0]).unwrap();
    chars[0] = BASE64URL[index ^ 1];
    format!("{}.{}", head, String::from_utf8(chars).unwrap())
}

#[test]
fn test_valid_token_yields_subject() {
    let issuer = TokenIssuer::new(SECRET, Duration::hours(24));
    let token = issuer.issue("alice").unwrap();

    let claims = TokenValidator::new(SECRET).validate(&token).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
}

#[test]
fn test_expired_token_is_rejected() {
    // Given: 有効期限が過去のトークン
    let issuer = TokenIssuer::new(SECRET, Duration::seconds(-30));
    let token = issuer.issue("alice").unwrap();

    // When/Then: Expired
    let result = TokenValidator::new(SECRET).validate(&token);
    assert_eq!(result, Err(TokenError::Expired));
}

#[test]
fn test_single_bit_signature_change_is_rejected() {
    let issuer = TokenIssuer::new(SECRET, Duration::hours(1));
    let token = issuer.issue("alice").unwrap();
    let tampered = flip_signature_bit(&token);
    assert_ne!(token, tampered);

    let result = TokenValidator::new(SECRET).validate(&tampered);
    assert_eq!(result, Err(TokenError::InvalidSignature));
}

#[test]
fn test_tampered_payload_is_rejected() {
    let issuer = TokenIssuer::new(SECRET, Duration::hours(1));
    let alice = issuer.issue("alice").unwrap();
    let bob = issuer.issue("bob").unwrap();

    // aliceの署名にbobのペイロードを組み合わせる
    let alice_parts: Vec<&str> = alice.split('.').collect();
    let bob_parts: Vec<&str> = bob.split('.').collect();
    let forged = format!("{}.{}.{}", alice_parts[0], bob_parts[1], alice_parts[2]);

    let result = TokenValidator::new(SECRET).validate(&forged);
    assert_eq!(result, Err(TokenError::InvalidSignature));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let issuer = TokenIssuer::new("another-secret-entirely-different-000", Duration::hours(1));
    let token = issuer.issue("alice").unwrap();

    let result = TokenValidator::new(SECRET).validate(&token);
    assert_eq!(result, Err(TokenError::InvalidSignature));
}

#[test]
fn test_malformed_tokens_are_rejected() {
    let validator = TokenValidator::new(SECRET);

    for token in ["", "abc", "a.b", "a.b.c", "not a token at all"] {
        assert!(
            matches!(validator.validate(token), Err(TokenError::Malformed(_))),
            "token {:?} should be malformed",
            token
        );
    }
}
