//! Token decoding and claim helpers.
//!
//! Mints JWTs locally with an HS256 secret and decodes them through
//! `decode_claims`, the same path the JWKS validator uses once it has
//! resolved a key. No server, database or network is needed.
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, encode};
use uuid::Uuid;

use contest_backend::auth::AuthError;
use contest_backend::auth::jwt::{Claims, UserMetadata, decode_claims};

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims_for(sub: &str, email: &str, exp: usize, metadata: Option<UserMetadata>) -> Claims {
    Claims {
        sub: sub.to_string(),
        exp,
        iat: Some(Utc::now().timestamp() as usize),
        iss: Some("https://example.supabase.co/auth/v1".to_string()),
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: metadata,
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

fn decode(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode_claims(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        Algorithm::HS256,
    )
}

#[test]
fn valid_token_decodes() {
    let user_id = Uuid::new_v4();
    let now = Utc::now().timestamp() as usize;
    let metadata = UserMetadata {
        full_name: Some("Alice Smith".to_string()),
        name: None,
        avatar_url: Some("https://example.com/avatar.png".to_string()),
        picture: None,
        email: Some("alice@example.com".to_string()),
        email_verified: Some(true),
    };
    let token = mint(
        &claims_for(&user_id.to_string(), "alice@example.com", now + 3600, Some(metadata)),
        TEST_SECRET,
    );

    let claims = decode(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.user_email().unwrap(), "alice@example.com");
    assert_eq!(claims.display_name().unwrap(), "Alice Smith");
    assert_eq!(claims.avatar_url().unwrap(), "https://example.com/avatar.png");
}

#[test]
fn expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    // Well past the default 60s leeway.
    let token = mint(
        &claims_for(&Uuid::new_v4().to_string(), "late@example.com", now - 300, None),
        TEST_SECRET,
    );

    let err = decode(&token, TEST_SECRET).unwrap_err();
    assert!(err.is_expired(), "{err}");
}

#[test]
fn wrong_secret_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    let token = mint(
        &claims_for(&Uuid::new_v4().to_string(), "bob@example.com", now + 3600, None),
        TEST_SECRET,
    );

    let err = decode(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx").unwrap_err();
    assert!(
        matches!(&err, AuthError::Token(e) if matches!(e.kind(), ErrorKind::InvalidSignature)),
        "{err}"
    );
    assert!(!err.is_expired());
}

#[test]
fn garbage_token_is_rejected() {
    let err = decode("not.a.valid.jwt", TEST_SECRET).unwrap_err();
    assert!(matches!(err, AuthError::Token(_)));
}

#[test]
fn non_uuid_subject_is_an_error() {
    let now = Utc::now().timestamp() as usize;
    let claims = claims_for("service-account", "svc@example.com", now + 3600, None);
    assert!(matches!(claims.user_id(), Err(AuthError::InvalidSubject(_))));
}

#[test]
fn helpers_fall_back_without_metadata() {
    let now = Utc::now().timestamp() as usize;
    let claims = claims_for(&Uuid::new_v4().to_string(), "bare@example.com", now + 3600, None);

    assert_eq!(claims.user_email().unwrap(), "bare@example.com");
    assert!(claims.display_name().is_none());
    assert!(claims.avatar_url().is_none());
}

#[test]
fn metadata_email_used_when_top_level_missing() {
    let now = Utc::now().timestamp() as usize;
    let mut claims = claims_for(&Uuid::new_v4().to_string(), "x@example.com", now + 3600, None);
    claims.email = None;
    claims.user_metadata = Some(UserMetadata {
        full_name: None,
        name: Some("Carol".to_string()),
        avatar_url: None,
        picture: Some("https://example.com/carol.png".to_string()),
        email: Some("carol@example.com".to_string()),
        email_verified: None,
    });

    assert_eq!(claims.user_email().unwrap(), "carol@example.com");
    assert_eq!(claims.display_name().unwrap(), "Carol");
    assert_eq!(claims.avatar_url().unwrap(), "https://example.com/carol.png");
}
