use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Why a bearer token could not be turned into a user id.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to decode token header: {0}")]
    MalformedHeader(#[source] jsonwebtoken::errors::Error),

    #[error("No 'kid' in token header")]
    MissingKeyId,

    #[error("Key with kid={0} not found in JWKS")]
    UnknownKey(String),

    #[error("Invalid JWK: {0}")]
    InvalidKey(String),

    #[error("Failed to fetch JWKS: {0}")]
    JwksUnavailable(#[from] reqwest::Error),

    #[error("Failed to fetch JWKS: HTTP {0}")]
    JwksStatus(reqwest::StatusCode),

    #[error("Token validation failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid UUID in sub claim: {0}")]
    InvalidSubject(#[from] uuid::Error),
}

impl AuthError {
    /// True for an otherwise valid token whose `exp` has passed.
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            AuthError::Token(e)
                if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::JwksUnavailable(_) | AuthError::JwksStatus(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.status_code() {
            StatusCode::UNAUTHORIZED => format!("Invalid token: {self}"),
            _ => {
                tracing::error!("{self}");
                "Authentication is temporarily unavailable".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message,
            "kind": "unauthorized",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_problems_are_unauthorized() {
        assert_eq!(AuthError::MissingKeyId.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::UnknownKey("k1".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn jwks_outage_is_not_blamed_on_the_caller() {
        let err = AuthError::JwksStatus(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.is_expired());
    }
}
