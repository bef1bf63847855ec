use jsonwebtoken::{Algorithm, DecodingKey, TokenData, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use tracing::debug;

use super::error::AuthError;
use super::jwt::{Claims, decode_claims};

const JWKS_URL_TEMPLATE: &str = "https://{}.supabase.co/auth/v1/.well-known/jwks.json";

#[derive(Clone)]
struct JwksKeyData {
    x: String,
    y: String,
    algorithm: Algorithm,
}

#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, JwksKeyData>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        let client = reqwest::Client::new();
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        let jwks_url = JWKS_URL_TEMPLATE.replace("{}", project_ref);

        Self {
            cache,
            jwks_url,
            client,
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, AuthError> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::JwksStatus(status));
        }

        Ok(response.json().await?)
    }

    async fn get_key_data(&self, kid: &str) -> Result<JwksKeyData, AuthError> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let keys = jwks["keys"]
            .as_array()
            .ok_or_else(|| AuthError::InvalidKey("no keys in JWKS".into()))?;

        let key_data = keys
            .iter()
            .find(|k| k["kid"].as_str() == Some(kid))
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))?;

        let x = key_data["x"]
            .as_str()
            .ok_or_else(|| AuthError::InvalidKey("missing 'x'".into()))?
            .to_string();
        let y = key_data["y"]
            .as_str()
            .ok_or_else(|| AuthError::InvalidKey("missing 'y'".into()))?
            .to_string();

        let alg_str = key_data["alg"].as_str().unwrap_or("ES256");
        let algorithm = match alg_str {
            "ES256" => Algorithm::ES256,
            "ES384" => Algorithm::ES384,
            _ => Algorithm::ES256,
        };

        let key_data = JwksKeyData { x, y, algorithm };

        self.cache.insert(kid.to_string(), key_data.clone()).await;
        Ok(key_data)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let header = decode_header(token).map_err(AuthError::MalformedHeader)?;
        let kid = header.kid.clone().ok_or(AuthError::MissingKeyId)?;

        let key_data = self.get_key_data(&kid).await?;

        let decoding_key = DecodingKey::from_ec_components(&key_data.x, &key_data.y)
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        let claims = decode_claims(token, &decoding_key, key_data.algorithm)?;
        Ok(TokenData { header, claims })
    }
}
