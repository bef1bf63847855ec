use redis::{aio::ConnectionManager, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        match value {
            Some(v) => {
                let deserialized = serde_json::from_str(&v).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with optional TTL (in seconds)
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(serialized);

        if let Some(ttl) = ttl_seconds {
            cmd.arg("EX").arg(ttl);
        }

        cmd.query_async(&mut self.connection.clone()).await
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Read-through lookup. Cache failures are logged and fall back to `load`;
    /// only `load`'s error is returned.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, ttl: Duration, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache error reading {key}: {e}"),
        }

        let value = load().await?;
        if let Err(e) = self.set(key, &value, Some(ttl.as_secs())).await {
            tracing::warn!("Cache error writing {key}: {e}");
        }
        Ok(value)
    }

    /// Drops a key, logging instead of failing.
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            tracing::warn!("Cache error deleting {key}: {e}");
        }
    }
}

/// Cache key generators
pub mod keys {
    /// Contest detail body
    pub fn contest(id: &str) -> String {
        format!("contest:{}", id)
    }

    /// User profile response
    pub fn user(id: &str) -> String {
        format!("user:{}", id)
    }

    /// A brand's public product listing
    pub fn brand_products(brand_id: &str) -> String {
        format!("brand:{}:products", brand_id)
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub contest_ttl: Duration,
    pub user_ttl: Duration,
    pub product_list_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            contest_ttl: Duration::from_secs(600),      // 10 minutes
            user_ttl: Duration::from_secs(900),         // 15 minutes
            product_list_ttl: Duration::from_secs(120), // 2 minutes
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            contest_ttl: parse_duration_secs("CACHE_TTL_CONTESTS", 600),
            user_ttl: parse_duration_secs("CACHE_TTL_USERS", 900),
            product_list_ttl: parse_duration_secs("CACHE_TTL_PRODUCTS", 120),
        }
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<RedisCache>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(keys::contest("42"), "contest:42");
        assert_eq!(keys::brand_products("7"), "brand:7:products");
    }

    #[test]
    fn unparsable_ttl_falls_back_to_default() {
        assert_eq!(
            parse_duration_secs("CACHE_TTL_SURELY_UNSET_IN_TESTS", 42),
            Duration::from_secs(42)
        );
    }
}
