//! Redis cache service
//!
//! Optional JSON cache in front of the permission lookups. When Redis is
//! disabled in the configuration every read misses and every write is a
//! no-op, so callers never branch on availability.

use redis::{AsyncCommands, Client, RedisResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RedisConfig;
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct RedisService {
    client: Option<Client>,
    prefix: String,
    ttl_seconds: u64,
}

impl RedisService {
    /// Create a new RedisService; no connection is opened until first use
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = if config.enabled {
            Some(Client::open(config.url.as_str())?)
        } else {
            None
        };

        Ok(Self {
            client,
            prefix: config.prefix.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }

    /// A service that never caches
    pub fn disabled() -> Self {
        Self {
            client: None,
            prefix: String::new(),
            ttl_seconds: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn get_connection(&self, client: &Client) -> Result<redis::aio::MultiplexedConnection> {
        Ok(client.get_multiplexed_async_connection().await?)
    }

    /// Set a value with TTL, the configured default when `ttl_seconds` is `None`
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let Some(client) = &self.client else {
            return Ok(());
        };
        let mut conn = self.get_connection(client).await?;
        let serialized = serde_json::to_string(value)?;

        let full_key = self.full_key(key);
        let ttl = ttl_seconds.unwrap_or(self.ttl_seconds);

        let _: () = conn.set_ex(&full_key, serialized, ttl).await?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let mut conn = self.get_connection(client).await?;
        let full_key = self.full_key(key);

        let result: Option<String> = conn.get(&full_key).await?;

        match result {
            Some(data) => {
                let deserialized = serde_json::from_str::<T>(&data)?;
                debug!(key = %full_key, "Value retrieved from Redis");
                Ok(Some(deserialized))
            }
            None => {
                debug!(key = %full_key, "Key not found in Redis");
                Ok(None)
            }
        }
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let Some(client) = &self.client else {
            return Ok(false);
        };
        let mut conn = self.get_connection(client).await?;
        let full_key = self.full_key(key);

        let deleted: i32 = conn.del(&full_key).await?;

        debug!(key = %full_key, deleted = deleted > 0, "Key deletion attempted");
        Ok(deleted > 0)
    }

    /// Delete all keys matching a pattern
    pub async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let Some(client) = &self.client else {
            return Ok(0);
        };
        let mut conn = self.get_connection(client).await?;
        let full_pattern = self.full_key(pattern);

        let keys: Vec<String> = conn.keys(&full_pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&keys).await?;

        info!(pattern = %full_pattern, deleted = deleted, "Keys deleted by pattern");
        Ok(deleted)
    }

    /// Ping Redis; `None` when caching is disabled
    pub async fn health_check(&self) -> Option<bool> {
        let client = self.client.as_ref()?;
        match self.get_connection(client).await {
            Ok(mut conn) => {
                let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                match result {
                    Ok(response) => {
                        debug!(response = %response, "Redis health check successful");
                        Some(response == "PONG")
                    }
                    Err(e) => {
                        warn!(error = %e, "Redis health check failed");
                        Some(false)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                Some(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_service_never_caches() {
        let service = RedisService::disabled();
        assert!(!service.is_enabled());

        tokio_test::assert_ok!(service.set("permissions:1", &vec!["eventos.gestionar"], None).await);
        let cached: Option<Vec<String>> = tokio_test::assert_ok!(service.get("permissions:1").await);
        assert!(cached.is_none());
        assert!(!tokio_test::assert_ok!(service.delete("permissions:1").await));
        assert_eq!(tokio_test::assert_ok!(service.delete_pattern("permissions:*").await), 0);
        assert_eq!(service.health_check().await, None);
    }

    #[test]
    fn test_disabled_config_opens_no_client() {
        let config = RedisConfig {
            enabled: false,
            url: "not a url".to_string(),
            prefix: "colecta:".to_string(),
            ttl_seconds: 60,
        };
        let service = RedisService::new(&config).unwrap();
        assert!(!service.is_enabled());
    }

    #[test]
    fn test_keys_are_prefixed() {
        let config = RedisConfig {
            enabled: true,
            url: "redis://127.0.0.1:6379".to_string(),
            prefix: "colecta:".to_string(),
            ttl_seconds: 60,
        };
        let service = RedisService::new(&config).unwrap();
        assert!(service.is_enabled());
        assert_eq!(service.full_key("permissions:7"), "colecta:permissions:7");
    }
}
