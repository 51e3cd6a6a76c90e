//! Redis for tests that exercise the permission cache
//!
//! Taken from `TEST_REDIS_URL` or started with testcontainers; `None` skips
//! the calling test.

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::redis::{Redis as RedisImage, REDIS_PORT};

pub struct TestRedis {
    pub url: String,
    _container: Option<ContainerAsync<RedisImage>>,
}

impl TestRedis {
    pub async fn new() -> Option<Self> {
        if let Ok(url) = std::env::var("TEST_REDIS_URL") {
            return Some(Self { url, _container: None });
        }

        let container = match RedisImage::default().start().await {
            Ok(container) => container,
            Err(e) => {
                eprintln!("skipping: set TEST_REDIS_URL or make Docker available ({})", e);
                return None;
            }
        };
        let port = container.get_host_port_ipv4(REDIS_PORT).await.ok()?;
        Some(Self {
            url: format!("redis://127.0.0.1:{}", port),
            _container: Some(container),
        })
    }
}
