//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ColectaError, Result};
use super::Settings;

const MIN_JWT_SECRET_BYTES: usize = 32;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    if settings.inventory.low_stock_threshold < 0 {
        return Err(ColectaError::Config(
            "Low stock threshold cannot be negative".to_string()
        ));
    }

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(ColectaError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    if config.upload_dir.is_empty() {
        return Err(ColectaError::Config(
            "Upload directory is required".to_string()
        ));
    }

    if config.max_upload_bytes == 0 {
        return Err(ColectaError::Config(
            "Max upload size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ColectaError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ColectaError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ColectaError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.enabled && config.url.is_empty() {
        return Err(ColectaError::Config(
            "Redis URL is required when Redis is enabled".to_string()
        ));
    }

    Ok(())
}

/// Validate token configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < MIN_JWT_SECRET_BYTES {
        return Err(ColectaError::Config(
            format!("JWT secret must be at least {} bytes", MIN_JWT_SECRET_BYTES)
        ));
    }

    if config.token_ttl_minutes <= 0 {
        return Err(ColectaError::Config(
            "Token TTL must be greater than 0".to_string()
        ));
    }

    if config.bootstrap_admin_username.is_some() != config.bootstrap_admin_password.is_some() {
        return Err(ColectaError::Config(
            "Bootstrap admin username and password must be set together".to_string()
        ));
    }

    Ok(())
}

/// Validate rate limit configuration
fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.enabled && config.requests_per_minute == 0 {
        return Err(ColectaError::Config(
            "Requests per minute must be greater than 0 when rate limiting is enabled".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ColectaError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ColectaError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(ColectaError::Config(
            format!("Invalid log format: {}. Valid formats: {:?}", config.format, valid_formats)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_empty_database_url() {
        let mut settings = Settings::default();
        settings.database.url.clear();
        assert_matches!(validate_settings(&settings), Err(ColectaError::Config(_)));
    }

    #[test]
    fn test_rejects_min_above_max_connections() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_short_jwt_secret() {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_half_configured_bootstrap_admin() {
        let mut settings = Settings::default();
        settings.auth.bootstrap_admin_username = Some("admin".to_string());
        assert!(validate_settings(&settings).is_err());

        settings.auth.bootstrap_admin_password = Some("admin-password".to_string());
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level_and_format() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.logging.format = "xml".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_redis_url_only_required_when_enabled() {
        let mut settings = Settings::default();
        settings.redis.url.clear();
        assert!(validate_settings(&settings).is_ok());

        settings.redis.enabled = true;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rate_limit_requires_quota() {
        let mut settings = Settings::default();
        settings.rate_limit.requests_per_minute = 0;
        assert!(validate_settings(&settings).is_err());

        settings.rate_limit.enabled = false;
        assert!(validate_settings(&settings).is_ok());
    }
}
