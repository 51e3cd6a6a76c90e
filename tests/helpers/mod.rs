//! Test helpers module
//!
//! Database and cache setup, the application test context and payload builders shared
//! by the integration tests.

#![allow(dead_code)]

pub mod cache_helper;
pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use cache_helper::*;
pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;

/// Build a test context or skip the calling test when no database is available
#[macro_export]
macro_rules! context_or_skip {
    () => {
        match $crate::helpers::TestContext::new().await {
            Some(ctx) => ctx,
            None => return,
        }
    };
}
