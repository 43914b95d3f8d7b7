// Cache management module
// Author: kelexine (https://github.com/kelexine)

pub mod manager;
pub mod models;

pub use manager::{resolve_binding, CacheManager};
pub use models::{CacheConfig, CacheHandle, CacheStats, ModelBinding};
