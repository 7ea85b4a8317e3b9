mod cache;
mod lru;

pub use cache::{ResponseCache, DEFAULT_CACHE_BYTES};
pub use lru::LruMap;
