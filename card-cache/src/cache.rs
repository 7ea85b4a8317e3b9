use crate::lru::LruMap;

/// Default bound on cached response bytes.
pub const DEFAULT_CACHE_BYTES: usize = 4 * 1024 * 1024;

/// In-memory cache of rendered responses, keyed by normalized request.
///
/// A passive collaborator: one instance per process, injected into the
/// request handler. Only successful renders belong here; writes are
/// best-effort and a refused write is not an error.
pub struct ResponseCache {
    /// Label for logging
    label: String,
    entries: LruMap<String, String>,
}

impl ResponseCache {
    pub fn new(label: &str, max_bytes: usize) -> Self {
        log::debug!("cache/{label}: initialized with {max_bytes} bytes limit");
        Self {
            label: label.to_string(),
            entries: LruMap::new(max_bytes),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        let hit = self.entries.get(&key.to_string());
        match &hit {
            Some(_) => log::debug!("cache/{}: hit for {key}", self.label),
            None => log::debug!("cache/{}: miss for {key}", self.label),
        }
        hit
    }

    pub fn put(&mut self, key: String, body: String) {
        let size = key.len() + body.len();
        if self.entries.push(key, body, size).is_some() {
            log::debug!("cache/{}: replaced an existing entry", self.label);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
