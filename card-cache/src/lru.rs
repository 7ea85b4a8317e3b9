use std::collections::HashMap;

struct Entry<K, V> {
    value: V,
    size: usize,
    newer: Option<K>,
    older: Option<K>,
}

/// Byte-bounded LRU map.
///
/// Entries form a doubly-linked list threaded through the map by key;
/// `head` is the most recently used entry, `tail` the eviction candidate.
pub struct LruMap<K, V> {
    entries: HashMap<K, Entry<K, V>>,
    head: Option<K>,
    tail: Option<K>,
    bytes_used: usize,
    max_bytes: usize,
}

impl<K, V> LruMap<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(max_bytes: usize) -> Self {
        LruMap {
            entries: HashMap::new(),
            head: None,
            tail: None,
            bytes_used: 0,
            max_bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bytes_used(&self) -> usize {
        self.bytes_used
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts an entry, evicting from the tail until it fits. An entry
    /// larger than the whole bound is refused. Returns the replaced value
    /// if the key was already present.
    pub fn push(&mut self, key: K, value: V, size: usize) -> Option<V> {
        if size > self.max_bytes {
            return None;
        }

        let replaced = self.unlink(&key).map(|e| e.value);

        while self.bytes_used + size > self.max_bytes {
            if self.pop_oldest().is_none() {
                break;
            }
        }

        self.link_front(key, value, size);
        replaced
    }

    /// Retrieves a value and promotes it to most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if self.head.as_ref() == Some(key) {
            return self.entries.get(key).map(|e| e.value.clone());
        }
        let entry = self.unlink(key)?;
        let value = entry.value.clone();
        self.link_front(key.clone(), entry.value, entry.size);
        Some(value)
    }

    /// Removes and returns the least recently used entry's key.
    pub fn pop_oldest(&mut self) -> Option<K> {
        let tail_key = self.tail.clone()?;
        self.unlink(&tail_key);
        Some(tail_key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = None;
        self.tail = None;
        self.bytes_used = 0;
    }

    /// Detaches an entry from the list and the map, undoing its size
    /// accounting.
    fn unlink(&mut self, key: &K) -> Option<Entry<K, V>> {
        let entry = self.entries.remove(key)?;
        self.bytes_used -= entry.size;

        match &entry.newer {
            Some(newer_key) => {
                if let Some(newer_entry) = self.entries.get_mut(newer_key) {
                    newer_entry.older = entry.older.clone();
                }
            }
            None => self.head = entry.older.clone(),
        }
        match &entry.older {
            Some(older_key) => {
                if let Some(older_entry) = self.entries.get_mut(older_key) {
                    older_entry.newer = entry.newer.clone();
                }
            }
            None => self.tail = entry.newer.clone(),
        }
        Some(entry)
    }

    fn link_front(&mut self, key: K, value: V, size: usize) {
        let entry = Entry {
            value,
            size,
            newer: None,
            older: self.head.clone(),
        };
        self.bytes_used += size;

        if let Some(head_key) = self.head.clone() {
            if let Some(head_entry) = self.entries.get_mut(&head_key) {
                head_entry.newer = Some(key.clone());
            }
        } else {
            self.tail = Some(key.clone());
        }
        self.head = Some(key.clone());
        self.entries.insert(key, entry);
    }
}
