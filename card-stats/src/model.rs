use serde::{Deserialize, Serialize};

/// Sentinel used when a course record does not say which language it is
/// taught from.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Canonical per-user statistics.
///
/// This is the only shape downstream stages see; all upstream schema
/// variance is absorbed before one of these is built. Instances are never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub display_name: String,
    pub handle: String,
    pub streak: u32,
    pub has_plus: bool,
    /// Upstream-reported figure. The authoritative total shown on the card
    /// is policy-selected, see `TotalSource`.
    pub total_xp: u64,
    pub posts: u32,
    pub likes: u32,
    pub courses: Vec<CourseEntry>,
    /// Avatar reference, possibly protocol-relative. Absent means the
    /// placeholder asset is used.
    pub picture: Option<String>,
}

impl UserStats {
    /// All-default stats keyed by the requested identifier, used when the
    /// raw payload carries no recognizable user record.
    pub fn empty(handle: &str) -> Self {
        Self {
            display_name: handle.to_string(),
            handle: handle.to_string(),
            streak: 0,
            has_plus: false,
            total_xp: 0,
            posts: 0,
            likes: 0,
            courses: Vec::new(),
            picture: None,
        }
    }
}

/// One raw course/language record, as normalized from upstream.
///
/// The same `(learning, from)` pair may repeat across a profile; the
/// aggregator collapses duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub learning: String,
    pub from: String,
    pub xp: i64,
}

impl CourseEntry {
    pub fn new<S: Into<String>>(learning: S, from: S, xp: i64) -> Self {
        Self {
            learning: learning.into(),
            from: from.into(),
            xp,
        }
    }
}
