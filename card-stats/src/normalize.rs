use serde_json::Value;

use crate::model::{CourseEntry, UserStats, UNKNOWN_LANGUAGE};

/// Field-name fallbacks, most specific first. This module is the single
/// place raw upstream field names are inspected.
const HANDLE_FIELDS: &[&str] = &["username", "handle"];
const NAME_FIELDS: &[&str] = &["name", "fullname"];
const STREAK_FIELDS: &[&str] = &["streak", "site_streak"];
const PLUS_FIELDS: &[&str] = &["hasPlus", "has_plus"];
const TOTAL_XP_FIELDS: &[&str] = &["totalXp", "total_xp"];
const PICTURE_FIELDS: &[&str] = &["picture", "avatar"];
const POSTS_FIELDS: &[&str] = &["posts"];
const LIKES_FIELDS: &[&str] = &["likes"];
const COURSE_LIST_FIELDS: &[&str] = &["courses", "languages"];
const LEARNING_FIELDS: &[&str] = &["learningLanguage", "language"];
const FROM_FIELDS: &[&str] = &["fromLanguage", "from_language"];
const COURSE_XP_FIELDS: &[&str] = &["xp", "points"];

/// Maps a raw upstream payload into canonical stats.
///
/// Tolerates both the wrapped shape (`{"users": [{..}]}`) and a bare user
/// record, substitutes documented defaults for missing fields, and falls
/// back to all-default stats keyed by `fallback` when no user record can
/// be located at all.
pub fn normalize(raw: &Value, fallback: &str) -> UserStats {
    let record = match locate_user_record(raw) {
        Some(record) => record,
        None => {
            log::debug!("normalize: no user record in payload, defaulting to \"{fallback}\"");
            return UserStats::empty(fallback);
        }
    };

    let handle = first_str(record, HANDLE_FIELDS)
        .unwrap_or(fallback)
        .to_string();
    let display_name = first_str(record, NAME_FIELDS)
        .filter(|s| !s.is_empty())
        .unwrap_or(&handle)
        .to_string();

    UserStats {
        display_name,
        streak: first_u64(record, STREAK_FIELDS).unwrap_or(0) as u32,
        has_plus: first_bool(record, PLUS_FIELDS).unwrap_or(false),
        total_xp: first_u64(record, TOTAL_XP_FIELDS).unwrap_or(0),
        posts: first_u64(record, POSTS_FIELDS).unwrap_or(0) as u32,
        likes: first_u64(record, LIKES_FIELDS).unwrap_or(0) as u32,
        courses: course_entries(record),
        picture: first_str(record, PICTURE_FIELDS)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        handle,
    }
}

/// The modern endpoint wraps matches in a `users` array; the legacy one
/// returns the record directly.
fn locate_user_record(raw: &Value) -> Option<&Value> {
    if let Some(users) = raw.get("users").and_then(Value::as_array) {
        return users.first();
    }
    if HANDLE_FIELDS.iter().any(|f| raw.get(f).is_some()) {
        return Some(raw);
    }
    None
}

fn course_entries(record: &Value) -> Vec<CourseEntry> {
    let list = match first_array(record, COURSE_LIST_FIELDS) {
        Some(list) => list,
        None => return Vec::new(),
    };
    list.iter().filter_map(course_entry).collect()
}

fn course_entry(raw: &Value) -> Option<CourseEntry> {
    let learning = first_str(raw, LEARNING_FIELDS)?;
    let from = first_str(raw, FROM_FIELDS).unwrap_or(UNKNOWN_LANGUAGE);
    let xp = first_i64(raw, COURSE_XP_FIELDS).unwrap_or(0);
    Some(CourseEntry::new(learning, from, xp))
}

fn first_str<'a>(obj: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|f| obj.get(f).and_then(Value::as_str))
}

fn first_u64(obj: &Value, fields: &[&str]) -> Option<u64> {
    fields.iter().find_map(|f| obj.get(f).and_then(Value::as_u64))
}

fn first_i64(obj: &Value, fields: &[&str]) -> Option<i64> {
    fields.iter().find_map(|f| obj.get(f).and_then(Value::as_i64))
}

fn first_bool(obj: &Value, fields: &[&str]) -> Option<bool> {
    fields
        .iter()
        .find_map(|f| obj.get(f).and_then(Value::as_bool))
}

fn first_array<'a>(obj: &'a Value, fields: &[&str]) -> Option<&'a Vec<Value>> {
    fields
        .iter()
        .find_map(|f| obj.get(f).and_then(Value::as_array))
}
