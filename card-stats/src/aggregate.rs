use std::collections::{HashMap, HashSet};

use crate::model::CourseEntry;

/// Hard cap on the number of badges a card shows.
pub const MAX_BADGES: usize = 50;

/// Placeholder badge codes appended on explicit request only. Order here is
/// the display order within the special group.
pub const SPECIAL_BADGES: [&str; 3] = ["hv", "tlh", "eo"];

/// Sentinel XP for special badges. Negative so they sort after every real
/// badge when ranked by descending XP, while staying distinguishable from
/// real zero-XP entries.
pub const SPECIAL_BADGE_XP: i64 = -1;

/// Where the special group lands relative to real badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialPlacement {
    First,
    #[default]
    Last,
}

/// How to treat degenerate `learning == from` course records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfPairRule {
    #[default]
    ExcludeAll,
    Keep,
}

/// Which total XP figure the card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalSource {
    /// Sum of deduplicated per-pair maxima. Robust to upstream
    /// double-reporting of the same course under legacy field names.
    #[default]
    Recomputed,
    /// Whatever figure the upstream profile carried.
    Upstream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregatePolicy {
    pub special_placement: SpecialPlacement,
    pub self_pair: SelfPairRule,
    pub total_source: TotalSource,
}

impl AggregatePolicy {
    /// Picks the authoritative total for display.
    pub fn authoritative_total(&self, recomputed: u64, upstream_reported: u64) -> u64 {
        match self.total_source {
            TotalSource::Recomputed => recomputed,
            TotalSource::Upstream => upstream_reported,
        }
    }
}

/// One selected badge. Real badges carry the first-seen XP of their
/// learning language; specials carry the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub code: String,
    pub xp: i64,
    pub special: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub badges: Vec<Badge>,
    /// Sum of per-`(learning, from)` maxima, saturated at zero.
    pub total_xp: u64,
}

/// Collapses raw course records into a deduplicated XP total and a bounded,
/// ordered badge selection.
///
/// Duplicate `(learning, from)` pairs (platform migrations, repeated course
/// records) collapse to the maximum XP seen per pair; summing them would
/// double-count the same course.
pub fn aggregate(
    courses: &[CourseEntry],
    include_special: bool,
    policy: AggregatePolicy,
) -> Aggregation {
    let mut max_per_pair: HashMap<(&str, &str), i64> = HashMap::new();
    for course in courses {
        let slot = max_per_pair
            .entry((course.learning.as_str(), course.from.as_str()))
            .or_insert(0);
        if course.xp > *slot {
            *slot = course.xp;
        }
    }
    let total_xp = max_per_pair.values().sum::<i64>().max(0) as u64;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut real: Vec<Badge> = Vec::new();
    for course in courses {
        if course.xp <= 0 {
            continue;
        }
        if policy.self_pair == SelfPairRule::ExcludeAll && course.learning == course.from {
            continue;
        }
        if !seen.insert(course.learning.as_str()) {
            continue;
        }
        real.push(Badge {
            code: course.learning.clone(),
            xp: course.xp,
            special: false,
        });
    }
    // Stable sort: equal-XP badges keep their input order.
    real.sort_by(|a, b| b.xp.cmp(&a.xp));

    let mut badges = real;
    if include_special {
        let specials = SPECIAL_BADGES
            .iter()
            .filter(|code| !seen.contains(**code))
            .map(|code| Badge {
                code: (*code).to_string(),
                xp: SPECIAL_BADGE_XP,
                special: true,
            });
        match policy.special_placement {
            SpecialPlacement::Last => badges.extend(specials),
            SpecialPlacement::First => {
                let mut front: Vec<Badge> = specials.collect();
                front.append(&mut badges);
                badges = front;
            }
        }
    }
    badges.truncate(MAX_BADGES);

    log::debug!(
        "aggregate: {} courses -> {} badges, {} xp",
        courses.len(),
        badges.len(),
        total_xp
    );
    Aggregation { badges, total_xp }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn codes(agg: &Aggregation) -> Vec<&str> {
        agg.badges.iter().map(|b| b.code.as_str()).collect()
    }

    #[test]
    fn duplicate_pairs_never_inflate_the_total() {
        let courses = vec![
            CourseEntry::new("es", "en", 1500),
            CourseEntry::new("es", "en", 1500),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(agg.total_xp, 1500);
        assert_eq!(codes(&agg), vec!["es"]);
    }

    #[test]
    fn distinct_from_languages_count_separately() {
        // Same target language learned from two bases is two courses.
        let courses = vec![
            CourseEntry::new("es", "en", 100),
            CourseEntry::new("es", "pt", 50),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(agg.total_xp, 150);
        // ...but only one badge for the language.
        assert_eq!(codes(&agg), vec!["es"]);
    }

    #[test]
    fn max_not_sum_per_pair() {
        let courses = vec![
            CourseEntry::new("fr", "en", 200),
            CourseEntry::new("fr", "en", 800),
            CourseEntry::new("fr", "en", 300),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(agg.total_xp, 800);
    }

    #[test]
    fn zero_xp_courses_are_not_badges() {
        let courses = vec![
            CourseEntry::new("fr", "en", 300),
            CourseEntry::new("de", "en", 0),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(codes(&agg), vec!["fr"]);
        assert_eq!(agg.total_xp, 300);
    }

    #[test]
    fn badge_carries_first_seen_xp_and_sorts_descending() {
        let courses = vec![
            CourseEntry::new("fr", "en", 100),
            CourseEntry::new("es", "en", 900),
            CourseEntry::new("fr", "pt", 500),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(codes(&agg), vec!["es", "fr"]);
        // First-seen XP for fr, not the per-language max.
        assert_eq!(agg.badges[1].xp, 100);
    }

    #[test]
    fn equal_xp_keeps_input_order() {
        let courses = vec![
            CourseEntry::new("ja", "en", 400),
            CourseEntry::new("ko", "en", 400),
            CourseEntry::new("zh", "en", 400),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(codes(&agg), vec!["ja", "ko", "zh"]);
    }

    #[test]
    fn self_pairs_are_excluded_by_default() {
        let courses = vec![
            CourseEntry::new("en", "en", 50),
            CourseEntry::new("es", "en", 10),
        ];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(codes(&agg), vec!["es"]);
        // The degenerate pair still participates in the total.
        assert_eq!(agg.total_xp, 60);

        let keep = AggregatePolicy {
            self_pair: SelfPairRule::Keep,
            ..AggregatePolicy::default()
        };
        let agg = aggregate(&courses, false, keep);
        assert_eq!(codes(&agg), vec!["en", "es"]);
    }

    #[test]
    fn specials_only_appear_on_request() {
        let courses = vec![CourseEntry::new("fr", "en", 300)];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert!(agg.badges.iter().all(|b| !b.special));
        for code in SPECIAL_BADGES {
            assert!(!codes(&agg).contains(&code));
        }
    }

    #[test]
    fn specials_append_after_real_badges_by_default() {
        let courses = vec![
            CourseEntry::new("fr", "en", 300),
            CourseEntry::new("es", "en", 700),
        ];
        let agg = aggregate(&courses, true, AggregatePolicy::default());
        assert_eq!(codes(&agg), vec!["es", "fr", "hv", "tlh", "eo"]);
        assert!(agg.badges[2].special);
        assert_eq!(agg.badges[2].xp, SPECIAL_BADGE_XP);
    }

    #[test]
    fn specials_can_be_placed_first() {
        let courses = vec![CourseEntry::new("fr", "en", 300)];
        let policy = AggregatePolicy {
            special_placement: SpecialPlacement::First,
            ..AggregatePolicy::default()
        };
        let agg = aggregate(&courses, true, policy);
        assert_eq!(codes(&agg), vec!["hv", "tlh", "eo", "fr"]);
    }

    #[test]
    fn earned_special_codes_are_not_duplicated() {
        let courses = vec![CourseEntry::new("eo", "en", 120)];
        let agg = aggregate(&courses, true, AggregatePolicy::default());
        assert_eq!(codes(&agg), vec!["eo", "hv", "tlh"]);
        // The earned one is a real badge, not a placeholder.
        assert!(!agg.badges[0].special);
    }

    #[test]
    fn empty_input_is_empty_output() {
        let agg = aggregate(&[], false, AggregatePolicy::default());
        assert!(agg.badges.is_empty());
        assert_eq!(agg.total_xp, 0);
    }

    #[test]
    fn selection_is_capped_and_unique() {
        let courses: Vec<CourseEntry> = (0..80)
            .map(|i| CourseEntry::new(format!("l{i}"), "en".to_string(), 10 + i))
            .collect();
        let agg = aggregate(&courses, true, AggregatePolicy::default());
        assert_eq!(agg.badges.len(), MAX_BADGES);

        let mut unique: Vec<&str> = codes(&agg);
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), MAX_BADGES);
    }

    #[test]
    fn negative_sentinel_entries_do_not_drag_the_total_below_zero() {
        let courses = vec![CourseEntry::new("zz", "en", -1)];
        let agg = aggregate(&courses, false, AggregatePolicy::default());
        assert_eq!(agg.total_xp, 0);
        assert!(agg.badges.is_empty());
    }

    #[rstest]
    #[case(TotalSource::Recomputed, 1500, 999, 1500)]
    #[case(TotalSource::Upstream, 1500, 999, 999)]
    fn total_source_policy_selects_the_figure(
        #[case] source: TotalSource,
        #[case] recomputed: u64,
        #[case] upstream: u64,
        #[case] expected: u64,
    ) {
        let policy = AggregatePolicy {
            total_source: source,
            ..AggregatePolicy::default()
        };
        assert_eq!(policy.authoritative_total(recomputed, upstream), expected);
    }
}
