pub mod aggregate;
pub mod model;
pub mod normalize;

pub use aggregate::{
    aggregate, AggregatePolicy, Aggregation, Badge, SelfPairRule,
    SpecialPlacement, TotalSource, MAX_BADGES, SPECIAL_BADGES,
};
pub use model::{CourseEntry, UserStats, UNKNOWN_LANGUAGE};
pub use normalize::normalize;
