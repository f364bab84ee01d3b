// Core algorithm exports
pub mod categories;
pub mod explain;
pub mod features;
pub mod matcher;
pub mod scoring;
pub mod tuning;

pub use categories::{all_categories, find_category, Category, CATEGORIES};
pub use explain::{estimate_reach, estimate_roi, explain, MatchReason};
pub use features::{extract, ActivitySnapshot, LookupError, NoHistory, PlacementHistory};
pub use matcher::{select_top, MatchResult, Matcher};
pub use scoring::{calculate_compatibility, combine};
