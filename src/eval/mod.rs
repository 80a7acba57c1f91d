//! Action evaluation.
//!
//! Describes each candidate action as a feature vector built from a
//! one-step lookahead and territorial race analysis, then scores it as a
//! weighted linear combination.

pub mod features;
pub mod safety;
pub mod scoring;

pub use features::{Extractor, Feature, FeatureSet, FeatureVector, ALL_FEATURES};
pub use safety::{
    closest_cell_and_distance, count_capturable, count_unguarded, count_unguarded_capsules,
    has_safe_escape, is_guarded, BorderChoice, Participant, RaceRule, SafetyPolicy,
    CAPSULE_GUARD_MARGIN, ESCAPE_HEAD_START,
};
pub use scoring::{score, select_best, WeightTable};
