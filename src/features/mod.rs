//! Feature extraction
//!
//! Converts two rosters into the model-ready stat difference vector.

pub mod team_diff;

pub use team_diff::{build_features, FeatureVector, FEATURE_SCHEMA};
