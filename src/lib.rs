//! Contribution outlier scoring for small groups.
//!
//! A member's *blame metric* is the z-score of their share of the group's
//! attributed lines; the *ticket metric* is tickets assigned over tickets
//! completed. [`simulation`] characterizes the blame metric over randomly
//! generated groups.

pub mod config;
pub mod error;
pub mod ingest;
pub mod member;
pub mod metrics;
pub mod reporters;
pub mod simulation;
pub mod stats;
pub mod types;

pub use error::{MetricError, MetricResult};
pub use member::Member;
