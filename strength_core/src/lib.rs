#![forbid(unsafe_code)]

//! Core domain model and business logic for the strength prescription
//! engine.
//!
//! This crate provides:
//! - Domain types (exercises, prescriptions, sessions, lift state)
//! - Exercise catalog and lift-family aliasing
//! - Direction, Magnitude, and Deload policies
//! - Progression strategies and in-session adjustment
//! - e1RM estimation and trend classification
//! - Configuration loading
//!
//! Persistence is deliberately out of scope here (spec non-goal); the
//! engine is a pure decision pipeline. `strength_cli` owns the on-disk
//! `WorkoutHistory` store.

pub mod adjustment;
pub mod catalog;
pub mod config;
pub mod deload;
pub mod direction;
pub mod e1rm;
pub mod engine;
pub mod error;
pub mod load;
pub mod logging;
pub mod magnitude;
pub mod progression;
pub mod state_update;
pub mod substitution;
pub mod types;

// Re-export commonly used types
pub use adjustment::adjust_during_session;
pub use catalog::{build_default_catalog, get_default_catalog, resolve_state_keys, Catalog, ExerciseDef};
pub use config::Config;
pub use deload::{decide_session_deload, DeloadConfig};
pub use direction::{decide_direction, DirectionPolicyConfig};
pub use e1rm::{brzycki_e1rm, classify_trend, update_rolling_e1rm};
pub use engine::{recommend_session, recommend_session_for_template, update_lift_state, SessionTemplate};
pub use error::{Error, Result};
pub use load::{Load, RoundingMode, RoundingPolicy, Unit};
pub use magnitude::{compute_magnitude, MagnitudePolicyConfig};
pub use progression::{compute_next_load, ProgressionInput, ProgressionOutput};
pub use state_update::apply_session_update;
pub use substitution::{rank_substitutes, SubstitutionCandidate};
pub use types::*;
