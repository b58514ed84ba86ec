//! Substitution ranking support (spec §1: collaborator surface, not a
//! UI). Orders a lift's catalog substitutes by how closely they stand
//! in for the original: same movement pattern first, equipment the
//! caller actually has on hand next, then how close the strength
//! coefficient sits to parity so load doesn't need much guesswork.

use crate::catalog::Catalog;
use crate::types::{Equipment, LiftState};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// One ranked substitution candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct SubstitutionCandidate {
    pub exercise_id: String,
    pub has_history: bool,
    pub coefficient: f64,
    pub equipment: Equipment,
    pub movement_pattern_match: bool,
    pub equipment_available: bool,
}

/// Rank `exercise_id`'s catalog substitutes. Ordered by movement-pattern
/// match, then equipment availability (when `available_equipment` is
/// given), then coefficient proximity to 1.0, then existing lift-state
/// history, ties broken by id for determinism.
///
/// `available_equipment` is `None` when the caller hasn't supplied a
/// constraint — every candidate is then treated as available.
pub fn rank_substitutes(
    catalog: &Catalog,
    exercise_id: &str,
    lift_states: &HashMap<String, LiftState>,
    available_equipment: Option<&HashSet<Equipment>>,
) -> Vec<SubstitutionCandidate> {
    let target_pattern = catalog.exercises.get(exercise_id).map(|def| def.movement_pattern);

    let mut candidates: Vec<SubstitutionCandidate> = catalog
        .substitution_candidates(exercise_id)
        .into_iter()
        .map(|def| SubstitutionCandidate {
            exercise_id: def.id.clone(),
            has_history: lift_states.contains_key(&def.canonical_family_id),
            coefficient: def.coefficient,
            equipment: def.equipment,
            movement_pattern_match: Some(def.movement_pattern) == target_pattern,
            equipment_available: available_equipment
                .map(|available| available.contains(&def.equipment))
                .unwrap_or(true),
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.movement_pattern_match
            .cmp(&a.movement_pattern_match)
            .then_with(|| b.equipment_available.cmp(&a.equipment_available))
            .then_with(|| {
                coefficient_distance(a.coefficient)
                    .partial_cmp(&coefficient_distance(b.coefficient))
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| b.has_history.cmp(&a.has_history))
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });

    candidates
}

fn coefficient_distance(coefficient: f64) -> f64 {
    (coefficient - 1.0).abs()
}
