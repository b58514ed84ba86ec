//! Built-in session templates.
//!
//! `spec.md` treats templates as an external collaborator the host
//! supplies; this gives the CLI a small runnable default set, the same
//! spirit as `strength_core::catalog`'s default exercise catalog.

use strength_core::{Load, LoadStrategy, RepRange, SessionTemplate, SetPrescription, Unit};

fn prescription(set_count: u32, lo: u32, hi: u32, target_rir: f64, rest_seconds: u32) -> SetPrescription {
    SetPrescription::new(
        set_count,
        RepRange::new(lo, hi).expect("built-in template rep range is valid"),
        target_rir,
        rest_seconds,
        LoadStrategy::Absolute,
        Load::new(5.0, Unit::Pounds),
    )
    .expect("built-in template prescription is valid")
}

/// Known template ids. `plan --template <id>` looks up one of these.
pub fn find_template(id: &str) -> Option<SessionTemplate> {
    default_templates().into_iter().find(|t| t.id == id)
}

pub fn default_templates() -> Vec<SessionTemplate> {
    vec![
        SessionTemplate {
            id: "push_day".into(),
            exercises: vec![
                ("bench_press".into(), prescription(4, 5, 8, 2.0, 150)),
                ("overhead_press".into(), prescription(3, 6, 10, 2.0, 120)),
                ("triceps_pushdown".into(), prescription(3, 10, 15, 1.0, 60)),
            ],
        },
        SessionTemplate {
            id: "pull_day".into(),
            exercises: vec![
                ("barbell_row".into(), prescription(4, 6, 10, 2.0, 120)),
                ("weighted_pullup".into(), prescription(3, 4, 8, 1.5, 150)),
                ("barbell_curl".into(), prescription(3, 8, 12, 1.0, 60)),
            ],
        },
        SessionTemplate {
            id: "leg_day".into(),
            exercises: vec![
                ("back_squat".into(), prescription(4, 4, 6, 2.0, 180)),
                ("romanian_deadlift".into(), prescription(3, 6, 10, 2.0, 120)),
                ("leg_curl".into(), prescription(3, 10, 15, 1.0, 60)),
            ],
        },
    ]
}
