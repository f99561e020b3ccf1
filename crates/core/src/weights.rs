//! Fixed weight set used by the scoring engine.

use crate::types::EXAMS_PER_TERM;

pub const PHYSICS_WEIGHT: f64 = 0.40;
pub const CHEMISTRY_WEIGHT: f64 = 0.30;
pub const BIOLOGY_WEIGHT: f64 = 0.30;

/// Weights of the first, second and third exam of a term, in list order.
pub const EXAM_WEIGHTS: [f64; EXAMS_PER_TERM] = [0.10, 0.10, 0.80];

/// Subject weights for the science score and positional exam weights for
/// the term score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub physics: f64,
    pub chemistry: f64,
    pub biology: f64,
    pub exam_weights: [f64; EXAMS_PER_TERM],
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            physics: PHYSICS_WEIGHT,
            chemistry: CHEMISTRY_WEIGHT,
            biology: BIOLOGY_WEIGHT,
            exam_weights: EXAM_WEIGHTS,
        }
    }
}

impl ScoringWeights {
    /// Check that every weight is finite and non-negative.
    /// Returns all problems at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let subjects = [
            ("physics", self.physics),
            ("chemistry", self.chemistry),
            ("biology", self.biology),
        ];
        for (name, weight) in subjects {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(format!(
                    "weights.{name}: must be a non-negative number, got {weight}"
                ));
            }
        }

        for (i, weight) in self.exam_weights.iter().enumerate() {
            if !weight.is_finite() || *weight < 0.0 {
                errors.push(format!(
                    "weights.exam_weights[{i}]: must be a non-negative number, got {weight}"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
