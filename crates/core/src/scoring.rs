//! Weighted report card scoring.
//!
//! Three levels, computed bottom-up:
//!
//! ```text
//! science(exam) = physics * wP + chemistry * wC + biology * wB
//! term          = science(exam0) * w0 + science(exam1) * w1 + science(exam2) * w2
//! final         = mean(term scores)
//! ```
//!
//! The engine never mutates its inputs. Every operation returns a new
//! snapshot with the derived fields (`weightedScores`, `termScore`) filled
//! in, so a failed computation leaves the caller's record untouched.

use crate::error::CoreError;
use crate::types::{
    Exam, MarkUpdate, ReportCard, Student, Term, BIOLOGY, CHEMISTRY, EXAMS_PER_TERM, PHYSICS,
    SCIENCE_KEY,
};
use crate::validation::{validate_roll_number, validate_subject_marks};
use crate::weights::ScoringWeights;

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    /// Build an engine over a custom weight set, rejecting negative or
    /// non-finite weights.
    pub fn new(weights: ScoringWeights) -> Result<Self, CoreError> {
        weights
            .validate()
            .map_err(|errors| CoreError::Validation(errors.join("; ")))?;
        Ok(Self { weights })
    }

    // -----------------------------------------------------------------------
    // Exam level
    // -----------------------------------------------------------------------

    /// Weighted science score of one exam. Subjects other than Physics,
    /// Chemistry and Biology are validated but do not contribute; a missing
    /// science subject counts as 0.
    pub fn science_score(&self, exam: &Exam) -> Result<f64, CoreError> {
        validate_subject_marks(&exam.subject_marks, &format!("Exam {}", exam.exam_name))?;

        let mark = |subject: &str| {
            exam.subject_marks
                .get(subject)
                .copied()
                .flatten()
                .unwrap_or(0.0)
        };
        let science = mark(PHYSICS) * self.weights.physics
            + mark(CHEMISTRY) * self.weights.chemistry
            + mark(BIOLOGY) * self.weights.biology;

        tracing::debug!(exam = %exam.exam_name, science, "Calculated science score");
        Ok(science)
    }

    /// Copy of `exam` with its `Science` weighted score set. Other weighted
    /// entries are carried over.
    pub fn score_exam(&self, exam: &Exam) -> Result<Exam, CoreError> {
        let science = self.science_score(exam)?;
        let mut scored = exam.clone();
        scored.weighted_scores.insert(SCIENCE_KEY.to_string(), science);
        Ok(scored)
    }

    // -----------------------------------------------------------------------
    // Term level
    // -----------------------------------------------------------------------

    pub fn term_score(&self, term: &Term) -> Result<f64, CoreError> {
        self.score_term(term).map(|t| t.term_score)
    }

    /// Copy of `term` with every exam scored and `term_score` recomputed.
    /// Exam order decides which positional weight each exam receives.
    pub fn score_term(&self, term: &Term) -> Result<Term, CoreError> {
        check_term_shape(term)?;

        let exams = term
            .exams
            .iter()
            .map(|exam| self.score_exam(exam))
            .collect::<Result<Vec<_>, _>>()?;

        let term_score = exams
            .iter()
            .zip(self.weights.exam_weights)
            .map(|(exam, weight)| exam.science_score().unwrap_or(0.0) * weight)
            .sum::<f64>();

        tracing::debug!(term = %term.term_name, term_score, "Calculated term score");
        Ok(Term {
            term_name: term.term_name.clone(),
            exams,
            term_score,
        })
    }

    // -----------------------------------------------------------------------
    // Student level
    // -----------------------------------------------------------------------

    pub fn final_score(&self, student: &Student) -> Result<f64, CoreError> {
        self.score_student(student).map(|card| card.final_score)
    }

    /// Score every term in list order and average the term scores.
    pub fn score_student(&self, student: &Student) -> Result<ReportCard, CoreError> {
        validate_roll_number(student.roll_number)?;
        if student.name.is_empty() {
            return Err(CoreError::Validation("Name is required".to_string()));
        }
        if student.terms.is_empty() {
            return Err(CoreError::Validation(
                "Student must have at least one term".to_string(),
            ));
        }

        let terms = student
            .terms
            .iter()
            .map(|term| self.score_term(term))
            .collect::<Result<Vec<_>, _>>()?;
        let final_score = terms.iter().map(|t| t.term_score).sum::<f64>() / terms.len() as f64;

        tracing::info!(
            roll_number = student.roll_number,
            final_score,
            "Final score calculated"
        );
        Ok(ReportCard {
            student: Student {
                terms,
                ..student.clone()
            },
            final_score,
        })
    }

    // -----------------------------------------------------------------------
    // Partial update
    // -----------------------------------------------------------------------

    /// Merge `update.subject_marks` into the named exam (overwriting on key
    /// collision, keeping untouched subjects) and recompute that exam and its
    /// term. The student's final score is not part of the snapshot; derive it
    /// with [`Self::final_score`] when needed.
    pub fn apply_mark_update(
        &self,
        student: &Student,
        update: &MarkUpdate,
    ) -> Result<Student, CoreError> {
        let term_idx = student
            .term_index(&update.term_name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Term {} not found for student {}",
                    update.term_name, student.roll_number
                ))
            })?;
        let exam_idx = student.terms[term_idx]
            .exam_index(&update.exam_name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Exam {} not found in term {}",
                    update.exam_name, update.term_name
                ))
            })?;

        tracing::info!(
            roll_number = student.roll_number,
            term = %update.term_name,
            exam = %update.exam_name,
            "Updating marks"
        );

        let mut updated = student.clone();
        let term = &mut updated.terms[term_idx];
        let exam = &mut term.exams[exam_idx];
        exam.subject_marks.extend(
            update
                .subject_marks
                .iter()
                .map(|(subject, mark)| (subject.clone(), *mark)),
        );
        *exam = self.score_exam(exam)?;
        *term = self.score_term(term)?;

        Ok(updated)
    }
}

/// Structural checks on a term before any exam is scored.
fn check_term_shape(term: &Term) -> Result<(), CoreError> {
    if term.term_name.is_empty() {
        return Err(CoreError::Validation("Term name is required".to_string()));
    }
    if term.exams.is_empty() {
        return Err(CoreError::Validation(format!(
            "Term {}: At least one exam is required",
            term.term_name
        )));
    }
    if term.exams.len() != EXAMS_PER_TERM {
        return Err(CoreError::Validation(format!(
            "Term {}: Each term must have exactly {EXAMS_PER_TERM} exams",
            term.term_name
        )));
    }
    if term.exams.iter().any(|e| e.exam_name.is_empty()) {
        return Err(CoreError::Validation(format!(
            "Term {}: Exam name is required",
            term.term_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::types::SubjectMarks;

    const EPS: f64 = 1e-9;

    fn marks(physics: f64, chemistry: f64, biology: f64) -> SubjectMarks {
        SubjectMarks::from([
            (PHYSICS.to_string(), Some(physics)),
            (CHEMISTRY.to_string(), Some(chemistry)),
            (BIOLOGY.to_string(), Some(biology)),
        ])
    }

    fn exam(name: &str, subject_marks: SubjectMarks) -> Exam {
        Exam {
            exam_name: name.to_string(),
            subject_marks,
            weighted_scores: BTreeMap::new(),
        }
    }

    fn term(name: &str, exams: Vec<Exam>) -> Term {
        Term {
            term_name: name.to_string(),
            exams,
            term_score: 0.0,
        }
    }

    fn sample_term(name: &str) -> Term {
        term(
            name,
            vec![
                exam("Exam 1", marks(78.0, 72.0, 80.0)),
                exam("Exam 2", marks(80.0, 75.0, 82.0)),
                exam("Exam 3", marks(85.0, 78.0, 84.0)),
            ],
        )
    }

    fn sample_student() -> Student {
        Student {
            id: None,
            roll_number: 101,
            name: "John Doe".to_string(),
            terms: vec![sample_term("Term 1")],
        }
    }

    // -- science score --

    #[test]
    fn science_score_weights_subjects() {
        let engine = ScoringEngine::default();
        let score = engine
            .science_score(&exam("Exam 1", marks(78.0, 72.0, 80.0)))
            .unwrap();
        assert!((score - 76.8).abs() < EPS);
    }

    #[test]
    fn science_score_treats_missing_subject_as_zero() {
        let engine = ScoringEngine::default();
        let only_physics = SubjectMarks::from([(PHYSICS.to_string(), Some(50.0))]);
        let score = engine.science_score(&exam("Quiz", only_physics)).unwrap();
        assert!((score - 20.0).abs() < EPS);
    }

    #[test]
    fn science_score_ignores_other_subjects_but_keeps_them() {
        let engine = ScoringEngine::default();
        let mut subject_marks = marks(100.0, 100.0, 100.0);
        subject_marks.insert("Math".to_string(), Some(10.0));
        let scored = engine.score_exam(&exam("Exam", subject_marks)).unwrap();
        assert!((scored.science_score().unwrap() - 100.0).abs() < EPS);
        assert_eq!(scored.subject_marks["Math"], Some(10.0));
    }

    #[test]
    fn score_exam_preserves_other_weighted_entries() {
        let engine = ScoringEngine::default();
        let mut input = exam("Exam", marks(10.0, 10.0, 10.0));
        input.weighted_scores.insert("Arts".to_string(), 42.0);
        let scored = engine.score_exam(&input).unwrap();
        assert_eq!(scored.weighted_scores["Arts"], 42.0);
        assert!((scored.weighted_scores[SCIENCE_KEY] - 10.0).abs() < EPS);
        assert!(input.weighted_scores.get(SCIENCE_KEY).is_none());
    }

    #[test]
    fn boundary_marks_are_accepted() {
        let engine = ScoringEngine::default();
        assert!(engine.science_score(&exam("E", marks(0.0, 100.0, 0.0))).is_ok());
    }

    #[test]
    fn out_of_range_mark_is_rejected_with_exam_context() {
        let engine = ScoringEngine::default();
        let err = engine
            .science_score(&exam("Exam 1", marks(100.01, 50.0, 50.0)))
            .unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(msg) if msg == "Exam Exam 1: Marks for Physics must be between 0 and 100"
        );
        assert!(engine
            .science_score(&exam("Exam 1", marks(50.0, -0.01, 50.0)))
            .is_err());
    }

    #[test]
    fn null_mark_is_rejected() {
        let engine = ScoringEngine::default();
        let mut subject_marks = marks(50.0, 50.0, 50.0);
        subject_marks.insert(BIOLOGY.to_string(), None);
        let err = engine.science_score(&exam("Exam 2", subject_marks)).unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(msg) if msg == "Exam Exam 2: Mark for Biology cannot be null"
        );
    }

    #[test]
    fn empty_marks_are_rejected() {
        let engine = ScoringEngine::default();
        let err = engine
            .science_score(&exam("Exam 3", SubjectMarks::new()))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Exam Exam 3: Subject marks are required");
    }

    // -- term score --

    #[test]
    fn term_score_uses_positional_exam_weights() {
        let engine = ScoringEngine::default();
        // 76.8 * 0.1 + 79.1 * 0.1 + 82.6 * 0.8
        let expected = 7.68 + 7.91 + 66.08;
        let scored = engine.score_term(&sample_term("Term 1")).unwrap();
        assert!((scored.term_score - expected).abs() < 1e-6);
        assert!((scored.term_score - 81.67).abs() < 0.01);
        let sciences: Vec<f64> = scored
            .exams
            .iter()
            .map(|e| e.science_score().unwrap())
            .collect();
        assert!((sciences[0] - 76.8).abs() < 1e-6);
        assert!((sciences[1] - 79.1).abs() < 1e-6);
        assert!((sciences[2] - 82.6).abs() < 1e-6);
    }

    #[test]
    fn exam_order_decides_weight() {
        let engine = ScoringEngine::default();
        let mut reversed = sample_term("Term 1");
        reversed.exams.reverse();
        let forward = engine.term_score(&sample_term("Term 1")).unwrap();
        let backward = engine.term_score(&reversed).unwrap();
        assert!((forward - backward).abs() > 1.0);
    }

    #[test]
    fn term_requires_exactly_three_exams() {
        let engine = ScoringEngine::default();
        for count in [1usize, 2, 4] {
            let exams = (0..count)
                .map(|i| exam(&format!("Exam {i}"), marks(50.0, 50.0, 50.0)))
                .collect();
            let err = engine.term_score(&term("Term 1", exams)).unwrap_err();
            assert_matches!(
                err,
                CoreError::Validation(msg) if msg == "Term Term 1: Each term must have exactly 3 exams"
            );
        }
    }

    #[test]
    fn term_with_no_exams_reports_missing_exam() {
        let engine = ScoringEngine::default();
        let err = engine.term_score(&term("Term 1", vec![])).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Term Term 1: At least one exam is required");
    }

    #[test]
    fn term_name_is_required() {
        let engine = ScoringEngine::default();
        let err = engine.term_score(&sample_term("")).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Term name is required");
    }

    // -- final score --

    #[test]
    fn final_score_is_mean_of_term_scores() {
        let engine = ScoringEngine::default();
        let mut student = sample_student();
        student.terms.push(term(
            "Term 2",
            vec![
                exam("Exam 1", marks(100.0, 100.0, 100.0)),
                exam("Exam 2", marks(100.0, 100.0, 100.0)),
                exam("Exam 3", marks(100.0, 100.0, 100.0)),
            ],
        ));

        let card = engine.score_student(&student).unwrap();
        let t1 = card.student.terms[0].term_score;
        let t2 = card.student.terms[1].term_score;
        assert!((t2 - 100.0).abs() < EPS);
        assert!((card.final_score - (t1 + t2) / 2.0).abs() < EPS);
        // input untouched
        assert_eq!(student.terms[0].term_score, 0.0);
    }

    #[test]
    fn final_score_is_idempotent() {
        let engine = ScoringEngine::default();
        let card = engine.score_student(&sample_student()).unwrap();
        let again = engine.score_student(&card.student).unwrap();
        assert_eq!(card.final_score, again.final_score);
        assert_eq!(card.student, again.student);
    }

    #[test]
    fn student_level_checks() {
        let engine = ScoringEngine::default();

        let mut s = sample_student();
        s.roll_number = 0;
        assert_matches!(
            engine.final_score(&s),
            Err(CoreError::Validation(msg)) if msg == "Roll number must be a positive integer"
        );

        let mut s = sample_student();
        s.name.clear();
        assert_matches!(engine.final_score(&s), Err(CoreError::Validation(msg)) if msg == "Name is required");

        let mut s = sample_student();
        s.terms.clear();
        assert_matches!(
            engine.final_score(&s),
            Err(CoreError::Validation(msg)) if msg == "Student must have at least one term"
        );
    }

    #[test]
    fn custom_weights_are_applied() {
        let engine = ScoringEngine::new(ScoringWeights {
            physics: 1.0,
            chemistry: 0.0,
            biology: 0.0,
            exam_weights: [0.0, 0.0, 1.0],
        })
        .unwrap();
        let score = engine.term_score(&sample_term("Term 1")).unwrap();
        assert!((score - 85.0).abs() < EPS);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let weights = ScoringWeights {
            physics: -0.4,
            ..ScoringWeights::default()
        };
        assert_matches!(ScoringEngine::new(weights), Err(CoreError::Validation(_)));
    }

    // -- partial update --

    fn update(term: &str, exam: &str, subject_marks: SubjectMarks) -> MarkUpdate {
        MarkUpdate {
            term_name: term.to_string(),
            exam_name: exam.to_string(),
            subject_marks,
        }
    }

    #[test]
    fn update_merges_and_recomputes() {
        let engine = ScoringEngine::default();
        let scored = engine.score_student(&sample_student()).unwrap().student;
        let physics = SubjectMarks::from([(PHYSICS.to_string(), Some(90.0))]);

        let updated = engine
            .apply_mark_update(&scored, &update("Term 1", "Exam 1", physics))
            .unwrap();

        let exam = &updated.terms[0].exams[0];
        assert_eq!(exam.subject_marks[PHYSICS], Some(90.0));
        assert_eq!(exam.subject_marks[CHEMISTRY], Some(72.0));
        assert_eq!(exam.subject_marks[BIOLOGY], Some(80.0));
        // 90 * 0.4 + 72 * 0.3 + 80 * 0.3
        assert!((exam.science_score().unwrap() - 81.6).abs() < 1e-6);
        assert!((updated.terms[0].term_score - 82.15).abs() < 0.01);
        // original snapshot untouched
        assert_eq!(scored.terms[0].exams[0].subject_marks[PHYSICS], Some(78.0));
    }

    #[test]
    fn update_unknown_term_fails() {
        let engine = ScoringEngine::default();
        let err = engine
            .apply_mark_update(
                &sample_student(),
                &update("Term 9", "Exam 1", marks(1.0, 1.0, 1.0)),
            )
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Term Term 9 not found for student 101");
    }

    #[test]
    fn update_unknown_exam_fails() {
        let engine = ScoringEngine::default();
        let err = engine
            .apply_mark_update(
                &sample_student(),
                &update("Term 1", "Final", marks(1.0, 1.0, 1.0)),
            )
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Exam Final not found in term Term 1");
    }

    #[test]
    fn update_with_bad_mark_leaves_student_unchanged() {
        let engine = ScoringEngine::default();
        let student = engine.score_student(&sample_student()).unwrap().student;
        let before = student.clone();
        let bad = SubjectMarks::from([(CHEMISTRY.to_string(), Some(120.0))]);
        assert!(engine
            .apply_mark_update(&student, &update("Term 1", "Exam 2", bad))
            .is_err());
        assert_eq!(student, before);
    }
}
