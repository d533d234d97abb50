//! Grade statistics service.
//!
//! `GradeCalculator` wraps a [`GradeStore`] and derives averages and other
//! statistics from it. Every operation reads a fresh snapshot, so results
//! always reflect the latest store state.

use serde::{Deserialize, Serialize};

use crate::core::Grade;
use crate::error::{GradebookError, Result};
use crate::storage::{GradeStore, MemoryGradeStore};

/// Aggregate view over all stored grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    /// Number of grades.
    pub count: usize,
    /// Sum of credits.
    pub total_credits: u64,
    /// Number of passed grades.
    pub passed_count: usize,
    /// Number of failed grades.
    pub failed_count: usize,
    /// Unweighted mean, absent when there are no grades.
    pub simple_average: Option<f64>,
    /// Credit-weighted mean, absent when there are no grades.
    pub weighted_average: Option<f64>,
    /// Median grade value, absent when there are no grades.
    pub median: Option<f64>,
    /// Grade with the lowest value.
    pub best: Option<Grade>,
    /// Grade with the highest value.
    pub worst: Option<Grade>,
    /// Whether every grade is passed (true when there are none).
    pub all_passed: bool,
}

/// Service computing statistics over a grade store.
#[derive(Debug, Default)]
pub struct GradeCalculator<S: GradeStore = MemoryGradeStore> {
    store: S,
}

impl<S: GradeStore> GradeCalculator<S> {
    /// Create a calculator over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a grade.
    pub fn add_grade(&self, grade: Grade) -> Grade {
        self.store.save(grade)
    }

    pub fn get_all_grades(&self) -> Vec<Grade> {
        self.store.find_all()
    }

    /// First grade recorded for the course, if any.
    pub fn find_grade_by_course_name(&self, name: &str) -> Option<Grade> {
        self.store.find_one_by_course_name(name)
    }

    /// Remove every grade recorded for the course.
    pub fn delete_grade_by_course_name(&self, name: &str) -> bool {
        self.store.delete_by_course_name(name)
    }

    /// Unweighted arithmetic mean of all grade values.
    ///
    /// Fails with [`GradebookError::EmptyState`] when there are no grades.
    pub fn calculate_simple_average(&self) -> Result<f64> {
        let grades = self.non_empty_snapshot("simple average")?;
        let sum: f64 = grades.iter().map(Grade::grade_value).sum();
        Ok(sum / grades.len() as f64)
    }

    /// Credit-weighted mean: `Σ(value × credits) / Σ(credits)`.
    ///
    /// Fails with [`GradebookError::EmptyState`] when there are no grades or
    /// the credits sum to zero.
    pub fn calculate_weighted_average(&self) -> Result<f64> {
        let grades = self.non_empty_snapshot("weighted average")?;
        let weighted_sum: f64 = grades.iter().map(Grade::weighted_value).sum();
        let total_credits = sum_credits(&grades);

        if total_credits == 0 {
            return Err(GradebookError::empty_state(
                "total credits must not be zero for a weighted average",
            ));
        }

        Ok(weighted_sum / total_credits as f64)
    }

    /// Median grade value.
    ///
    /// For an even number of grades this is the mean of the two middle
    /// values. Fails with [`GradebookError::EmptyState`] when there are no
    /// grades.
    pub fn calculate_median(&self) -> Result<f64> {
        let grades = self.non_empty_snapshot("median")?;
        let mut values: Vec<f64> = grades.iter().map(Grade::grade_value).collect();
        values.sort_by(f64::total_cmp);

        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Ok((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Ok(values[mid])
        }
    }

    pub fn get_grade_count(&self) -> usize {
        self.store.count()
    }

    pub fn get_total_credits(&self) -> u64 {
        sum_credits(&self.store.find_all())
    }

    /// Grade with the lowest value; the earliest one on ties.
    pub fn get_best_grade(&self) -> Option<Grade> {
        // Strict comparison keeps the first of equal elements
        self.store
            .find_all()
            .into_iter()
            .reduce(|best, g| if g.grade_value() < best.grade_value() { g } else { best })
    }

    /// Grade with the highest value; the earliest one on ties.
    pub fn get_worst_grade(&self) -> Option<Grade> {
        // Iterator::max_by would return the last of equal elements
        self.store
            .find_all()
            .into_iter()
            .reduce(|worst, g| if g.grade_value() > worst.grade_value() { g } else { worst })
    }

    pub fn get_passed_grades(&self) -> Vec<Grade> {
        self.store.find_all_passed()
    }

    pub fn get_failed_grades(&self) -> Vec<Grade> {
        self.store.find_all_failed()
    }

    /// Whether every grade is passed. True when there are no grades.
    pub fn all_grades_passed(&self) -> bool {
        self.store.find_all().iter().all(Grade::is_passed)
    }

    pub fn delete_all_grades(&self) {
        self.store.delete_all();
    }

    pub fn has_no_grades(&self) -> bool {
        self.store.is_empty()
    }

    /// Compute every statistic at once.
    ///
    /// Undefined statistics are reported as `None` instead of failing.
    pub fn summary(&self) -> GradeSummary {
        let grades = self.store.find_all();
        let snapshot = GradeCalculator::new(MemoryGradeStore::with_grades(grades));

        let passed_count = snapshot.get_passed_grades().len();
        let count = snapshot.get_grade_count();

        GradeSummary {
            count,
            total_credits: snapshot.get_total_credits(),
            passed_count,
            failed_count: count - passed_count,
            simple_average: snapshot.calculate_simple_average().ok(),
            weighted_average: snapshot.calculate_weighted_average().ok(),
            median: snapshot.calculate_median().ok(),
            best: snapshot.get_best_grade(),
            worst: snapshot.get_worst_grade(),
            all_passed: snapshot.all_grades_passed(),
        }
    }

    fn non_empty_snapshot(&self, statistic: &str) -> Result<Vec<Grade>> {
        let grades = self.store.find_all();
        if grades.is_empty() {
            return Err(GradebookError::empty_state(format!(
                "cannot compute {statistic} without grades"
            )));
        }
        Ok(grades)
    }
}

fn sum_credits(grades: &[Grade]) -> u64 {
    grades.iter().map(|g| u64::from(g.credits())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const EPSILON: f64 = 1e-9;

    fn grade(name: &str, value: f64, credits: u32) -> Grade {
        Grade::new(name, value, credits).unwrap()
    }

    fn empty_calculator() -> GradeCalculator {
        GradeCalculator::default()
    }

    fn calculator_with(grades: &[(&str, f64, u32)]) -> GradeCalculator {
        let calc = empty_calculator();
        for &(name, value, credits) in grades {
            calc.add_grade(grade(name, value, credits));
        }
        calc
    }

    fn assert_empty_state<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(GradebookError::EmptyState { .. }) => {}
            other => panic!("expected empty-state error, got {other:?}"),
        }
    }

    #[test]
    fn test_add_grade() {
        let calc = empty_calculator();
        let added = calc.add_grade(grade("Mathematik", 1.7, 6));

        assert_eq!(added.course_name(), "Mathematik");
        assert_eq!(calc.get_grade_count(), 1);
    }

    #[test]
    fn test_get_all_grades() {
        let calc = calculator_with(&[("Mathematik", 1.7, 6), ("Physik", 2.0, 5)]);
        assert_eq!(calc.get_all_grades().len(), 2);

        let empty = empty_calculator();
        assert!(empty.get_all_grades().is_empty());
    }

    #[test]
    fn test_find_grade_by_course_name() {
        let calc = calculator_with(&[("Mathematik", 1.7, 6)]);

        let found = calc.find_grade_by_course_name("mathematik").unwrap();
        assert_eq!(found.course_name(), "Mathematik");
        assert!(calc.find_grade_by_course_name("Physik").is_none());
    }

    #[test]
    fn test_delete_grade_by_course_name() {
        let calc = calculator_with(&[("Mathematik", 1.7, 6)]);

        assert!(!calc.delete_grade_by_course_name("Physik"));
        assert!(calc.delete_grade_by_course_name("MATHEMATIK"));
        assert_eq!(calc.get_grade_count(), 0);
    }

    #[test]
    fn test_simple_average() {
        let calc = calculator_with(&[("A", 1.0, 5), ("B", 2.0, 5), ("C", 3.0, 5)]);
        assert!((calc.calculate_simple_average().unwrap() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_simple_average_single_grade() {
        let calc = calculator_with(&[("A", 1.7, 5)]);
        assert!((calc.calculate_simple_average().unwrap() - 1.7).abs() < EPSILON);
    }

    #[test]
    fn test_simple_average_empty() {
        let calc = empty_calculator();
        assert_empty_state(calc.calculate_simple_average());
    }

    #[test]
    fn test_weighted_average() {
        let calc = calculator_with(&[("A", 1.0, 10), ("B", 2.0, 5)]);
        let expected = 20.0 / 15.0;
        assert!((calc.calculate_weighted_average().unwrap() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_weighted_average_different_credits() {
        // (1.0*8 + 2.0*2) / 10 = 1.2
        let calc = calculator_with(&[("A", 1.0, 8), ("B", 2.0, 2)]);
        assert!((calc.calculate_weighted_average().unwrap() - 1.2).abs() < EPSILON);
    }

    #[test]
    fn test_weighted_average_equal_credits_matches_simple() {
        let calc = calculator_with(&[("A", 1.3, 5), ("B", 2.7, 5), ("C", 3.3, 5)]);
        let simple = calc.calculate_simple_average().unwrap();
        let weighted = calc.calculate_weighted_average().unwrap();
        assert!((simple - weighted).abs() < EPSILON);
    }

    #[test]
    fn test_weighted_average_empty() {
        let calc = empty_calculator();
        assert_empty_state(calc.calculate_weighted_average());
    }

    #[test]
    fn test_median_odd_and_even() {
        let odd = calculator_with(&[("A", 3.0, 5), ("B", 1.0, 5), ("C", 2.0, 5)]);
        assert!((odd.calculate_median().unwrap() - 2.0).abs() < EPSILON);

        let even = calculator_with(&[("A", 4.0, 5), ("B", 1.0, 5), ("C", 3.0, 5), ("D", 2.0, 5)]);
        assert!((even.calculate_median().unwrap() - 2.5).abs() < EPSILON);
    }

    #[test]
    fn test_median_empty() {
        let calc = empty_calculator();
        assert_empty_state(calc.calculate_median());
    }

    #[test]
    fn test_grade_count_and_total_credits() {
        let calc = calculator_with(&[("A", 1.0, 6), ("B", 2.0, 8), ("C", 3.0, 5)]);
        assert_eq!(calc.get_grade_count(), 3);
        assert_eq!(calc.get_total_credits(), 19);

        let empty = empty_calculator();
        assert_eq!(empty.get_total_credits(), 0);
    }

    #[test]
    fn test_best_and_worst_grade() {
        let calc = calculator_with(&[("Kurs1", 1.7, 5), ("Kurs2", 1.0, 5), ("Kurs3", 2.3, 5)]);

        let best = calc.get_best_grade().unwrap();
        assert_eq!(best.grade_value(), 1.0);
        assert_eq!(best.course_name(), "Kurs2");

        let worst = calc.get_worst_grade().unwrap();
        assert_eq!(worst.grade_value(), 2.3);
        assert_eq!(worst.course_name(), "Kurs3");
    }

    #[test]
    fn test_best_and_worst_grade_empty() {
        let calc = empty_calculator();
        assert!(calc.get_best_grade().is_none());
        assert!(calc.get_worst_grade().is_none());
    }

    #[test]
    fn test_best_and_worst_tie_break_first_inserted() {
        let calc = calculator_with(&[
            ("Erster", 1.0, 5),
            ("Zweiter", 1.0, 6),
            ("Dritter", 3.7, 5),
            ("Vierter", 3.7, 6),
        ]);

        assert_eq!(calc.get_best_grade().unwrap().course_name(), "Erster");
        assert_eq!(calc.get_worst_grade().unwrap().course_name(), "Dritter");
    }

    #[test]
    fn test_passed_and_failed_grades() {
        let calc = calculator_with(&[("A", 1.0, 5), ("B", 4.0, 5), ("C", 4.3, 5), ("D", 5.0, 5)]);

        let passed = calc.get_passed_grades();
        assert_eq!(passed.len(), 2);
        assert!(passed.iter().all(Grade::is_passed));

        let failed = calc.get_failed_grades();
        assert_eq!(failed.len(), 2);
        assert!(failed.iter().all(|g| !g.is_passed()));
    }

    #[test]
    fn test_all_grades_passed() {
        assert!(calculator_with(&[("A", 1.0, 5), ("B", 4.0, 5)]).all_grades_passed());
        assert!(!calculator_with(&[("A", 1.0, 5), ("B", 4.7, 5)]).all_grades_passed());
    }

    #[test]
    fn test_all_grades_passed_vacuously_true() {
        assert!(empty_calculator().all_grades_passed());
    }

    #[test]
    fn test_delete_all_and_has_no_grades() {
        let calc = calculator_with(&[("A", 1.0, 5), ("B", 2.0, 5)]);
        assert!(!calc.has_no_grades());

        calc.delete_all_grades();

        assert_eq!(calc.get_grade_count(), 0);
        assert!(calc.has_no_grades());
    }

    #[test]
    fn test_results_follow_store_changes() {
        let store = Arc::new(MemoryGradeStore::new());
        let calc = GradeCalculator::new(Arc::clone(&store));

        store.save(grade("A", 1.0, 5));
        assert!((calc.calculate_simple_average().unwrap() - 1.0).abs() < EPSILON);

        store.save(grade("B", 3.0, 5));
        assert!((calc.calculate_simple_average().unwrap() - 2.0).abs() < EPSILON);

        store.delete_all();
        assert_empty_state(calc.calculate_simple_average());
    }

    #[test]
    fn test_summary() {
        let calc = calculator_with(&[
            ("Mathematik I", 1.7, 6),
            ("Programmierung I", 1.3, 8),
            ("Datenbanken", 2.0, 5),
            ("Statistik", 4.3, 5),
        ]);

        let summary = calc.summary();

        assert_eq!(summary.count, 4);
        assert_eq!(summary.total_credits, 24);
        assert_eq!(summary.passed_count, 3);
        assert_eq!(summary.failed_count, 1);
        assert!((summary.simple_average.unwrap() - 2.325).abs() < EPSILON);
        let weighted = (1.7 * 6.0 + 1.3 * 8.0 + 2.0 * 5.0 + 4.3 * 5.0) / 24.0;
        assert!((summary.weighted_average.unwrap() - weighted).abs() < EPSILON);
        assert!((summary.median.unwrap() - 1.85).abs() < EPSILON);
        assert_eq!(summary.best.unwrap().course_name(), "Programmierung I");
        assert_eq!(summary.worst.unwrap().course_name(), "Statistik");
        assert!(!summary.all_passed);
    }

    #[test]
    fn test_summary_empty() {
        let summary = empty_calculator().summary();

        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_credits, 0);
        assert!(summary.simple_average.is_none());
        assert!(summary.weighted_average.is_none());
        assert!(summary.median.is_none());
        assert!(summary.best.is_none());
        assert!(summary.worst.is_none());
        assert!(summary.all_passed);
    }

    // =========================================================================
    // Property-based tests
    // =========================================================================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_grades() -> impl Strategy<Value = Vec<(f64, u32)>> {
            prop::collection::vec((1.0f64..=5.0, 1u32..=30), 1..20)
        }

        fn calculator_from(entries: &[(f64, u32)]) -> GradeCalculator {
            let calc = empty_calculator();
            for (i, &(value, credits)) in entries.iter().enumerate() {
                calc.add_grade(grade(&format!("Kurs {}", i), value, credits));
            }
            calc
        }

        proptest! {
            // Property: averages stay within the grade scale
            #[test]
            fn prop_averages_within_scale(entries in arb_grades()) {
                let calc = calculator_from(&entries);
                let simple = calc.calculate_simple_average().unwrap();
                let weighted = calc.calculate_weighted_average().unwrap();

                prop_assert!((1.0 - EPSILON..=5.0 + EPSILON).contains(&simple));
                prop_assert!((1.0 - EPSILON..=5.0 + EPSILON).contains(&weighted));
            }

            // Property: equal credits make both averages agree
            #[test]
            fn prop_equal_credits_averages_agree(
                values in prop::collection::vec(1.0f64..=5.0, 1..20),
                credits in 1u32..=30,
            ) {
                let entries: Vec<(f64, u32)> = values.iter().map(|&v| (v, credits)).collect();
                let calc = calculator_from(&entries);
                let simple = calc.calculate_simple_average().unwrap();
                let weighted = calc.calculate_weighted_average().unwrap();

                prop_assert!((simple - weighted).abs() < 1e-6);
            }

            // Property: best <= median <= worst
            #[test]
            fn prop_median_between_best_and_worst(entries in arb_grades()) {
                let calc = calculator_from(&entries);
                let best = calc.get_best_grade().unwrap().grade_value();
                let worst = calc.get_worst_grade().unwrap().grade_value();
                let median = calc.calculate_median().unwrap();

                prop_assert!(best <= median && median <= worst);
            }

            // Property: passed and failed partition the store
            #[test]
            fn prop_passed_failed_partition(entries in arb_grades()) {
                let calc = calculator_from(&entries);
                let total = calc.get_passed_grades().len() + calc.get_failed_grades().len();
                prop_assert_eq!(total, calc.get_grade_count());
            }
        }
    }
}
