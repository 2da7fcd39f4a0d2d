//! Property-based tests for course lookup and grade aggregation.
//!
//! For every generated dataset:
//! 1. Course lookup is sorted, duplicate-free and scoped to the subject
//! 2. Aggregation yields exactly the instructors of the selection
//! 3. Coarse ranges add up to the 13 fine buckets
//! 4. Percentages add up to 1 within rounding tolerance
//! 5. Aggregating twice gives the same rows

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use grade_dashboard::data::{GradeAggregator, GradeDataset, GradeRange, GRADE_BUCKETS};

const SUBJECTS: [&str; 3] = ["CS", "MATH", "STAT"];
const INSTRUCTORS: [&str; 4] = ["Adams, Bo", "Lee, Ann", "Smith, Jane", "Zed, Al"];

#[derive(Debug, Clone)]
struct Record {
    subject: &'static str,
    number: u32,
    instructor: &'static str,
    counts: Vec<u32>,
}

// =============================================================================
// Strategy helpers
// =============================================================================

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        0..SUBJECTS.len(),
        prop::sample::select(vec![100u32, 101, 200, 225, 410]),
        0..INSTRUCTORS.len(),
        prop::collection::vec(0u32..40, GRADE_BUCKETS.len()),
    )
        .prop_map(|(s, number, i, counts)| Record {
            subject: SUBJECTS[s],
            number,
            instructor: INSTRUCTORS[i],
            counts,
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 1..40)
}

fn to_dataset(records: &[Record]) -> GradeDataset {
    let mut csv = format!("Subject,Number,{},Primary Instructor", GRADE_BUCKETS.join(","));
    for r in records {
        let counts: Vec<String> = r.counts.iter().map(|c| c.to_string()).collect();
        csv.push_str(&format!(
            "\n{},{},{},\"{}\"",
            r.subject,
            r.number,
            counts.join(","),
            r.instructor
        ));
    }
    GradeDataset::from_csv_bytes(csv.into_bytes(), "proptest").unwrap()
}

fn selections(records: &[Record]) -> BTreeSet<(&'static str, u32)> {
    records.iter().map(|r| (r.subject, r.number)).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn course_lookup_is_sorted_unique_and_scoped(records in records_strategy()) {
        let dataset = to_dataset(&records);

        for subject in dataset.subjects() {
            let options = GradeAggregator::course_options(&dataset, subject).unwrap();
            let numbers: Vec<u32> = options.iter().map(|o| o.value.parse().unwrap()).collect();

            let mut expected: Vec<u32> = records
                .iter()
                .filter(|r| r.subject == subject.as_str())
                .map(|r| r.number)
                .collect();
            expected.sort_unstable();
            expected.dedup();

            prop_assert_eq!(numbers, expected);
        }
    }

    #[test]
    fn instructor_set_matches_selection(records in records_strategy()) {
        let dataset = to_dataset(&records);

        for (subject, number) in selections(&records) {
            let rows = GradeAggregator::aggregate(&dataset, subject, &number.to_string()).unwrap();
            let got: BTreeSet<&str> = rows.iter().map(|r| r.instructor.as_str()).collect();
            let expected: BTreeSet<&str> = records
                .iter()
                .filter(|r| r.subject == subject && r.number == number)
                .map(|r| r.instructor)
                .collect();

            prop_assert_eq!(rows.len(), got.len());
            prop_assert_eq!(got, expected);
        }
    }

    #[test]
    fn coarse_ranges_sum_to_fine_buckets(records in records_strategy()) {
        let dataset = to_dataset(&records);

        for (subject, number) in selections(&records) {
            let mut fine_totals: BTreeMap<&str, u32> = BTreeMap::new();
            for r in records.iter().filter(|r| r.subject == subject && r.number == number) {
                *fine_totals.entry(r.instructor).or_default() += r.counts.iter().sum::<u32>();
            }

            let rows = GradeAggregator::aggregate(&dataset, subject, &number.to_string()).unwrap();
            for row in &rows {
                let expected = fine_totals[row.instructor.as_str()] as f64;
                prop_assert!((row.total() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn percentages_sum_to_one(records in records_strategy()) {
        let dataset = to_dataset(&records);

        for (subject, number) in selections(&records) {
            let rows = GradeAggregator::aggregate(&dataset, subject, &number.to_string()).unwrap();
            for pct in GradeAggregator::percentages(&rows) {
                let sum: f64 = GradeRange::ALL.iter().map(|r| pct.percentage(*r)).sum();
                if pct.total > 0.0 {
                    prop_assert!((sum - 1.0).abs() <= 0.002 + 1e-9, "sum was {}", sum);
                } else {
                    prop_assert_eq!(sum, 0.0);
                }
                for range in GradeRange::ALL {
                    prop_assert!(pct.percentage(range).is_finite());
                }
            }
        }
    }

    #[test]
    fn aggregation_is_idempotent(records in records_strategy()) {
        let dataset = to_dataset(&records);

        for (subject, number) in selections(&records) {
            let course = number.to_string();
            let first = GradeAggregator::aggregate(&dataset, subject, &course).unwrap();
            let second = GradeAggregator::aggregate(&dataset, subject, &course).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
