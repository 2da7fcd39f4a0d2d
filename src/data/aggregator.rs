//! Grade Aggregator Module
//! Course lookup, per-instructor grade sums and percentage reshaping (stack operation).

use super::grades::{GradeRange, COL_INSTRUCTOR, COL_NUMBER, COL_SUBJECT, GRADE_BUCKETS};
use super::loader::GradeDataset;
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One entry of the course number dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOption {
    pub label: String,
    pub value: String,
}

/// Summed coarse grade counts of one instructor for a fixed subject and course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    #[serde(rename = "Primary Instructor")]
    pub instructor: String,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "F")]
    pub f: f64,
}

impl AggregatedRow {
    /// Collapse fine bucket sums into the five coarse ranges.
    pub fn collapse(instructor: impl Into<String>, bucket_sum: impl Fn(&str) -> f64) -> Self {
        let range_sum = |range: GradeRange| -> f64 {
            range.buckets().iter().map(|bucket| bucket_sum(bucket)).sum()
        };

        Self {
            instructor: instructor.into(),
            a: range_sum(GradeRange::A),
            b: range_sum(GradeRange::B),
            c: range_sum(GradeRange::C),
            d: range_sum(GradeRange::D),
            f: range_sum(GradeRange::F),
        }
    }

    pub fn count(&self, range: GradeRange) -> f64 {
        match range {
            GradeRange::A => self.a,
            GradeRange::B => self.b,
            GradeRange::C => self.c,
            GradeRange::D => self.d,
            GradeRange::F => self.f,
        }
    }

    pub fn total(&self) -> f64 {
        self.a + self.b + self.c + self.d + self.f
    }
}

/// Coarse grade proportions of one instructor, rounded to three decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageRow {
    #[serde(rename = "Primary Instructor")]
    pub instructor: String,
    pub total: f64,
    #[serde(rename = "percentage_A")]
    pub percentage_a: f64,
    #[serde(rename = "percentage_B")]
    pub percentage_b: f64,
    #[serde(rename = "percentage_C")]
    pub percentage_c: f64,
    #[serde(rename = "percentage_D")]
    pub percentage_d: f64,
    #[serde(rename = "percentage_F")]
    pub percentage_f: f64,
}

impl PercentageRow {
    /// An instructor with no graded students gets 0.0 for every range.
    pub fn from_aggregated(row: &AggregatedRow) -> Self {
        let total = row.total();
        let share = |count: f64| {
            if total > 0.0 {
                round_to(count / total, 3)
            } else {
                0.0
            }
        };

        if total <= 0.0 {
            warn!(instructor = %row.instructor, "zero graded students, percentages set to 0");
        }

        Self {
            instructor: row.instructor.clone(),
            total,
            percentage_a: share(row.a),
            percentage_b: share(row.b),
            percentage_c: share(row.c),
            percentage_d: share(row.d),
            percentage_f: share(row.f),
        }
    }

    pub fn percentage(&self, range: GradeRange) -> f64 {
        match range {
            GradeRange::A => self.percentage_a,
            GradeRange::B => self.percentage_b,
            GradeRange::C => self.percentage_c,
            GradeRange::D => self.percentage_d,
            GradeRange::F => self.percentage_f,
        }
    }
}

/// One row of the long/tidy percentage table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentagePoint {
    #[serde(rename = "Primary Instructor")]
    pub instructor: String,
    pub grade: GradeRange,
    pub percentage: f64,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Numeric order when both course numbers are integers, lexical otherwise.
fn compare_course_numbers(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Derived views over the base table. Every function is pure in its inputs.
pub struct GradeAggregator;

impl GradeAggregator {
    /// Sorted distinct course numbers offered under `subject`.
    ///
    /// An unknown subject yields an empty list.
    pub fn course_options(
        dataset: &GradeDataset,
        subject: &str,
    ) -> Result<Vec<CourseOption>, AggregateError> {
        if !dataset.contains_subject(subject) {
            return Ok(Vec::new());
        }

        let numbers = dataset
            .dataframe()
            .clone()
            .lazy()
            .filter(col(COL_SUBJECT).eq(lit(subject)))
            .select([col(COL_NUMBER)])
            .collect()?;

        let mut courses: Vec<String> = numbers
            .column(COL_NUMBER)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        courses.sort_by(|a, b| compare_course_numbers(a, b));
        courses.dedup();

        debug!(subject, courses = courses.len(), "course lookup");

        Ok(courses
            .into_iter()
            .map(|number| CourseOption {
                label: number.clone(),
                value: number,
            })
            .collect())
    }

    /// Per-instructor coarse grade sums for one course, ordered by instructor name.
    pub fn aggregate(
        dataset: &GradeDataset,
        subject: &str,
        course: &str,
    ) -> Result<Vec<AggregatedRow>, AggregateError> {
        let sums: Vec<Expr> = GRADE_BUCKETS.iter().map(|b| col(*b).sum()).collect();

        let grouped = dataset
            .dataframe()
            .clone()
            .lazy()
            .filter(
                col(COL_SUBJECT)
                    .eq(lit(subject))
                    .and(col(COL_NUMBER).eq(lit(course))),
            )
            .group_by([col(COL_INSTRUCTOR)])
            .agg(sums)
            .sort_by_exprs([col(COL_INSTRUCTOR)], SortMultipleOptions::default())
            .collect()?;

        let instructors = grouped
            .column(COL_INSTRUCTOR)?
            .as_materialized_series()
            .str()?
            .clone();

        let bucket_columns: Vec<Float64Chunked> = GRADE_BUCKETS
            .iter()
            .map(|bucket| -> PolarsResult<Float64Chunked> {
                let column = grouped.column(bucket)?.cast(&DataType::Float64)?;
                Ok(column.as_materialized_series().f64()?.clone())
            })
            .collect::<PolarsResult<_>>()?;

        let rows: Vec<AggregatedRow> = (0..grouped.height())
            .filter_map(|i| {
                let instructor = instructors.get(i)?;
                Some(AggregatedRow::collapse(instructor, |bucket| {
                    GRADE_BUCKETS
                        .iter()
                        .position(|b| *b == bucket)
                        .and_then(|idx| bucket_columns[idx].get(i))
                        .unwrap_or(0.0)
                }))
            })
            .collect();

        debug!(subject, course, instructors = rows.len(), "aggregated grades");
        Ok(rows)
    }

    /// Totals and rounded proportions for each aggregated row, same order.
    pub fn percentages(rows: &[AggregatedRow]) -> Vec<PercentageRow> {
        rows.iter().map(PercentageRow::from_aggregated).collect()
    }

    /// Transform the wide percentage columns to long format (stack operation).
    ///
    /// Output is range-major: every instructor for `A`, then every instructor for `B`, ...
    pub fn stack_to_long(rows: &[PercentageRow]) -> Vec<PercentagePoint> {
        let mut points = Vec::with_capacity(rows.len() * GradeRange::ALL.len());
        for range in GradeRange::ALL {
            for row in rows {
                points.push(PercentagePoint {
                    instructor: row.instructor.clone(),
                    grade: range,
                    percentage: row.percentage(range),
                });
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Subject,Number,YearTerm,A+,A,A-,B+,B,B-,C+,C,C-,D+,D,D-,F,Primary Instructor";

    fn dataset(rows: &[&str]) -> GradeDataset {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        GradeDataset::from_csv_bytes(text.into_bytes(), "test").unwrap()
    }

    fn sample() -> GradeDataset {
        dataset(&[
            "STAT,410,2019-fa,1,1,1,1,1,1,1,1,1,1,1,1,1,\"Zed, Al\"",
            "STAT,100,2019-fa,5,3,2,0,0,0,0,0,0,0,0,0,10,\"Smith, Jane\"",
            "STAT,100,2020-sp,0,4,0,2,2,2,1,0,0,0,0,0,0,\"Adams, Bo\"",
            "STAT,100,2020-fa,0,1,0,0,0,0,0,0,0,0,0,0,0,\"Adams, Bo\"",
            "STAT,20,2020-fa,0,1,0,0,0,0,0,0,0,0,0,0,0,\"Adams, Bo\"",
            "MATH,100,2020-fa,9,9,9,0,0,0,0,0,0,0,0,0,0,\"Smith, Jane\"",
        ])
    }

    #[test]
    fn course_options_are_sorted_numerically_and_distinct() {
        let options = GradeAggregator::course_options(&sample(), "STAT").unwrap();
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["20", "100", "410"]);
        assert!(options.iter().all(|o| o.label == o.value));
    }

    #[test]
    fn unknown_subject_has_no_courses() {
        assert!(GradeAggregator::course_options(&sample(), "CHEM")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn aggregate_sums_per_instructor_in_name_order() {
        let rows = GradeAggregator::aggregate(&sample(), "STAT", "100").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.instructor.as_str()).collect();
        assert_eq!(names, vec!["Adams, Bo", "Smith, Jane"]);

        assert_eq!(rows[0].a, 5.0);
        assert_eq!(rows[0].b, 6.0);
        assert_eq!(rows[0].c, 1.0);
        assert_eq!(rows[0].total(), 12.0);

        assert_eq!(rows[1].a, 10.0);
        assert_eq!(rows[1].f, 10.0);
    }

    #[test]
    fn aggregate_without_matches_is_empty() {
        assert!(GradeAggregator::aggregate(&sample(), "STAT", "999")
            .unwrap()
            .is_empty());
        assert!(GradeAggregator::aggregate(&sample(), "CHEM", "100")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn percentages_split_evenly() {
        let row = AggregatedRow::collapse("Smith, Jane", |bucket| match bucket {
            "A+" => 5.0,
            "A" => 3.0,
            "A-" => 2.0,
            "F" => 10.0,
            _ => 0.0,
        });
        let pct = PercentageRow::from_aggregated(&row);
        assert_eq!(pct.total, 20.0);
        assert_eq!(pct.percentage_a, 0.5);
        assert_eq!(pct.percentage_f, 0.5);
        assert_eq!(pct.percentage_b, 0.0);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let row = AggregatedRow::collapse("Nobody", |_| 0.0);
        let pct = PercentageRow::from_aggregated(&row);
        for range in GradeRange::ALL {
            assert_eq!(pct.percentage(range), 0.0);
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(1.0 / 3.0, 3), 0.333);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
        assert_eq!(round_to(0.0625, 3), 0.063);
    }

    #[test]
    fn long_form_is_range_major() {
        let rows = GradeAggregator::aggregate(&sample(), "STAT", "100").unwrap();
        let long = GradeAggregator::stack_to_long(&GradeAggregator::percentages(&rows));
        assert_eq!(long.len(), 10);
        assert_eq!(long[0].grade, GradeRange::A);
        assert_eq!(long[0].instructor, "Adams, Bo");
        assert_eq!(long[1].instructor, "Smith, Jane");
        assert_eq!(long[9].grade, GradeRange::F);
        assert_eq!(long[9].percentage, 0.5);
    }
}
