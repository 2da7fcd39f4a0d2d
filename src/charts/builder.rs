//! Chart Builder Module
//! Turns aggregated grade rows into the two dashboard figures.

use super::figure::{BarMode, BarTrace, Figure, Layout};
use crate::data::{AggregatedRow, GradeAggregator, GradeRange, COL_INSTRUCTOR};

/// Grouped bar chart of absolute coarse grade counts per instructor.
pub fn distribution_chart(rows: &[AggregatedRow]) -> Figure {
    let instructors: Vec<String> = rows.iter().map(|r| r.instructor.clone()).collect();

    let data = GradeRange::ALL
        .into_iter()
        .map(|range| {
            let counts = rows.iter().map(|r| r.count(range)).collect();
            BarTrace::new(range, instructors.clone(), counts)
        })
        .collect();

    Figure {
        data,
        layout: Layout::new(BarMode::Group, COL_INSTRUCTOR, "value"),
    }
}

/// Stacked bar chart of coarse grade proportions per instructor.
///
/// Segment text is the raw rounded fraction (`0.5`), not a formatted percentage.
pub fn percentage_chart(rows: &[AggregatedRow]) -> Figure {
    let long = GradeAggregator::stack_to_long(&GradeAggregator::percentages(rows));

    let data = GradeRange::ALL
        .into_iter()
        .map(|range| {
            let points: Vec<_> = long.iter().filter(|p| p.grade == range).collect();
            let x = points.iter().map(|p| p.instructor.clone()).collect();
            let y: Vec<f64> = points.iter().map(|p| p.percentage).collect();
            let text = y.iter().map(|v| v.to_string()).collect();
            BarTrace::new(range, x, y).with_text(text)
        })
        .collect();

    Figure {
        data,
        layout: Layout::new(BarMode::Stack, COL_INSTRUCTOR, "percentage"),
    }
}
