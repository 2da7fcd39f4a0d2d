//! Grade Schema Module
//! Column names of the grade distribution dataset and the coarse grade ranges.

use serde::Serialize;

pub const COL_SUBJECT: &str = "Subject";
pub const COL_NUMBER: &str = "Number";
pub const COL_INSTRUCTOR: &str = "Primary Instructor";

/// The 13 fine-grained letter-grade bucket columns, in dataset order.
pub const GRADE_BUCKETS: [&str; 13] = [
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

/// Prefix of the percentage columns before the long-form reshape.
pub const PERCENTAGE_PREFIX: &str = "percentage_";

/// Coarse grade range obtained by collapsing the +/- variants of a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GradeRange {
    A,
    B,
    C,
    D,
    F,
}

impl GradeRange {
    pub const ALL: [GradeRange; 5] = [
        GradeRange::A,
        GradeRange::B,
        GradeRange::C,
        GradeRange::D,
        GradeRange::F,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GradeRange::A => "A",
            GradeRange::B => "B",
            GradeRange::C => "C",
            GradeRange::D => "D",
            GradeRange::F => "F",
        }
    }

    /// Fine buckets summed into this range.
    pub fn buckets(self) -> &'static [&'static str] {
        match self {
            GradeRange::A => &GRADE_BUCKETS[0..3],
            GradeRange::B => &GRADE_BUCKETS[3..6],
            GradeRange::C => &GRADE_BUCKETS[6..9],
            GradeRange::D => &GRADE_BUCKETS[9..12],
            GradeRange::F => &GRADE_BUCKETS[12..13],
        }
    }

    /// Name of the wide percentage column, e.g. `percentage_A`.
    pub fn percentage_column(self) -> String {
        format!("{}{}", PERCENTAGE_PREFIX, self.label())
    }

    /// Recover the range from a wide percentage column name.
    pub fn from_percentage_column(name: &str) -> Option<Self> {
        let label = name.strip_prefix(PERCENTAGE_PREFIX)?;
        Self::ALL.into_iter().find(|range| range.label() == label)
    }

    /// Plotly's default qualitative palette, one color per range.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            GradeRange::A => (99, 110, 250),  // Blue
            GradeRange::B => (239, 85, 59),   // Red
            GradeRange::C => (0, 204, 150),   // Green
            GradeRange::D => (171, 99, 250),  // Purple
            GradeRange::F => (255, 161, 90),  // Orange
        }
    }

    pub fn hex_color(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_every_bucket_once() {
        let covered: Vec<&str> = GradeRange::ALL
            .iter()
            .flat_map(|range| range.buckets().iter().copied())
            .collect();
        assert_eq!(covered, GRADE_BUCKETS.to_vec());
    }

    #[test]
    fn percentage_column_strips_back_to_range() {
        for range in GradeRange::ALL {
            let column = range.percentage_column();
            assert_eq!(GradeRange::from_percentage_column(&column), Some(range));
        }
        assert_eq!(GradeRange::from_percentage_column("percentage_E"), None);
        assert_eq!(GradeRange::from_percentage_column("A"), None);
    }

    #[test]
    fn hex_color_is_lowercase_rgb() {
        assert_eq!(GradeRange::A.hex_color(), "#636efa");
    }
}
