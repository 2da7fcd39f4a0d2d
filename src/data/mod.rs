//! Data module - CSV loading and grade aggregation

mod aggregator;
mod grades;
mod loader;

pub use aggregator::{
    round_to, AggregateError, AggregatedRow, CourseOption, GradeAggregator, PercentagePoint,
    PercentageRow,
};
pub use grades::{GradeRange, COL_INSTRUCTOR, COL_NUMBER, COL_SUBJECT, GRADE_BUCKETS};
pub use loader::{DataSource, GradeDataset, LoaderError, DEFAULT_DATASET_URL};
