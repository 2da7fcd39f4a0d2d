//! Dashboard Update Graph
//! Selection state and the pure update steps driven by the two dropdowns:
//! subject -> course options -> default course -> both figures.

use crate::charts::{distribution_chart, percentage_chart, Figure};
use crate::data::{AggregateError, CourseOption, GradeAggregator, GradeDataset};
use std::sync::Arc;
use tracing::{debug, warn};

/// Subject used when the caller has no preference.
pub const DEFAULT_SUBJECT: &str = "STAT";

/// Current dropdown selection. `course` is `None` when the subject offers no course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub subject: Option<String>,
    pub course: Option<String>,
}

impl Selection {
    /// Both halves are set, so charts can be computed.
    pub fn is_complete(&self) -> bool {
        self.subject.is_some() && self.course.is_some()
    }
}

/// Everything the UI needs to render one state of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selection: Selection,
    pub course_options: Vec<CourseOption>,
    pub distribution: Figure,
    pub percentage: Figure,
}

impl DashboardView {
    /// Short label for titles and file names, e.g. `STAT 100`.
    pub fn caption(&self) -> Option<String> {
        match (&self.selection.subject, &self.selection.course) {
            (Some(subject), Some(course)) => Some(format!("{} {}", subject, course)),
            _ => None,
        }
    }
}

/// Read-only data context plus the update steps over it.
#[derive(Clone)]
pub struct Dashboard {
    data: Arc<GradeDataset>,
}

impl Dashboard {
    pub fn new(data: Arc<GradeDataset>) -> Self {
        Self { data }
    }

    pub fn dataset(&self) -> &GradeDataset {
        &self.data
    }

    /// View for the preferred subject, falling back to the first known subject.
    pub fn initial_view(&self, preferred_subject: &str) -> Result<DashboardView, AggregateError> {
        if self.data.contains_subject(preferred_subject) {
            return self.select_subject(preferred_subject);
        }

        match self.data.subjects().first() {
            Some(first) => {
                warn!(
                    preferred = preferred_subject,
                    fallback = %first,
                    "preferred subject not in dataset"
                );
                self.select_subject(first)
            }
            None => Ok(self.view(Selection::default(), Vec::new())),
        }
    }

    /// Subject dropdown changed: repopulate courses and pick the first one.
    pub fn select_subject(&self, subject: &str) -> Result<DashboardView, AggregateError> {
        let course_options = GradeAggregator::course_options(&self.data, subject)?;
        let course = course_options.first().map(|o| o.value.clone());

        if course.is_none() {
            warn!(subject, "no courses for subject, selection cleared");
        }

        let selection = Selection {
            subject: Some(subject.to_string()),
            course,
        };
        self.render(selection, course_options)
    }

    /// Course dropdown changed. A course outside the subject's options clears the selection.
    pub fn select_course(
        &self,
        subject: &str,
        requested: &str,
    ) -> Result<DashboardView, AggregateError> {
        let course_options = GradeAggregator::course_options(&self.data, subject)?;
        let course = course_options
            .iter()
            .find(|o| o.value == requested)
            .map(|o| o.value.clone());

        if course.is_none() {
            warn!(subject, requested, "course not offered for subject, selection cleared");
        }

        let selection = Selection {
            subject: Some(subject.to_string()),
            course,
        };
        self.render(selection, course_options)
    }

    fn render(
        &self,
        selection: Selection,
        course_options: Vec<CourseOption>,
    ) -> Result<DashboardView, AggregateError> {
        let (subject, course) = match (&selection.subject, &selection.course) {
            (Some(subject), Some(course)) => (subject.as_str(), course.as_str()),
            _ => return Ok(self.view(selection, course_options)),
        };

        let rows = GradeAggregator::aggregate(&self.data, subject, course)?;
        debug!(subject, course, instructors = rows.len(), "recomputed charts");

        let title = format!("{} {}", subject, course);
        Ok(DashboardView {
            distribution: distribution_chart(&rows)
                .with_title(format!("{}: Grade Distribution by Instructor", title)),
            percentage: percentage_chart(&rows)
                .with_title(format!("{}: Letter Grade Percentages by Instructor", title)),
            selection,
            course_options,
        })
    }

    /// View with empty figures, used when there is no valid selection.
    fn view(&self, selection: Selection, course_options: Vec<CourseOption>) -> DashboardView {
        DashboardView {
            selection,
            course_options,
            distribution: distribution_chart(&[]),
            percentage: percentage_chart(&[]),
        }
    }
}
