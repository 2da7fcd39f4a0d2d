//! Figure Module
//! Backend-independent bar chart description, serializable as plotly figure JSON.

use crate::data::GradeRange;
use serde::Serialize;

/// How bar traces sharing a category are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    /// Side by side within each category
    Group,
    /// On top of each other within each category
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

/// One bar series; `x[i]` is the category of `y[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "bar")]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    pub marker: Marker,
    #[serde(skip)]
    pub grade: GradeRange,
}

impl BarTrace {
    pub fn new(grade: GradeRange, x: Vec<String>, y: Vec<f64>) -> Self {
        Self {
            name: grade.label().to_string(),
            x,
            y,
            text: None,
            marker: Marker {
                color: grade.hex_color(),
            },
            grade,
        }
    }

    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.text = Some(text);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub b: u32,
    pub t: u32,
    pub r: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
}

impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: AxisTitle {
                text: text.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub barmode: BarMode,
    pub margin: Margin,
    pub hovermode: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

impl Layout {
    pub fn new(barmode: BarMode, x_title: &str, y_title: &str) -> Self {
        Self {
            title: None,
            barmode,
            margin: Margin {
                l: 40,
                b: 40,
                t: 10,
                r: 0,
            },
            hovermode: "closest".to_string(),
            xaxis: Axis::titled(x_title),
            yaxis: Axis::titled(y_title),
        }
    }
}

/// A complete chart: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

impl Figure {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.layout.title = Some(title.into());
        self
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|trace| trace.y.is_empty())
    }

    /// Categories in first-seen order across all traces.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for trace in &self.data {
            for x in &trace.x {
                if !categories.contains(x) {
                    categories.push(x.clone());
                }
            }
        }
        categories
    }

    /// Tallest bar, or tallest stack when bars are stacked.
    pub fn y_extent(&self) -> f64 {
        match self.layout.barmode {
            BarMode::Group => self
                .data
                .iter()
                .flat_map(|trace| trace.y.iter().copied())
                .fold(0.0, f64::max),
            BarMode::Stack => {
                let categories = self.categories();
                let mut stacks = vec![0.0; categories.len()];
                for trace in &self.data {
                    for (x, y) in trace.x.iter().zip(&trace.y) {
                        if let Some(idx) = categories.iter().position(|c| c == x) {
                            stacks[idx] += y.max(0.0);
                        }
                    }
                }
                stacks.into_iter().fold(0.0, f64::max)
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure(barmode: BarMode) -> Figure {
        Figure {
            data: vec![
                BarTrace::new(
                    GradeRange::A,
                    vec!["x".into(), "y".into()],
                    vec![1.0, 4.0],
                ),
                BarTrace::new(
                    GradeRange::B,
                    vec!["x".into(), "y".into()],
                    vec![2.0, 1.0],
                ),
            ],
            layout: Layout::new(barmode, "Primary Instructor", "value"),
        }
    }

    #[test]
    fn y_extent_depends_on_barmode() {
        assert_eq!(figure(BarMode::Group).y_extent(), 4.0);
        assert_eq!(figure(BarMode::Stack).y_extent(), 5.0);
    }

    #[test]
    fn json_matches_plotly_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&figure(BarMode::Group).to_json().unwrap()).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["name"], "A");
        assert_eq!(json["data"][0]["marker"]["color"], "#636efa");
        assert!(json["data"][0].get("text").is_none());
        assert!(json["data"][0].get("grade").is_none());
        assert_eq!(json["layout"]["barmode"], "group");
        assert_eq!(json["layout"]["margin"]["l"], 40);
        assert_eq!(json["layout"]["hovermode"], "closest");
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "Primary Instructor");
    }

    #[test]
    fn empty_figure() {
        let empty = Figure {
            data: Vec::new(),
            layout: Layout::new(BarMode::Stack, "x", "y"),
        };
        assert!(empty.is_empty());
        assert!(empty.categories().is_empty());
        assert_eq!(empty.y_extent(), 0.0);
    }
}
