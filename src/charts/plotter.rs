//! Chart Plotter Module
//! Creates interactive bar charts from a `Figure` using egui_plot.

use super::figure::{BarMode, BarTrace, Figure};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

/// Share of a category slot covered by its bars.
const SLOT_WIDTH: f64 = 0.8;

/// Draws dashboard figures using egui_plot.
pub struct FigurePlotter;

impl FigurePlotter {
    /// Color of a trace.
    pub fn trace_color(trace: &BarTrace) -> Color32 {
        let (r, g, b) = trace.grade.rgb();
        Color32::from_rgb(r, g, b)
    }

    /// Center offsets of `n` grouped bars within one slot, and the bar width.
    pub fn group_offsets(n: usize) -> (Vec<f64>, f64) {
        if n == 0 {
            return (Vec::new(), SLOT_WIDTH);
        }
        let width = SLOT_WIDTH / n as f64;
        let offsets = (0..n)
            .map(|i| (i as f64 - (n as f64 - 1.0) / 2.0) * width)
            .collect();
        (offsets, width)
    }

    /// Draw a figure. X-axis: categories (instructors), Y-axis: values.
    pub fn draw_figure(ui: &mut egui::Ui, id: &str, figure: &Figure, height: f32) {
        if figure.is_empty() {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No grades for this selection").size(16.0));
                });
            });
            return;
        }

        let categories = figure.categories();
        let x_labels = categories.clone();

        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(figure.layout.xaxis.title.text.clone())
            .y_axis_label(figure.layout.yaxis.title.text.clone())
            .x_axis_formatter(move |mark, _range| {
                let rounded = mark.value.round();
                if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                    return String::new();
                }
                x_labels.get(rounded as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| match figure.layout.barmode {
                BarMode::Group => {
                    for chart in Self::grouped_charts(figure, &categories) {
                        plot_ui.bar_chart(chart);
                    }
                }
                BarMode::Stack => {
                    let (charts, labels) = Self::stacked_charts(figure, &categories);
                    for chart in charts {
                        plot_ui.bar_chart(chart);
                    }
                    for (position, text) in labels {
                        plot_ui.text(Text::new(position, RichText::new(text).size(11.0)));
                    }
                }
            });
    }

    fn category_index(categories: &[String], x: &str) -> Option<usize> {
        categories.iter().position(|c| c == x)
    }

    fn grouped_charts(figure: &Figure, categories: &[String]) -> Vec<BarChart> {
        let (offsets, width) = Self::group_offsets(figure.data.len());

        figure
            .data
            .iter()
            .zip(offsets)
            .map(|(trace, offset)| {
                let bars: Vec<Bar> = trace
                    .x
                    .iter()
                    .zip(&trace.y)
                    .filter_map(|(x, &y)| {
                        let idx = Self::category_index(categories, x)?;
                        Some(
                            Bar::new(idx as f64 + offset, y)
                                .width(width)
                                .name(format!("{} {}", x, trace.name)),
                        )
                    })
                    .collect();

                BarChart::new(bars)
                    .name(&trace.name)
                    .color(Self::trace_color(trace))
            })
            .collect()
    }

    /// Stacked charts in trace order plus the text label of every segment,
    /// anchored at the segment center.
    fn stacked_charts(
        figure: &Figure,
        categories: &[String],
    ) -> (Vec<BarChart>, Vec<(PlotPoint, String)>) {
        let mut charts: Vec<BarChart> = Vec::new();
        let mut labels: Vec<(PlotPoint, String)> = Vec::new();
        let mut base = vec![0.0; categories.len()];

        for trace in &figure.data {
            let mut bars = Vec::new();
            for (i, (x, &y)) in trace.x.iter().zip(&trace.y).enumerate() {
                let Some(idx) = Self::category_index(categories, x) else {
                    continue;
                };
                bars.push(
                    Bar::new(idx as f64, y)
                        .width(SLOT_WIDTH)
                        .name(format!("{} {}", x, trace.name)),
                );

                if let Some(text) = trace.text.as_ref().and_then(|t| t.get(i)) {
                    if y > 0.0 {
                        labels.push((PlotPoint::new(idx as f64, base[idx] + y / 2.0), text.clone()));
                    }
                }
                base[idx] += y;
            }

            let below: Vec<&BarChart> = charts.iter().collect();
            let chart = BarChart::new(bars)
                .name(&trace.name)
                .color(Self::trace_color(trace))
                .stack_on(&below);
            charts.push(chart);
        }

        (charts, labels)
    }
}
