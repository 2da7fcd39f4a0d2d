//! Chart Viewer Widget
//! Central scrollable panel showing the grouped and the stacked grade chart.

use crate::charts::{Figure, FigurePlotter};
use crate::dashboard::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 380.0;

#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw both chart cards stacked vertically
    pub fn show(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        if !view.selection.is_complete() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No course selected").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_chart_card(
                    ui,
                    "grade_distribution_graph_1",
                    "Grouped Bar Chart for the Grade Distribution of Each Instructor of the chosen course",
                    &view.distribution,
                );
                ui.add_space(CHART_SPACING);
                Self::draw_chart_card(
                    ui,
                    "grade_distribution_graph_2",
                    "Stacked Bar Chart for Letter Grade Percentages of Each Instructor of the chosen course",
                    &view.percentage,
                );
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, id: &str, heading: &str, figure: &Figure) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(heading).size(15.0).strong());
                    if let Some(title) = &figure.layout.title {
                        ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                    }
                    ui.add_space(8.0);
                    FigurePlotter::draw_figure(ui, id, figure, CHART_HEIGHT);
                });
            });
    }
}
