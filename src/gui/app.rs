//! Grade Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::dashboard::{Dashboard, DashboardView};
use crate::export::{export_view, file_stem, ExportFormat};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    dashboard: Dashboard,
    view: DashboardView,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dashboard: Dashboard, view: DashboardView) -> Self {
        let dataset = dashboard.dataset();
        let control_panel = ControlPanel::new(
            dataset.subjects().to_vec(),
            dataset.source().to_string(),
            dataset.row_count(),
        );

        Self {
            dashboard,
            view,
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Subject dropdown changed: new course list, first course, both charts.
    fn handle_subject_changed(&mut self, subject: &str) {
        match self.dashboard.select_subject(subject) {
            Ok(view) => self.apply_view(view),
            Err(e) => self.report_error(&e.to_string()),
        }
    }

    /// Course dropdown changed: both charts for the same subject.
    fn handle_course_changed(&mut self, course: &str) {
        let Some(subject) = self.view.selection.subject.clone() else {
            return;
        };
        match self.dashboard.select_course(&subject, course) {
            Ok(view) => self.apply_view(view),
            Err(e) => self.report_error(&e.to_string()),
        }
    }

    fn apply_view(&mut self, view: DashboardView) {
        let status = match view.caption() {
            Some(caption) => format!("Showing {}", caption),
            None => "No course selected".to_string(),
        };
        self.control_panel.set_status(&status);
        self.view = view;
    }

    fn report_error(&mut self, message: &str) {
        error!(%message, "dashboard update failed");
        self.control_panel.set_status(&format!("Error: {}", message));
    }

    /// Handle export - ask for a folder and write both charts there
    fn handle_export(&mut self, format: ExportFormat) {
        if !self.view.selection.is_complete() {
            self.control_panel.set_status("No charts to export");
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_title(format!("Export {} charts", file_stem(&self.view)))
            .pick_folder()
        else {
            return; // User cancelled
        };

        match export_view(&self.view, &dir, &[format]) {
            Ok(paths) => {
                info!(count = paths.len(), dir = %dir.display(), "charts exported");
                self.control_panel.set_status(&format!(
                    "Exported {} files to {}",
                    paths.len(),
                    dir.display()
                ));
                if let Some(first) = paths.first() {
                    if let Err(e) = open::that(first) {
                        error!(error = %e, "could not open exported chart");
                    }
                }
            }
            Err(e) => self.report_error(&e.to_string()),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.view);

                    match action {
                        ControlPanelAction::SubjectChanged(subject) => {
                            self.handle_subject_changed(&subject)
                        }
                        ControlPanelAction::CourseChanged(course) => {
                            self.handle_course_changed(&course)
                        }
                        ControlPanelAction::ExportPng => self.handle_export(ExportFormat::Png),
                        ControlPanelAction::ExportJson => self.handle_export(ExportFormat::Json),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.view);
        });
    }
}
