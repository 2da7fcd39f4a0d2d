//! Control Panel Widget
//! Left side panel with the subject and course dropdowns and export controls.

use crate::dashboard::DashboardView;
use egui::{Color32, ComboBox, RichText};

/// Left side control panel with dataset info, selection dropdowns and exports.
pub struct ControlPanel {
    pub subjects: Vec<String>,
    pub source: String,
    pub row_count: usize,
    pub status: String,
}

impl ControlPanel {
    pub fn new(subjects: Vec<String>, source: String, row_count: usize) -> Self {
        Self {
            subjects,
            source,
            row_count,
            status: "Ready".to_string(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, view: &DashboardView) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Grade Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Course grade distributions")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source).size(11.0).color(Color32::GRAY));
                ui.label(
                    RichText::new(format!(
                        "{} rows, {} subjects",
                        self.row_count,
                        self.subjects.len()
                    ))
                    .size(12.0),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(
            RichText::new("Please choose a subject and one of its available course numbers:")
                .size(12.0),
        );
        ui.add_space(8.0);

        let label_width = 70.0;
        let combo_width = 180.0;

        let selected_subject = view.selection.subject.clone().unwrap_or_default();
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Subject:"));
            ComboBox::from_id_salt("subject")
                .width(combo_width)
                .selected_text(&selected_subject)
                .show_ui(ui, |ui| {
                    for subject in &self.subjects {
                        if ui
                            .selectable_label(selected_subject == *subject, subject)
                            .clicked()
                            && selected_subject != *subject
                        {
                            action = ControlPanelAction::SubjectChanged(subject.clone());
                        }
                    }
                });
        });

        ui.add_space(5.0);

        let selected_course = view.selection.course.clone();
        let has_courses = !view.course_options.is_empty();
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Course:"));
            ui.add_enabled_ui(has_courses, |ui| {
                let text = selected_course
                    .clone()
                    .unwrap_or_else(|| "No courses".to_string());
                ComboBox::from_id_salt("course_number")
                    .width(combo_width)
                    .selected_text(text)
                    .show_ui(ui, |ui| {
                        for option in &view.course_options {
                            let is_selected = selected_course.as_deref() == Some(option.value.as_str());
                            if ui.selectable_label(is_selected, &option.label).clicked() && !is_selected {
                                action = ControlPanelAction::CourseChanged(option.value.clone());
                            }
                        }
                    });
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(view.selection.is_complete(), |ui| {
                let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }

                ui.add_space(8.0);

                let json_button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(json_button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SubjectChanged(String),
    CourseChanged(String),
    ExportPng,
    ExportJson,
}
