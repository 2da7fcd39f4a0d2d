//! Grade Dashboard - Course Grade Distribution Viewer
//!
//! Loads the grade dataset at startup and shows the interactive dashboard,
//! or writes the charts of one selection to disk with `--export`.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use grade_dashboard::config::{init_logging, Cli};
use grade_dashboard::dashboard::Dashboard;
use grade_dashboard::data::GradeDataset;
use grade_dashboard::export::{export_view, ExportFormat};
use grade_dashboard::gui::DashboardApp;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let source = cli.data_source();
    let dataset = GradeDataset::load(&source)
        .inspect_err(|e| error!(error = %e, %source, "dataset unavailable, not starting"))
        .with_context(|| format!("failed to load grade dataset from {}", source))?;

    let dashboard = Dashboard::new(Arc::new(dataset));
    let mut view = dashboard.initial_view(&cli.subject)?;
    if let (Some(course), Some(subject)) = (&cli.course, view.selection.subject.clone()) {
        view = dashboard.select_course(&subject, course)?;
    }

    if let Some(dir) = &cli.export {
        let written = export_view(&view, dir, &[ExportFormat::Png, ExportFormat::Json])
            .with_context(|| format!("failed to export charts to {}", dir.display()))?;
        info!(files = written.len(), "export finished");
        return Ok(());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Grade Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Grade Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dashboard, view)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {}", e))
}
