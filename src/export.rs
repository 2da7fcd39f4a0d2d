//! Chart Export Module
//! Writes both dashboard figures as PNG images and plotly JSON files.

use crate::charts::{Figure, FigureRenderer, RenderError};
use crate::dashboard::DashboardView;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// PNG size of exported charts
pub const EXPORT_WIDTH: u32 = 1400;
pub const EXPORT_HEIGHT: u32 = 800;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Json => "json",
        }
    }
}

/// File stem for a view, e.g. `STAT_100`. Characters unsafe in file names become `_`.
pub fn file_stem(view: &DashboardView) -> String {
    view.caption()
        .unwrap_or_else(|| "no_selection".to_string())
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn write_figure(figure: &Figure, path: &Path, format: ExportFormat) -> Result<(), RenderError> {
    let bytes = match format {
        ExportFormat::Png => FigureRenderer::render_png(figure, EXPORT_WIDTH, EXPORT_HEIGHT)?,
        ExportFormat::Json => figure.to_json()?.into_bytes(),
    };
    fs::write(path, bytes)?;
    Ok(())
}

/// Export both figures of `view` into `dir`, returning the written paths.
pub fn export_view(
    view: &DashboardView,
    dir: &Path,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, RenderError> {
    fs::create_dir_all(dir)?;

    let stem = file_stem(view);
    let mut written = Vec::new();

    for format in formats {
        for (kind, figure) in [
            ("distribution", &view.distribution),
            ("percentage", &view.percentage),
        ] {
            let path = dir.join(format!("{}_{}.{}", stem, kind, format.extension()));
            write_figure(figure, &path, *format)?;
            info!(path = %path.display(), "exported chart");
            written.push(path);
        }
    }

    Ok(written)
}
