//! Static Chart Renderer
//! Draws a `Figure` to a PNG image with plotters.
//!
//! Layout:
//! 1. Optional title centered on top
//! 2. Bar area: instructors on the x-axis, grouped or stacked bars
//! 3. Legend with one colored box per grade range (upper right)

use super::figure::{BarMode, Figure};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use thiserror::Error;

const SLOT_WIDTH: f64 = 0.8;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct FigureRenderer;

impl FigureRenderer {
    /// Render a figure to in-memory PNG bytes.
    pub fn render_png(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, figure)?;
            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn draw(root: &DrawingArea<BitMapBackend<'_>, Shift>, figure: &Figure) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_err)?;

        let categories = figure.categories();
        let slots = categories.len().max(1);
        let y_max = match figure.y_extent() {
            extent if extent > 0.0 => extent * 1.1,
            _ => 1.0,
        };

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60);
        if let Some(title) = &figure.layout.title {
            builder.caption(title, ("sans-serif", 22));
        }

        let mut chart = builder
            .build_cartesian_2d(-0.5f64..(slots as f64 - 0.5), 0f64..y_max)
            .map_err(draw_err)?;

        let x_label = |x: &f64| {
            let rounded = x.round();
            if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            categories.get(rounded as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots + 1)
            .x_label_formatter(&x_label)
            .x_desc(figure.layout.xaxis.title.text.as_str())
            .y_desc(figure.layout.yaxis.title.text.as_str())
            .draw()
            .map_err(draw_err)?;

        if figure.is_empty() {
            return Ok(());
        }

        let n = figure.data.len();
        let group_width = SLOT_WIDTH / n as f64;
        let mut base = vec![0.0; slots];
        let label_style = TextStyle::from(("sans-serif", 12).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (t, trace) in figure.data.iter().enumerate() {
            let (r, g, b) = trace.grade.rgb();
            let color = RGBColor(r, g, b);

            let mut rects = Vec::new();
            let mut texts = Vec::new();
            for (i, (x, &y)) in trace.x.iter().zip(&trace.y).enumerate() {
                let Some(idx) = categories.iter().position(|c| c == x) else {
                    continue;
                };
                let center = idx as f64;

                match figure.layout.barmode {
                    BarMode::Group => {
                        let left = center - SLOT_WIDTH / 2.0 + t as f64 * group_width;
                        rects.push(Rectangle::new(
                            [(left, 0.0), (left + group_width, y)],
                            color.filled(),
                        ));
                    }
                    BarMode::Stack => {
                        let bottom = base[idx];
                        rects.push(Rectangle::new(
                            [
                                (center - SLOT_WIDTH / 2.0, bottom),
                                (center + SLOT_WIDTH / 2.0, bottom + y),
                            ],
                            color.filled(),
                        ));
                        if let Some(text) = trace.text.as_ref().and_then(|t| t.get(i)) {
                            if y > 0.0 {
                                texts.push(Text::new(
                                    text.clone(),
                                    (center, bottom + y / 2.0),
                                    label_style.clone(),
                                ));
                            }
                        }
                        base[idx] += y;
                    }
                }
            }

            chart
                .draw_series(rects)
                .map_err(draw_err)?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            chart.draw_series(texts).map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        Ok(())
    }
}
