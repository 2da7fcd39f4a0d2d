//! Charts module - Figure building and rendering

mod builder;
mod figure;
mod plotter;
mod renderer;

pub use builder::{distribution_chart, percentage_chart};
pub use figure::{Axis, AxisTitle, BarMode, BarTrace, Figure, Layout, Margin, Marker};
pub use plotter::FigurePlotter;
pub use renderer::{FigureRenderer, RenderError};
