//! Charts module - Chart data preparation and rendering

mod plotter;
mod renderer;

pub use plotter::{LineChartData, StackedBarData};
pub use renderer::{ChartRenderer, RenderError};
