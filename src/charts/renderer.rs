//! Static Chart Renderer
//! Draws the stacked bar and price index charts into in-memory RGB images.
//!
//! Layout of the bar charts:
//! 1. Plot area: title, stacked bars per year, year labels at 45 degrees
//! 2. Legend column on the right: "Primary Program" and one swatch per bucket
//!
//! plotters only rotates text by right angles, so the year labels are drawn
//! into their own small buffers and rotated onto the finished image.

use super::plotter::{bucket_color, LineChartData, StackedBarData};
use crate::stats::BASE_INDEX_VALUE;
use image::{Rgb, RgbImage};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

const FONT: &str = "sans-serif";
const LEGEND_WIDTH: u32 = 420;
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
/// Bars cover 60% of their year slot.
const BAR_HALF_WIDTH: f64 = 0.3;
const TICK_LABEL_ANGLE: f64 = 45.0;
const TICK_LABEL_SIZE: u32 = 14;
const TICK_LENGTH: i32 = 5;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("Chart size {0}x{1} is too small")]
    TooSmall(u32, u32),
    #[error("Rendered buffer does not match a {0}x{1} image")]
    Buffer(u32, u32),
}

fn draw_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Round up to a value that makes a tidy axis end.
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let normalized = value / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Paint the non-background pixels of `label` onto `canvas`, rotated
/// counter-clockwise by `degrees` about the label's right-middle point, which
/// lands on `anchor`. Sampling is nearest-neighbour from the destination side,
/// so the rotated text has no holes.
fn blit_rotated(canvas: &mut RgbImage, label: &RgbImage, anchor: (i32, i32), degrees: f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (width, height) = label.dimensions();
    let (pivot_x, pivot_y) = (width as f64, height as f64 / 2.0);
    let reach = (width as f64).hypot(height as f64).ceil() as i32;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let (x, y) = (anchor.0 + dx, anchor.1 + dy);
            if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
                continue;
            }

            let (fx, fy) = (dx as f64 + 0.5, dy as f64 + 0.5);
            let src_x = pivot_x + cos * fx - sin * fy;
            let src_y = pivot_y + sin * fx + cos * fy;
            if src_x < 0.0 || src_y < 0.0 || src_x >= width as f64 || src_y >= height as f64 {
                continue;
            }

            let pixel = *label.get_pixel(src_x as u32, src_y as u32);
            if pixel != BACKGROUND {
                canvas.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render a stacked bar chart with one bar per year.
    pub fn render_stacked_bar(
        data: &StackedBarData,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        if width <= LEGEND_WIDTH + 200 || height < 300 {
            return Err(RenderError::TooSmall(width, height));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        let mut tick_anchors = Vec::with_capacity(data.years.len());
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            let (plot_area, legend_area) = root.split_horizontally(width - LEGEND_WIDTH);

            let slots = data.years.len().max(1) as f64;
            let (low, high) = data.value_range();
            let y_min = if low < 0.0 { -nice_ceiling(-low) } else { 0.0 };
            let y_max = nice_ceiling(high * 1.05);

            // Year i is centred on x = i
            let mut chart = ChartBuilder::on(&plot_area)
                .caption(&data.title, (FONT, 24))
                .margin(20)
                .x_label_area_size(90)
                .y_label_area_size(80)
                .build_cartesian_2d(-0.5..slots - 0.5, y_min..y_max)
                .map_err(draw_error)?;

            // Year ticks and labels are drawn separately below
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Year")
                .y_desc(&data.y_label)
                .axis_desc_style((FONT, 18))
                .x_labels(0)
                .y_label_formatter(&|v: &f64| format!("{:.1}", v))
                .draw()
                .map_err(draw_error)?;

            chart
                .draw_series(data.segments().into_iter().map(|segment| {
                    let x = segment.slot as f64;
                    Rectangle::new(
                        [
                            (x - BAR_HALF_WIDTH, segment.bottom),
                            (x + BAR_HALF_WIDTH, segment.top),
                        ],
                        bucket_color(segment.bucket).filled(),
                    )
                }))
                .map_err(draw_error)?;

            for slot in 0..data.years.len() {
                let (x, y) = chart.backend_coord(&(slot as f64, y_min));
                root.draw(&PathElement::new(vec![(x, y), (x, y + TICK_LENGTH)], BLACK))
                    .map_err(draw_error)?;
                tick_anchors.push((x, y + TICK_LENGTH + 2));
            }

            Self::draw_legend(&legend_area, data)?;
            root.present().map_err(draw_error)?;
        }

        let mut image =
            RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;

        for (year, &anchor) in data.years.iter().zip(&tick_anchors) {
            let label = Self::render_text(&year.to_string(), TICK_LABEL_SIZE)?;
            blit_rotated(&mut image, &label, anchor, TICK_LABEL_ANGLE);
        }

        Ok(image)
    }

    /// Render `text` in black on a white buffer just large enough to hold it.
    fn render_text(text: &str, size: u32) -> Result<RgbImage, RenderError> {
        let style = (FONT, size).into_font().color(&BLACK);
        // Generous bounds; trimmed to the measured extent below
        let bound = (size * (text.len() as u32 + 1), size * 2);

        let mut scratch = vec![255u8; bound.0 as usize * bound.1 as usize * 3];
        let (text_width, text_height) = {
            let area = BitMapBackend::with_buffer(&mut scratch, bound).into_drawing_area();
            area.estimate_text_size(text, &style).map_err(draw_error)?
        };
        let (width, height) = (text_width.max(1) + 2, text_height.max(1) + 2);

        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let area = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            area.draw(&Text::new(text.to_string(), (1, 1), style))
                .map_err(draw_error)?;
            area.present().map_err(draw_error)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))
    }

    fn draw_legend<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        data: &StackedBarData,
    ) -> Result<(), RenderError> {
        let swatch = 16;
        let row_height = 26;
        let top = 70;

        area.draw(&Text::new("Primary Program", (10, top - 34), (FONT, 18).into_font()))
            .map_err(draw_error)?;

        for (row, series) in data.series.iter().enumerate() {
            let y = top + row as i32 * row_height;
            area.draw(&Rectangle::new(
                [(10, y), (10 + swatch, y + swatch)],
                bucket_color(series.bucket).filled(),
            ))
            .map_err(draw_error)?;
            area.draw(&Text::new(
                series.bucket.name(),
                (18 + swatch, y),
                (FONT, 15).into_font(),
            ))
            .map_err(draw_error)?;
        }

        Ok(())
    }

    /// Render the price index as a line with a marker per observation.
    pub fn render_index_line(
        data: &LineChartData,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, RenderError> {
        if width < 200 || height < 200 {
            return Err(RenderError::TooSmall(width, height));
        }

        let first_year = data.points.first().map(|p| p.0).unwrap_or(0);
        let last_year = data.points.last().map(|p| p.0).unwrap_or(first_year);
        let (low, high) = data
            .points
            .iter()
            .fold((BASE_INDEX_VALUE, BASE_INDEX_VALUE), |(lo, hi), &(_, v)| {
                (lo.min(v), hi.max(v))
            });
        let pad = ((high - low) * 0.05).max(1.0);

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&data.title, (FONT, 24))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d(first_year - 1..last_year + 1, (low - pad)..(high + pad))
                .map_err(draw_error)?;

            chart
                .configure_mesh()
                .x_desc(&data.x_label)
                .y_desc(&data.y_label)
                .axis_desc_style((FONT, 18))
                .x_label_formatter(&|year: &i32| year.to_string())
                .y_label_formatter(&|v: &f64| format!("{:.0}", v))
                .draw()
                .map_err(draw_error)?;

            chart
                .draw_series(LineSeries::new(
                    data.points.iter().copied(),
                    LINE_COLOR.stroke_width(2),
                ))
                .map_err(draw_error)?;
            chart
                .draw_series(
                    data.points
                        .iter()
                        .map(|&point| Circle::new(point, 4, LINE_COLOR.filled())),
                )
                .map_err(draw_error)?;

            root.present().map_err(draw_error)?;
        }

        RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))
    }
}
