//! Static Chart Renderer
//! Draws bar charts and table images with plotters into an RGB buffer and saves them as PNG.
//!
//! Layout of a bar chart:
//! 1. Caption centered on top
//! 2. One colored bar per category with its value printed above it
//! 3. Category names under the X axis, value scale on the Y axis
//!
//! Empty inputs produce a placeholder panel instead of a chart.

use crate::data::Table;
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

/// Pixel size of bar charts and placeholder panels.
pub const CHART_SIZE: (u32, u32) = (1400, 800);

pub const NO_DATA_MESSAGE: &str = "No data available";

const FONT: &str = "sans-serif";
const HEADER_BLUE: RGBColor = RGBColor(79, 129, 189);
const STRIPE_GRAY: RGBColor = RGBColor(240, 240, 240);
const BORDER_GRAY: RGBColor = RGBColor(190, 190, 190);

// Table image metrics
const TABLE_MARGIN: u32 = 30;
const TABLE_TITLE_H: u32 = 60;
const TABLE_ROW_H: u32 = 34;
const TABLE_CHAR_W: u32 = 9;
const TABLE_CELL_PAD: u32 = 24;
const TABLE_MIN_W: u32 = 800;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

impl RenderError {
    fn drawing<E: Display>(err: E) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

impl BarDatum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Caption and axis titles of a bar chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Pixel geometry of a rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub column_widths: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

impl TableLayout {
    /// Size each column to its widest cell, header included.
    pub fn compute(table: &Table) -> Self {
        let column_widths: Vec<u32> = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let widest = table
                    .rows
                    .iter()
                    .map(|row| row[idx].to_string().chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0) as u32;
                widest * TABLE_CHAR_W + TABLE_CELL_PAD
            })
            .collect();

        let content_w: u32 = column_widths.iter().sum();
        let width = (content_w + 2 * TABLE_MARGIN).max(TABLE_MIN_W);
        let height = TABLE_TITLE_H + (table.rows.len() as u32 + 1) * TABLE_ROW_H + 2 * TABLE_MARGIN;

        Self {
            column_widths,
            width,
            height,
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a bar chart with value labels to a PNG file.
    pub fn render_bar_chart(
        bars: &[BarDatum],
        labels: ChartLabels<'_>,
        path: &Path,
    ) -> Result<(), RenderError> {
        let (width, height) = CHART_SIZE;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            if bars.is_empty() {
                Self::draw_placeholder(&root, labels.title)?;
            } else {
                Self::draw_bars(&root, bars, labels)?;
            }
            root.present().map_err(RenderError::drawing)?;
        }
        Self::save_png(buffer, width, height, path)
    }

    /// Render a table as an image with a colored header row.
    pub fn render_table_image(table: &Table, title: &str, path: &Path) -> Result<(), RenderError> {
        if table.is_empty() || table.columns.is_empty() {
            let (width, height) = CHART_SIZE;
            let mut buffer = vec![0u8; (width * height * 3) as usize];
            {
                let root =
                    BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
                Self::draw_placeholder(&root, title)?;
                root.present().map_err(RenderError::drawing)?;
            }
            return Self::save_png(buffer, width, height, path);
        }

        let layout = TableLayout::compute(table);
        let mut buffer = vec![0u8; (layout.width * layout.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (layout.width, layout.height))
                .into_drawing_area();
            Self::draw_table(&root, table, title, &layout)?;
            root.present().map_err(RenderError::drawing)?;
        }
        Self::save_png(buffer, layout.width, layout.height, path)
    }

    fn draw_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        bars: &[BarDatum],
        labels: ChartLabels<'_>,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(RenderError::drawing)?;

        let n = bars.len();
        let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        // Headroom for the value labels
        let y_top = if max > 0.0 { max * 1.12 } else { 1.0 };

        let mut chart = ChartBuilder::on(root)
            .caption(labels.title, (FONT, 30).into_font())
            .margin(20)
            .x_label_area_size(80)
            .y_label_area_size(70)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..y_top)
            .map_err(RenderError::drawing)?;

        let names: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        let x_formatter = |value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(idx) => names.get(*idx).map(|s| s.to_string()).unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&x_formatter)
            .x_desc(labels.x_label)
            .y_desc(labels.y_label)
            .axis_desc_style((FONT, 18))
            .label_style((FONT, 14))
            .draw()
            .map_err(RenderError::drawing)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(idx, bar)| {
                let color = Palette99::pick(idx).mix(0.85);
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(idx), 0.0),
                        (SegmentValue::Exact(idx + 1), bar.value),
                    ],
                    color.filled(),
                );
                rect.set_margin(0, 0, 12, 12);
                rect
            }))
            .map_err(RenderError::drawing)?;

        let value_style = TextStyle::from((FONT, 16).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(bars.iter().enumerate().map(|(idx, bar)| {
                Text::new(
                    format!("{:.2}", bar.value),
                    (SegmentValue::CenterOf(idx), bar.value + y_top * 0.01),
                    value_style.clone(),
                )
            }))
            .map_err(RenderError::drawing)?;

        Ok(())
    }

    fn draw_table<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        table: &Table,
        title: &str,
        layout: &TableLayout,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(RenderError::drawing)?;

        let center = Pos::new(HPos::Center, VPos::Center);
        let title_style = TextStyle::from((FONT, 24).into_font()).color(&BLACK).pos(center);
        root.draw(&Text::new(
            title,
            ((layout.width / 2) as i32, (TABLE_MARGIN + TABLE_TITLE_H / 2) as i32),
            title_style,
        ))
        .map_err(RenderError::drawing)?;

        let content_w: u32 = layout.column_widths.iter().sum();
        let left = ((layout.width - content_w) / 2) as i32;
        let top = (TABLE_MARGIN + TABLE_TITLE_H) as i32;
        let header_style = TextStyle::from((FONT, 14).into_font()).color(&WHITE).pos(center);
        let cell_style = TextStyle::from((FONT, 13).into_font()).color(&BLACK).pos(center);

        let header: Vec<String> = table.columns.clone();
        let body = table
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<_>>());

        for (row_idx, cells) in std::iter::once(header).chain(body).enumerate() {
            let y0 = top + (row_idx as u32 * TABLE_ROW_H) as i32;
            let y1 = y0 + TABLE_ROW_H as i32;
            let (fill, style) = match row_idx {
                0 => (HEADER_BLUE, &header_style),
                i if i % 2 == 0 => (STRIPE_GRAY, &cell_style),
                _ => (WHITE, &cell_style),
            };

            let mut x0 = left;
            for (col_idx, text) in cells.iter().enumerate() {
                let x1 = x0 + layout.column_widths[col_idx] as i32;
                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], fill.filled()))
                    .map_err(RenderError::drawing)?;
                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BORDER_GRAY.stroke_width(1)))
                    .map_err(RenderError::drawing)?;
                root.draw(&Text::new(
                    text.as_str(),
                    ((x0 + x1) / 2, (y0 + y1) / 2),
                    style.clone(),
                ))
                .map_err(RenderError::drawing)?;
                x0 = x1;
            }
        }

        Ok(())
    }

    /// Bordered "no data" panel.
    ///
    /// Missing system fonts only drop the text; the panel is still produced.
    fn draw_placeholder<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(RenderError::drawing)?;

        let (w, h) = root.dim_in_pixel();
        let (w, h) = (w as i32, h as i32);
        root.draw(&Rectangle::new(
            [(40, 40), (w - 40, h - 40)],
            BORDER_GRAY.stroke_width(2),
        ))
        .map_err(RenderError::drawing)?;

        let center = Pos::new(HPos::Center, VPos::Center);
        for (text, size, y) in [(title, 30, h / 4), (NO_DATA_MESSAGE, 26, h / 2)] {
            let style = TextStyle::from((FONT, size).into_font()).color(&BLACK).pos(center);
            if let Err(e) = root.draw(&Text::new(text, (w / 2, y), style)) {
                log::warn!("Placeholder text skipped: {}", e);
            }
        }

        Ok(())
    }

    fn save_png(buffer: Vec<u8>, width: u32, height: u32, path: &Path) -> Result<(), RenderError> {
        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::BufferSize { width, height })?;
        image.save(path)?;
        log::info!("Image saved: {}", path.display());
        Ok(())
    }
}
