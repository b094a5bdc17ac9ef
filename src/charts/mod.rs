//! Charts module - Static chart and table image rendering

mod renderer;

pub use renderer::{
    BarDatum, ChartLabels, RenderError, StaticChartRenderer, TableLayout, CHART_SIZE,
    NO_DATA_MESSAGE,
};
