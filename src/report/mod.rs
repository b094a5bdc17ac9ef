//! Report module - Markdown report, text listings and output folder handling

mod generator;
mod markdown;
mod output;
mod text_grid;

pub use generator::{
    ReportGenerator, ReportOptions, ReportSummary, REPORT_FILE_NAME, REPORT_TIMESTAMP_FORMAT,
};
pub use markdown::{format_thousands, markdown_table, MarkdownDocument};
pub use output::{file_slug, save_to_file, OutputLayout, ReportError, FOLDER_TIMESTAMP_FORMAT};
pub use text_grid::grid_table;
