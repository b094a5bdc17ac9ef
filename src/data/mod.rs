//! Data module - CSV loading, cleaning and genre expansion

mod encoding;
mod loader;
mod processor;
mod record;
mod table;

pub use encoding::TextEncoding;
pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, ExpandedRow, ProcessorError};
pub use record::{
    split_genres, Dataset, LoadStats, OptionalField, Record, GENRE_COLUMN, NAME_COLUMN,
    RATING_COLUMN,
};
pub use table::{round_to, CellValue, Table};
