//! CSV Data Loader Module
//! Reads the anime dataset with an encoding fallback chain and cleans it into typed records.

use crate::data::encoding::TextEncoding;
use crate::data::record::{
    split_genres, Dataset, LoadStats, OptionalField, Record, GENRE_COLUMN, NAME_COLUMN,
    RATING_COLUMN, REQUIRED_COLUMNS,
};
use crate::data::table::CellValue;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 10000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing essential columns: {0:?}")]
    MissingColumns(Vec<String>),
}

/// Values of an optional column, typed by the dtype polars inferred for it.
enum OptionalValues {
    Int(Int64Chunked),
    Float(Float64Chunked),
    Text(StringChunked),
}

impl OptionalValues {
    fn from_column(column: &Column) -> Result<Self, PolarsError> {
        let values = match column.dtype() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Int(column.cast(&DataType::Int64)?.i64()?.clone()),
            DataType::Float32 | DataType::Float64 => {
                Self::Float(column.cast(&DataType::Float64)?.f64()?.clone())
            }
            _ => Self::Text(column.cast(&DataType::String)?.str()?.clone()),
        };
        Ok(values)
    }

    fn cell(&self, idx: usize) -> CellValue {
        match self {
            Self::Int(ca) => ca.get(idx).map(CellValue::Int).into(),
            Self::Float(ca) => ca
                .get(idx)
                .filter(|v| !v.is_nan())
                .map(CellValue::Float)
                .into(),
            Self::Text(ca) => ca.get(idx).map(CellValue::from).into(),
        }
    }
}

/// Handles CSV file loading with Polars for high performance.
pub struct DataLoader {
    file_path: PathBuf,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the dataset and clean it into records.
    ///
    /// Fails when the file cannot be parsed under any encoding or when a
    /// required column is absent. Individual bad rows are dropped and counted.
    pub fn load_and_clean(&self) -> Result<Dataset, LoaderError> {
        log::info!("Loading dataset...");
        let (df, encoding) = self.read_frame()?;
        log::info!("Dataset loaded successfully with {} rows", df.height());
        Self::clean_frame(df, encoding)
    }

    /// Parse the file, trying each encoding of the fallback chain in turn.
    fn read_frame(&self) -> Result<(DataFrame, String), LoaderError> {
        let bytes = std::fs::read(&self.file_path).map_err(|source| LoaderError::Io {
            path: self.file_path.clone(),
            source,
        })?;

        for encoding in TextEncoding::FALLBACK_ORDER {
            let Some(text) = encoding.decode(&bytes) else {
                log::debug!("Dataset is not valid {}", encoding.label());
                continue;
            };
            match Self::parse_text(text) {
                Ok(df) => {
                    log::info!(
                        "Dataset loaded successfully with encoding: {}",
                        encoding.label()
                    );
                    return Ok((df, encoding.label().to_string()));
                }
                Err(e) => {
                    log::warn!("Failed with encoding {}: {}", encoding.label(), e);
                }
            }
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_ignore_errors(true)
            .map_parse_options(|opts| opts.with_encoding(CsvEncoding::LossyUtf8))
            .try_into_reader_with_file_path(Some(self.file_path.clone()))?
            .finish()
            .inspect_err(|e| log::error!("Failed to load dataset: {}", e))?;
        log::info!("Dataset loaded with default encoding");
        Ok((df, "default".to_string()))
    }

    fn parse_text(text: String) -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()
    }

    /// Validate the schema and turn a parsed frame into cleaned records.
    pub(crate) fn clean_frame(df: DataFrame, encoding: String) -> Result<Dataset, LoaderError> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c == *required))
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            log::error!("Missing essential columns: {:?}", missing);
            return Err(LoaderError::MissingColumns(missing));
        }

        // Unparseable ratings become null rather than failing the load.
        let df = df
            .lazy()
            .with_columns([
                col(RATING_COLUMN).cast(DataType::Float64),
                col(NAME_COLUMN).cast(DataType::String),
                col(GENRE_COLUMN).cast(DataType::String),
            ])
            .collect()?;

        let ratings = df.column(RATING_COLUMN)?.f64()?;
        let names = df.column(NAME_COLUMN)?.str()?;
        let genres = df.column(GENRE_COLUMN)?.str()?;

        let optional_fields: Vec<OptionalField> = OptionalField::ALL
            .into_iter()
            .filter(|f| columns.iter().any(|c| c == f.column_name()))
            .collect();
        let optional_values = optional_fields
            .iter()
            .map(|f| Ok((*f, OptionalValues::from_column(df.column(f.column_name())?)?)))
            .collect::<Result<Vec<_>, PolarsError>>()?;

        let mut stats = LoadStats {
            rows_read: df.height(),
            encoding,
            ..LoadStats::default()
        };
        let mut records = Vec::with_capacity(df.height());

        for idx in 0..df.height() {
            let rating = ratings.get(idx).filter(|r| r.is_finite());
            let name = names.get(idx).filter(|s| !s.trim().is_empty());
            let genre = genres.get(idx).filter(|s| !s.trim().is_empty());
            let (Some(rating), Some(name), Some(genre)) = (rating, name, genre) else {
                stats.dropped_missing += 1;
                continue;
            };

            let genre_list = split_genres(genre);
            if genre_list.is_empty() {
                stats.dropped_empty_genres += 1;
                continue;
            }

            let extras: BTreeMap<OptionalField, CellValue> = optional_values
                .iter()
                .map(|(field, values)| (*field, values.cell(idx)))
                .collect();

            records.push(Record {
                name: name.to_string(),
                rating,
                genre: genre.to_string(),
                genres: genre_list,
                extras,
            });
        }

        log::info!(
            "Removed {} rows with missing data",
            stats.dropped_missing
        );
        log::info!(
            "Removed {} rows with empty genre lists",
            stats.dropped_empty_genres
        );
        log::info!("Final dataset has {} valid rows", records.len());

        Ok(Dataset {
            records,
            optional_fields,
            stats,
        })
    }
}
