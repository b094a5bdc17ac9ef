//! Record Module
//! Typed rows of the cleaned anime dataset.

use crate::data::CellValue;
use std::collections::BTreeMap;
use std::fmt;

/// Required column holding the anime title.
pub const NAME_COLUMN: &str = "name";
/// Required column holding the user rating.
pub const RATING_COLUMN: &str = "rating";
/// Required column holding the comma-separated genre tags.
pub const GENRE_COLUMN: &str = "genre";

pub const REQUIRED_COLUMNS: [&str; 3] = [RATING_COLUMN, GENRE_COLUMN, NAME_COLUMN];

/// Columns surfaced in per-genre listings when the source file has them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalField {
    Episodes,
    Type,
    Members,
    Score,
    Popularity,
}

impl OptionalField {
    /// Projection order used by per-genre listings.
    pub const ALL: [OptionalField; 5] = [
        OptionalField::Episodes,
        OptionalField::Type,
        OptionalField::Members,
        OptionalField::Score,
        OptionalField::Popularity,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            OptionalField::Episodes => "episodes",
            OptionalField::Type => "type",
            OptionalField::Members => "members",
            OptionalField::Score => "score",
            OptionalField::Popularity => "popularity",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for OptionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One cleaned input row.
///
/// A record that survived cleaning always has a finite rating, a non-blank
/// name and at least one genre tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub rating: f64,
    /// Raw genre field as read from the file.
    pub genre: String,
    /// Tags split out of `genre`, in source order. Duplicates are kept.
    pub genres: Vec<String>,
    /// Values of the optional columns present in the source schema.
    pub extras: BTreeMap<OptionalField, CellValue>,
}

impl Record {
    /// Build a record from raw fields, splitting the genre string.
    pub fn new(name: impl Into<String>, rating: f64, genre: impl Into<String>) -> Self {
        let genre = genre.into();
        let genres = split_genres(&genre);
        Self {
            name: name.into(),
            rating,
            genre,
            genres,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: OptionalField, value: CellValue) -> Self {
        self.extras.insert(field, value);
        self
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Value of an optional column, `Missing` when absent.
    pub fn field(&self, field: OptionalField) -> CellValue {
        self.extras.get(&field).cloned().unwrap_or(CellValue::Missing)
    }
}

/// Split a comma-separated genre field into trimmed tags.
///
/// Empty tokens and literal `nan` tokens (any case) are discarded.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case("nan"))
        .map(str::to_string)
        .collect()
}

/// Bookkeeping produced while loading and cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub dropped_missing: usize,
    pub dropped_empty_genres: usize,
    pub encoding: String,
}

/// The cleaned dataset handed to the rest of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Optional columns found in the source schema, in projection order.
    pub optional_fields: Vec<OptionalField>,
    pub stats: LoadStats,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>, optional_fields: Vec<OptionalField>) -> Self {
        let rows_read = records.len();
        Self {
            records,
            optional_fields,
            stats: LoadStats {
                rows_read,
                ..LoadStats::default()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records tagged with `genre`, in dataset order.
    pub fn records_with_genre<'a>(&'a self, genre: &'a str) -> impl Iterator<Item = &'a Record> {
        self.records.iter().filter(move |r| r.has_genre(genre))
    }
}
