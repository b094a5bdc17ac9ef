//! Data Processor Module
//! Explodes each record's genre list into one row per (record, genre) pair.

use crate::data::record::{Dataset, Record};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Record '{name}' has a non-finite rating")]
    NonFiniteRating { name: String },
    #[error("Record at position {0} has a blank name")]
    BlankName(usize),
}

/// One (record, genre) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandedRow<'a> {
    pub record: &'a Record,
    pub genre: &'a str,
}

impl<'a> ExpandedRow<'a> {
    pub fn rating(&self) -> f64 {
        self.record.rating
    }

    pub fn name(&self) -> &'a str {
        &self.record.name
    }
}

/// Handles data transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Flatten genre lists into per-genre rows (genre explosion).
    ///
    /// Records that break the loader's guarantees abort the run.
    pub fn expand_genres(dataset: &Dataset) -> Result<Vec<ExpandedRow<'_>>, ProcessorError> {
        let mut rows = Vec::with_capacity(dataset.records.iter().map(|r| r.genres.len()).sum());

        for (idx, record) in dataset.records.iter().enumerate() {
            if !record.rating.is_finite() {
                return Err(ProcessorError::NonFiniteRating {
                    name: record.name.clone(),
                });
            }
            if record.name.trim().is_empty() {
                return Err(ProcessorError::BlankName(idx));
            }

            rows.extend(
                record
                    .genres
                    .iter()
                    .filter(|g| !g.is_empty())
                    .map(|genre| ExpandedRow {
                        record,
                        genre: genre.as_str(),
                    }),
            );
        }

        log::info!("Genres expanded successfully into {} rows", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_one_row_per_tag() {
        let dataset = Dataset::from_records(
            vec![
                Record::new("A", 8.0, "Action, Comedy"),
                Record::new("B", 6.0, "Action"),
                Record::new("C", 7.0, "Drama, Drama, Mecha"),
            ],
            Vec::new(),
        );

        let rows = DataProcessor::expand_genres(&dataset).unwrap();

        let expected: usize = dataset.records.iter().map(|r| r.genres.len()).sum();
        assert_eq!(rows.len(), expected);
        let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.name(), r.genre)).collect();
        assert_eq!(
            pairs,
            vec![
                ("A", "Action"),
                ("A", "Comedy"),
                ("B", "Action"),
                ("C", "Drama"),
                ("C", "Drama"),
                ("C", "Mecha"),
            ]
        );
    }

    #[test]
    fn test_expand_rejects_non_finite_rating() {
        let dataset = Dataset::from_records(vec![Record::new("A", f64::NAN, "Action")], Vec::new());
        assert!(matches!(
            DataProcessor::expand_genres(&dataset),
            Err(ProcessorError::NonFiniteRating { .. })
        ));
    }
}
