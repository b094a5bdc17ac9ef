//! Statistics Calculator Module
//! Handles genre ranking, per-genre top lists and side-genre co-occurrence statistics.

use crate::data::{
    round_to, CellValue, Dataset, ExpandedRow, Record, Table, NAME_COLUMN, RATING_COLUMN,
};
use crate::stats::{GenreRanking, GenreSummary, RankingStats, SideGenreSummary};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use thiserror::Error;

/// Minimum number of anime a genre needs to be ranked.
pub const DEFAULT_MIN_ANIME_COUNT: usize = 10;
/// Number of genre names exposed as `top_genres`.
pub const TOP_GENRE_LIMIT: usize = 10;
pub const DEFAULT_TOP_ANIME: usize = 5;
pub const SIDE_GENRE_LIMIT: usize = 10;
pub const SAMPLE_ANIME_LIMIT: usize = 3;

const DISPLAY_DECIMALS: i32 = 2;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Genre '{genre}' has a non-finite average rating")]
    NonFiniteAverage { genre: String },
    #[error("Record '{name}' has a non-finite rating")]
    NonFiniteRating { name: String },
}

/// Count, mean and sample standard deviation of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
}

impl Default for GroupStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: None,
        }
    }
}

/// Ratings and names collected under one key.
struct RatingGroup<'a> {
    key: &'a str,
    ratings: Vec<f64>,
    names: Vec<&'a str>,
}

/// Group `(key, rating, name)` triples, keeping first-encounter key order.
fn group_by_key<'a>(items: impl IntoIterator<Item = (&'a str, f64, &'a str)>) -> Vec<RatingGroup<'a>> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<RatingGroup<'a>> = Vec::new();

    for (key, rating, name) in items {
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(RatingGroup {
                key,
                ratings: Vec::new(),
                names: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].ratings.push(rating);
        groups[slot].names.push(name);
    }

    groups
}

/// Handles statistical calculations over the cleaned dataset.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute count, mean and sample standard deviation for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> GroupStats {
        let n = values.len();
        if n == 0 {
            return GroupStats::default();
        }

        let mean = values.iter().mean();
        let std = values.iter().std_dev();

        GroupStats {
            count: n,
            mean,
            std: (n > 1 && std.is_finite()).then_some(std),
        }
    }

    /// Rank genres by average rating.
    ///
    /// Genres with fewer than `min_anime_count` rows are dropped. Equal
    /// averages keep the order in which the genres were first encountered.
    pub fn rank_genres(
        rows: &[ExpandedRow<'_>],
        min_anime_count: usize,
    ) -> Result<GenreRanking, AnalysisError> {
        let groups = group_by_key(rows.iter().map(|row| (row.genre, row.rating(), row.name())));

        let mut genres = Vec::new();
        for group in groups {
            let stats = Self::compute_descriptive_stats(&group.ratings);
            if !stats.mean.is_finite() {
                return Err(AnalysisError::NonFiniteAverage {
                    genre: group.key.to_string(),
                });
            }
            if stats.count >= min_anime_count {
                genres.push(GenreSummary {
                    genre: group.key.to_string(),
                    average_rating: stats.mean,
                    anime_count: stats.count,
                    rating_std: stats.std,
                });
            }
        }

        // sort_by is stable
        genres.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));

        let top_genres = genres
            .iter()
            .take(TOP_GENRE_LIMIT)
            .map(|g| g.genre.clone())
            .collect();

        log::info!(
            "Found {} genres with at least {} anime",
            genres.len(),
            min_anime_count
        );

        Ok(GenreRanking {
            min_anime_count,
            genres,
            top_genres,
        })
    }

    /// Highest rated anime carrying `genre`, projected onto the listing columns.
    ///
    /// Returns an empty table when nothing matches or the lookup fails.
    pub fn top_anime_for_genre(dataset: &Dataset, genre: &str, top_n: usize) -> Table {
        match Self::try_top_anime_for_genre(dataset, genre, top_n) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Error getting top anime for {}: {}", genre, e);
                Table::default()
            }
        }
    }

    fn try_top_anime_for_genre(
        dataset: &Dataset,
        genre: &str,
        top_n: usize,
    ) -> Result<Table, AnalysisError> {
        let mut matches: Vec<&Record> = dataset.records_with_genre(genre).collect();
        if matches.is_empty() {
            return Ok(Table::default());
        }
        if let Some(bad) = matches.iter().find(|r| !r.rating.is_finite()) {
            return Err(AnalysisError::NonFiniteRating {
                name: bad.name.clone(),
            });
        }

        matches.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        matches.truncate(top_n);

        let mut columns = vec![NAME_COLUMN, RATING_COLUMN];
        columns.extend(dataset.optional_fields.iter().map(|f| f.column_name()));
        let mut table = Table::new(columns);

        for record in matches {
            let mut row = vec![
                CellValue::Text(record.name.clone()),
                CellValue::Float(round_to(record.rating, DISPLAY_DECIMALS)),
            ];
            row.extend(
                dataset
                    .optional_fields
                    .iter()
                    .map(|f| record.field(*f).rounded(DISPLAY_DECIMALS)),
            );
            table.push_row(row);
        }

        Ok(table)
    }

    /// Statistics of the genres that appear alongside `main_genre`.
    ///
    /// The main genre itself is never reported. Results are limited to the
    /// best `SIDE_GENRE_LIMIT` side genres with at least `min_count` anime,
    /// with averages and deviations rounded for display.
    pub fn side_genres(dataset: &Dataset, main_genre: &str, min_count: usize) -> Vec<SideGenreSummary> {
        match Self::try_side_genres(dataset, main_genre, min_count) {
            Ok(summaries) => summaries,
            Err(e) => {
                log::error!("Error analyzing side genres for {}: {}", main_genre, e);
                Vec::new()
            }
        }
    }

    fn try_side_genres(
        dataset: &Dataset,
        main_genre: &str,
        min_count: usize,
    ) -> Result<Vec<SideGenreSummary>, AnalysisError> {
        let pairs = dataset.records_with_genre(main_genre).flat_map(|record| {
            record
                .genres
                .iter()
                .filter(move |g| g.as_str() != main_genre)
                .map(move |g| (g.as_str(), record.rating, record.name.as_str()))
        });
        let groups = group_by_key(pairs);

        let mut summaries = Vec::new();
        for group in groups {
            let stats = Self::compute_descriptive_stats(&group.ratings);
            if !stats.mean.is_finite() {
                return Err(AnalysisError::NonFiniteAverage {
                    genre: group.key.to_string(),
                });
            }
            if stats.count < min_count {
                continue;
            }
            summaries.push(SideGenreSummary {
                genre: group.key.to_string(),
                average_rating: stats.mean,
                anime_count: stats.count,
                rating_std: stats.std,
                sample_anime: group
                    .names
                    .iter()
                    .take(SAMPLE_ANIME_LIMIT)
                    .map(|n| n.to_string())
                    .collect(),
            });
        }

        summaries.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
        summaries.truncate(SIDE_GENRE_LIMIT);
        for summary in &mut summaries {
            summary.average_rating = round_to(summary.average_rating, DISPLAY_DECIMALS);
            summary.rating_std = summary.rating_std.map(|s| round_to(s, DISPLAY_DECIMALS));
        }

        Ok(summaries)
    }

    /// Count, extremes, mean and spread of the ranked genre averages.
    pub fn describe_ranking(ranking: &GenreRanking) -> RankingStats {
        let averages = ranking.averages();
        if averages.is_empty() {
            return RankingStats {
                genre_count: 0,
                highest_average: None,
                lowest_average: None,
                mean_average: None,
                average_std: None,
            };
        }

        let stats = Self::compute_descriptive_stats(&averages);
        RankingStats {
            genre_count: averages.len(),
            highest_average: Some(Statistics::max(averages.iter())),
            lowest_average: Some(Statistics::min(averages.iter())),
            mean_average: Some(stats.mean),
            average_std: stats.std,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataProcessor, OptionalField, Record};

    fn dataset(records: Vec<Record>) -> Dataset {
        Dataset::from_records(records, Vec::new())
    }

    fn rank(dataset: &Dataset, min: usize) -> GenreRanking {
        let rows = DataProcessor::expand_genres(dataset).unwrap();
        StatsCalculator::rank_genres(&rows, min).unwrap()
    }

    fn catalogue() -> Dataset {
        dataset(vec![
            Record::new("Gintama", 9.0, "Action, Comedy, Sci-Fi"),
            Record::new("Steins;Gate", 9.2, "Sci-Fi, Thriller"),
            Record::new("Haikyuu", 8.6, "Comedy, Sports"),
            Record::new("Cowboy Bebop", 8.8, "Action, Sci-Fi, Space"),
            Record::new("Trigun", 8.2, "Action, Comedy, Sci-Fi"),
            Record::new("K-On", 7.9, "Comedy, Slice of Life"),
            Record::new("Planetes", 8.4, "Sci-Fi, Space, Drama"),
        ])
    }

    #[test]
    fn test_rank_two_row_example() {
        let data = dataset(vec![
            Record::new("A", 8.0, "Action, Comedy"),
            Record::new("B", 6.0, "Action"),
        ]);

        let ranking = rank(&data, 1);

        let order: Vec<&str> = ranking.genres.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(order, vec!["Comedy", "Action"]);
        let action = ranking.get("Action").unwrap();
        assert!((action.average_rating - 7.0).abs() < 1e-6);
        assert_eq!(action.anime_count, 2);
        let comedy = ranking.get("Comedy").unwrap();
        assert!((comedy.average_rating - 8.0).abs() < 1e-6);
        assert_eq!(comedy.anime_count, 1);
        assert_eq!(comedy.rating_std, None);
        assert_eq!(ranking.top_genres, vec!["Comedy", "Action"]);
    }

    #[test]
    fn test_rank_counts_and_means_match_expanded_rows() {
        let data = catalogue();
        let rows = DataProcessor::expand_genres(&data).unwrap();
        let ranking = StatsCalculator::rank_genres(&rows, 1).unwrap();

        for summary in &ranking.genres {
            let ratings: Vec<f64> = rows
                .iter()
                .filter(|r| r.genre == summary.genre)
                .map(|r| r.rating())
                .collect();
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            assert_eq!(summary.anime_count, ratings.len());
            assert!((summary.average_rating - mean).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rank_is_sorted_and_filter_is_monotonic() {
        let data = catalogue();
        let mut previous = usize::MAX;
        for min in 0..6 {
            let ranking = rank(&data, min);
            assert!(ranking
                .genres
                .windows(2)
                .all(|w| w[0].average_rating >= w[1].average_rating));
            assert!(ranking.genres.iter().all(|g| g.anime_count >= min));
            assert!(ranking.len() <= previous);
            previous = ranking.len();
        }
    }

    #[test]
    fn test_rank_ties_keep_first_encountered_order() {
        let data = dataset(vec![
            Record::new("A", 7.0, "Mecha, Drama"),
            Record::new("B", 7.0, "Horror"),
        ]);

        let ranking = rank(&data, 1);

        let order: Vec<&str> = ranking.genres.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(order, vec!["Mecha", "Drama", "Horror"]);
    }

    #[test]
    fn test_rank_sample_std() {
        let data = dataset(vec![
            Record::new("A", 8.0, "Action"),
            Record::new("B", 6.0, "Action"),
        ]);

        let ranking = rank(&data, 1);

        let std = ranking.get("Action").unwrap().rating_std.unwrap();
        assert!((std - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_top_genres_capped_at_ten() {
        let records = (0..12)
            .map(|i| Record::new(format!("Show {i}"), 5.0 + i as f64 / 10.0, format!("G{i}")))
            .collect();
        let ranking = rank(&dataset(records), 1);

        assert_eq!(ranking.len(), 12);
        assert_eq!(ranking.top_genres.len(), TOP_GENRE_LIMIT);
        assert_eq!(ranking.top_genres[0], "G11");
    }

    #[test]
    fn test_top_anime_for_genre() {
        let data = catalogue();

        let table = StatsCalculator::top_anime_for_genre(&data, "Sci-Fi", 3);

        assert_eq!(table.columns, vec!["name", "rating"]);
        assert_eq!(table.len(), 3);
        let names: Vec<String> = table.column_values("name").iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["Steins;Gate", "Gintama", "Cowboy Bebop"]);
        let ratings: Vec<&CellValue> = table.column_values("rating");
        assert_eq!(ratings[0], &CellValue::Float(9.2));
    }

    #[test]
    fn test_top_anime_projects_present_optional_columns() {
        let records = vec![
            Record::new("A", 8.456, "Action")
                .with_field(OptionalField::Type, CellValue::from("TV"))
                .with_field(OptionalField::Score, CellValue::Float(8.123)),
            Record::new("B", 9.0, "Action")
                .with_field(OptionalField::Type, CellValue::from("Movie"))
                .with_field(OptionalField::Score, CellValue::Float(9.0)),
        ];
        let data = Dataset::from_records(records, vec![OptionalField::Type, OptionalField::Score]);

        let table = StatsCalculator::top_anime_for_genre(&data, "Action", 5);

        assert_eq!(table.columns, vec!["name", "rating", "type", "score"]);
        assert_eq!(table.rows[0][0], CellValue::from("B"));
        assert_eq!(table.rows[1][1], CellValue::Float(8.46));
        assert_eq!(table.rows[1][3], CellValue::Float(8.12));
    }

    #[test]
    fn test_top_anime_absent_genre_is_empty() {
        let table = StatsCalculator::top_anime_for_genre(&catalogue(), "Horror", 5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_side_genres_excludes_main_genre() {
        let data = catalogue();

        let side = StatsCalculator::side_genres(&data, "Sci-Fi", 1);

        assert!(side.iter().all(|s| s.genre != "Sci-Fi"));
        assert!(side.iter().all(|s| s.sample_anime.len() <= SAMPLE_ANIME_LIMIT));
        assert!(side
            .windows(2)
            .all(|w| w[0].average_rating >= w[1].average_rating));

        let action = side.iter().find(|s| s.genre == "Action").unwrap();
        assert_eq!(action.anime_count, 3);
        assert_eq!(action.average_rating, 8.67);
        assert_eq!(
            action.sample_anime,
            vec!["Gintama", "Cowboy Bebop", "Trigun"]
        );
    }

    #[test]
    fn test_side_genres_min_count_and_limits() {
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(Record::new(format!("Mecha {i}"), 7.0 + i as f64 / 10.0, "Mecha, Action"));
        }
        records.push(Record::new("Lonely", 9.0, "Mecha, Romance"));
        let data = dataset(records);

        let side = StatsCalculator::side_genres(&data, "Mecha", 3);

        assert_eq!(side.len(), 1);
        assert_eq!(side[0].genre, "Action");
        assert_eq!(side[0].anime_count, 5);
        assert_eq!(side[0].sample_anime.len(), SAMPLE_ANIME_LIMIT);
        assert_eq!(side[0].average_rating, 7.2);
    }

    #[test]
    fn test_side_genres_without_co_occurrence_is_empty() {
        let data = dataset(vec![Record::new("Solo", 8.0, "Horror")]);
        assert!(StatsCalculator::side_genres(&data, "Horror", 1).is_empty());
        assert!(StatsCalculator::side_genres(&data, "Action", 1).is_empty());
    }

    #[test]
    fn test_describe_ranking() {
        let data = dataset(vec![
            Record::new("A", 8.0, "Action, Comedy"),
            Record::new("B", 6.0, "Action"),
        ]);
        let ranking = rank(&data, 1);

        let stats = StatsCalculator::describe_ranking(&ranking);

        assert_eq!(stats.genre_count, 2);
        assert_eq!(stats.highest_average, Some(8.0));
        assert_eq!(stats.lowest_average, Some(7.0));
        assert!((stats.mean_average.unwrap() - 7.5).abs() < 1e-9);
        assert!(stats.average_std.is_some());

        let empty = StatsCalculator::describe_ranking(&GenreRanking::default());
        assert_eq!(empty.genre_count, 0);
        assert_eq!(empty.highest_average, None);
    }
}
