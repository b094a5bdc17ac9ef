//! Aggregate result types produced by the statistics calculator.

use serde::Serialize;

/// Rating statistics for one genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSummary {
    pub genre: String,
    pub average_rating: f64,
    pub anime_count: usize,
    /// Sample standard deviation; `None` when fewer than two ratings.
    pub rating_std: Option<f64>,
}

/// Genres that passed the minimum-count filter, best average first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenreRanking {
    pub min_anime_count: usize,
    pub genres: Vec<GenreSummary>,
    /// Names of the leading genres picked for detailed reporting.
    pub top_genres: Vec<String>,
}

impl GenreRanking {
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn get(&self, genre: &str) -> Option<&GenreSummary> {
        self.genres.iter().find(|g| g.genre == genre)
    }

    pub fn averages(&self) -> Vec<f64> {
        self.genres.iter().map(|g| g.average_rating).collect()
    }
}

/// Statistics for a genre co-occurring with a main genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideGenreSummary {
    pub genre: String,
    pub average_rating: f64,
    pub anime_count: usize,
    pub rating_std: Option<f64>,
    /// First few anime carrying both genres, in dataset order.
    pub sample_anime: Vec<String>,
}

/// Descriptive statistics over the ranked genre averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankingStats {
    pub genre_count: usize,
    pub highest_average: Option<f64>,
    pub lowest_average: Option<f64>,
    pub mean_average: Option<f64>,
    /// Sample standard deviation of the averages; `None` below two genres.
    pub average_std: Option<f64>,
}
