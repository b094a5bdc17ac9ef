//! Stats module - Genre aggregation

mod calculator;
mod summary;

pub use calculator::{
    AnalysisError, GroupStats, StatsCalculator, DEFAULT_MIN_ANIME_COUNT, DEFAULT_TOP_ANIME,
    SAMPLE_ANIME_LIMIT, SIDE_GENRE_LIMIT, TOP_GENRE_LIMIT,
};
pub use summary::{GenreRanking, GenreSummary, RankingStats, SideGenreSummary};
