//! Comprehensive report assembly.
//!
//! Every artifact except the Markdown report itself is best effort: a failed
//! chart or listing is logged, recorded in [`ReportSummary::failed`] and the
//! report carries on.

use crate::charts::{BarDatum, ChartLabels, StaticChartRenderer};
use crate::config::AnalysisConfig;
use crate::data::{round_to, CellValue, Dataset, Table};
use crate::report::markdown::{format_thousands, markdown_table, MarkdownDocument};
use crate::report::output::{
    file_slug, save_to_file, OutputLayout, ReportError, ANIME_LISTS_DIR, CHARTS_DIR, TABLES_DIR,
    TEXT_REPORTS_DIR,
};
use crate::report::text_grid::grid_table;
use crate::stats::{GenreRanking, SideGenreSummary, StatsCalculator, DEFAULT_TOP_ANIME};
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "comprehensive_report.md";
/// Timestamp format shown inside the report.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TOP_GENRES_CHART: &str = "top_genres_chart.png";
const TOP_GENRES_TEXT: &str = "top_genres.txt";
const STATISTICS_TEXT: &str = "statistics.txt";
const GENRE_SUMMARY_JSON: &str = "genre_summary.json";
const COMBINATION_LIMIT: usize = 3;

/// How much of the ranking goes into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n_genres: usize,
    pub top_anime_per_genre: usize,
    pub side_genre_min_count: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n_genres: 5,
            top_anime_per_genre: DEFAULT_TOP_ANIME,
            side_genre_min_count: 3,
        }
    }
}

impl From<&AnalysisConfig> for ReportOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            top_n_genres: config.top_n_genres,
            top_anime_per_genre: config.top_anime_per_genre,
            side_genre_min_count: config.side_genre_min_count,
        }
    }
}

/// What a report run produced.
#[derive(Debug, Clone, Default)]
pub struct ReportSummary {
    pub output_dir: PathBuf,
    pub report_path: PathBuf,
    pub written: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

#[derive(Default)]
struct Artifacts {
    written: Vec<PathBuf>,
    failed: Vec<PathBuf>,
}

impl Artifacts {
    fn record<E: Display>(&mut self, path: PathBuf, result: Result<(), E>) {
        match result {
            Ok(()) => self.written.push(path),
            Err(e) => {
                log::error!("Failed to write {}: {}", path.display(), e);
                self.failed.push(path);
            }
        }
    }
}

pub struct ReportGenerator {
    layout: OutputLayout,
    options: ReportOptions,
    report_time: String,
}

impl ReportGenerator {
    pub fn new(layout: OutputLayout, options: ReportOptions, report_time: impl Into<String>) -> Self {
        Self {
            layout,
            options,
            report_time: report_time.into(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write every artifact and the Markdown report that references them.
    pub fn generate(
        &self,
        dataset: &Dataset,
        ranking: &GenreRanking,
    ) -> Result<ReportSummary, ReportError> {
        let mut artifacts = Artifacts::default();
        let mut doc = MarkdownDocument::new();

        self.write_header(&mut doc, dataset, ranking);
        let top_genres = self.write_top_genres(&mut doc, ranking, &mut artifacts);

        doc.heading(2, "Detailed Genre Analysis");
        let detailed = ranking.top_genres.iter().take(self.options.top_n_genres);
        for (i, genre) in detailed.enumerate() {
            self.write_genre_section(&mut doc, dataset, i + 1, genre, &mut artifacts);
        }

        self.write_statistics(&mut doc, dataset, ranking, &mut artifacts);
        self.write_closing(&mut doc, dataset);

        let report_path = self.layout.root.join(REPORT_FILE_NAME);
        save_to_file(&report_path, &doc.render())?;

        let path = self.layout.text_reports.join(TOP_GENRES_TEXT);
        let result = save_to_file(&path, &grid_table(&top_genres));
        artifacts.record(path, result);

        let path = self.layout.text_reports.join(GENRE_SUMMARY_JSON);
        let result = serde_json::to_string_pretty(ranking)
            .map_err(ReportError::from)
            .and_then(|json| save_to_file(&path, &json));
        artifacts.record(path, result);

        log::info!(
            "Report complete: {} artifacts written, {} failed",
            artifacts.written.len(),
            artifacts.failed.len()
        );

        Ok(ReportSummary {
            output_dir: self.layout.root.clone(),
            report_path,
            written: artifacts.written,
            failed: artifacts.failed,
        })
    }

    fn write_header(&self, doc: &mut MarkdownDocument, dataset: &Dataset, ranking: &GenreRanking) {
        doc.heading(1, "Anime Genre Analysis Report")
            .line(format!("**Analysis Date:** {}  ", self.report_time))
            .line(format!("**Total Anime:** {}  ", format_thousands(dataset.len())))
            .line(format!("**Total Genres:** {}  ", ranking.len()))
            .blank();

        doc.heading(2, "Executive Summary")
            .line(
                "This report analyzes how anime genres compare by rating and how they \
                 combine with each other. It covers:",
            )
            .line("- The highest rated genres")
            .line("- The best anime within each leading genre")
            .line("- Genre combination analysis")
            .line("- Side genre recommendations")
            .blank();
    }

    /// Returns the displayed table so it can also be saved as text.
    fn write_top_genres(
        &self,
        doc: &mut MarkdownDocument,
        ranking: &GenreRanking,
        artifacts: &mut Artifacts,
    ) -> Table {
        let leading = &ranking.genres[..ranking.len().min(self.options.top_n_genres)];

        let mut table = Table::new(["Genre", "Average Rating", "Anime Count"]);
        for summary in leading {
            table.push_row(vec![
                summary.genre.as_str().into(),
                round_to(summary.average_rating, 2).into(),
                summary.anime_count.into(),
            ]);
        }

        doc.heading(2, "Highest Rated Genres")
            .block(markdown_table(&table))
            .image("Top Genres Chart", &relative(CHARTS_DIR, TOP_GENRES_CHART))
            .block(format!("Text version: `{}/{}`", TEXT_REPORTS_DIR, TOP_GENRES_TEXT));

        let bars: Vec<BarDatum> = leading
            .iter()
            .map(|g| BarDatum::new(g.genre.as_str(), round_to(g.average_rating, 2)))
            .collect();
        let title = format!("Top {} Highest Rated Genres", self.options.top_n_genres);
        let path = self.layout.charts.join(TOP_GENRES_CHART);
        let result = StaticChartRenderer::render_bar_chart(
            &bars,
            ChartLabels {
                title: &title,
                x_label: "Genres",
                y_label: "Average Rating",
            },
            &path,
        );
        artifacts.record(path, result);

        table
    }

    fn write_genre_section(
        &self,
        doc: &mut MarkdownDocument,
        dataset: &Dataset,
        position: usize,
        genre: &str,
        artifacts: &mut Artifacts,
    ) {
        let slug = file_slug(genre);
        let top_n = self.options.top_anime_per_genre;
        doc.heading(3, &format!("{}. {}", position, genre));

        let top_anime = StatsCalculator::top_anime_for_genre(dataset, genre, top_n);
        let list_name = format!("top_anime_{}.txt", slug);
        let image_name = format!("top_anime_{}.png", slug);

        doc.heading(4, &format!("Top {} {} Anime", top_n, genre))
            .block(markdown_table(&top_anime))
            .image(&format!("Top Anime for {}", genre), &relative(TABLES_DIR, &image_name))
            .block(format!("Text version: `{}/{}`", ANIME_LISTS_DIR, list_name));

        let path = self.layout.anime_lists.join(&list_name);
        let result = save_to_file(&path, &grid_table(&top_anime));
        artifacts.record(path, result);

        let path = self.layout.tables.join(&image_name);
        let title = format!("{} - Top {} Anime", genre, top_n);
        let result = StaticChartRenderer::render_table_image(&top_anime, &title, &path);
        artifacts.record(path, result);

        let side_genres = StatsCalculator::side_genres(dataset, genre, self.options.side_genre_min_count);
        let side_table = side_genre_table(&side_genres);
        let chart_name = format!("side_genres_{}.png", slug);
        let text_name = format!("side_genres_{}.txt", slug);

        doc.heading(4, &format!("Best Combinations with {}", genre))
            .block(markdown_table(&side_table))
            .image(&format!("Side Genres for {}", genre), &relative(CHARTS_DIR, &chart_name))
            .block(format!("Text version: `{}/{}`", TEXT_REPORTS_DIR, text_name));

        let bars: Vec<BarDatum> = side_genres
            .iter()
            .map(|s| BarDatum::new(s.genre.as_str(), s.average_rating))
            .collect();
        let title = format!("Most Loved Side Genres with {}", genre);
        let path = self.layout.charts.join(&chart_name);
        let result = StaticChartRenderer::render_bar_chart(
            &bars,
            ChartLabels {
                title: &title,
                x_label: "Side Genres",
                y_label: "Average Rating",
            },
            &path,
        );
        artifacts.record(path, result);

        let path = self.layout.text_reports.join(&text_name);
        let result = save_to_file(&path, &grid_table(&side_table));
        artifacts.record(path, result);

        if !side_genres.is_empty() {
            doc.heading(4, "Sample Recommendations");
            for side in side_genres.iter().take(COMBINATION_LIMIT) {
                doc.line(format!("**{} + {} picks:**  ", genre, side.genre));
                for name in &side.sample_anime {
                    doc.line(format!("- {}", name));
                }
                doc.blank();
            }
        }

        doc.block("---");
    }

    fn write_statistics(
        &self,
        doc: &mut MarkdownDocument,
        dataset: &Dataset,
        ranking: &GenreRanking,
        artifacts: &mut Artifacts,
    ) {
        let stats = StatsCalculator::describe_ranking(ranking);

        let mut table = Table::new(["Metric", "Value"]);
        let rows: [(&str, String); 6] = [
            ("Total Anime", format_thousands(dataset.len())),
            ("Total Genres", stats.genre_count.to_string()),
            ("Highest Average Rating", fixed_or_dash(stats.highest_average)),
            ("Lowest Average Rating", fixed_or_dash(stats.lowest_average)),
            ("Mean Average Rating", fixed_or_dash(stats.mean_average)),
            ("Standard Deviation", fixed_or_dash(stats.average_std)),
        ];
        for (metric, value) in rows {
            table.push_row(vec![metric.into(), CellValue::Text(value)]);
        }

        doc.heading(2, "Statistical Summary")
            .block(markdown_table(&table))
            .block(format!("Text version: `{}/{}`", TEXT_REPORTS_DIR, STATISTICS_TEXT));

        let path = self.layout.text_reports.join(STATISTICS_TEXT);
        let result = save_to_file(&path, &grid_table(&table));
        artifacts.record(path, result);
    }

    fn write_closing(&self, doc: &mut MarkdownDocument, dataset: &Dataset) {
        let load = &dataset.stats;
        doc.heading(2, "Methodology")
            .line(format!(
                "1. **Data Cleaning:** {} of {} rows kept ({} with missing rating, genre or name, \
                 {} without usable genres removed; read as {})",
                format_thousands(dataset.len()),
                format_thousands(load.rows_read),
                load.dropped_missing,
                load.dropped_empty_genres,
                display_encoding(&load.encoding),
            ))
            .line("2. **Genre Expansion:** Comma separated genres were split into one entry per genre")
            .line("3. **Statistical Analysis:** Average rating and count computed for every genre")
            .line("4. **Combination Analysis:** Genres co-occurring with each leading genre were compared")
            .line("5. **Visualization:** Charts and tables were rendered to images")
            .blank();

        doc.heading(2, "Conclusion").block(
            "This analysis gives an overview of how anime genres perform and how they \
             interact. The highest rated genres and their best combinations are a useful \
             starting point for anime recommendations.",
        );

        doc.block("---")
            .block(format!(
                "*This report was generated automatically. Last updated: {}*  ",
                self.report_time
            ));

        doc.heading(3, "File Structure")
            .line("```")
            .line(format!("{}/", display_dir_name(&self.layout.root)))
            .line("├── charts/                 # Charts (PNG)")
            .line("├── tables/                 # Table images (PNG)")
            .line("├── text_reports/           # Text reports (TXT, JSON)")
            .line("├── anime_lists/            # Anime lists (TXT)")
            .line(format!("└── {}  # This report", REPORT_FILE_NAME))
            .line("```");
    }
}

fn side_genre_table(side_genres: &[SideGenreSummary]) -> Table {
    let mut table = Table::new(["Side Genre", "Average Rating", "Anime Count"]);
    for side in side_genres {
        table.push_row(vec![
            side.genre.as_str().into(),
            side.average_rating.into(),
            side.anime_count.into(),
        ]);
    }
    table
}

fn relative(dir: &str, file: &str) -> String {
    format!("./{}/{}", dir, file)
}

fn fixed_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn display_encoding(label: &str) -> &str {
    if label.is_empty() {
        "unknown encoding"
    } else {
        label
    }
}

fn display_dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
