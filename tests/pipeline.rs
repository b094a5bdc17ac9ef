use anime_genre_report::data::{DataLoader, DataProcessor};
use anime_genre_report::report::{OutputLayout, ReportGenerator, ReportOptions};
use anime_genre_report::stats::StatsCalculator;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const CSV: &str = "\
anime_id,name,genre,type,episodes,rating,members
1,Steel Heart,\"Action, Drama, Mecha\",TV,24,8.9,120000
2,Quiet Days,\"Comedy, Slice of Life\",TV,12,8.1,45000
3,Blade Run,\"Action, Comedy\",Movie,1,7.4,30000
4,Star Drift,\"Action, Drama, Sci-Fi\",TV,26,8.4,88000
5,Laugh Track,Comedy,OVA,6,6.9,5000
6,Missing Rating,\"Action\",TV,12,,100
7,No Genre,,TV,12,7.0,100
8,Only Nan,nan,TV,12,7.0,100
9,Long Road,\"Drama, Slice of Life\",TV,Unknown,7.8,21000
";

fn write_dataset(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("anime.csv");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(CSV.as_bytes()).unwrap();
    path
}

#[test]
fn test_full_pipeline_writes_report() {
    let dir = TempDir::new().unwrap();
    let csv_path = write_dataset(&dir);

    let dataset = DataLoader::new(&csv_path).load_and_clean().unwrap();
    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.stats.dropped_missing, 2);
    assert_eq!(dataset.stats.dropped_empty_genres, 1);

    let rows = DataProcessor::expand_genres(&dataset).unwrap();
    let tag_total: usize = dataset.records.iter().map(|r| r.genres.len()).sum();
    assert_eq!(rows.len(), tag_total);

    let ranking = StatsCalculator::rank_genres(&rows, 2).unwrap();
    let averages = ranking.averages();
    assert!(averages.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(ranking.top_genres[0], "Drama");

    let root = OutputLayout::timestamped_root(&dir.path().join("report"), "2024-01-01_00-00-00");
    let layout = OutputLayout::create(&root).unwrap();
    let summary = ReportGenerator::new(layout, ReportOptions::default(), "2024-01-01 00:00:00")
        .generate(&dataset, &ranking)
        .unwrap();

    assert_eq!(summary.output_dir, root);
    let report = fs::read_to_string(root.join("comprehensive_report.md")).unwrap();
    for genre in &ranking.top_genres {
        assert!(report.contains(genre.as_str()));
    }
    assert!(report.contains("Steel Heart"));
    assert!(!report.contains("Missing Rating"));

    let drama = fs::read_to_string(root.join("anime_lists/top_anime_Drama.txt")).unwrap();
    assert!(drama.contains("Steel Heart"));
    assert!(drama.contains("Long Road"));

    let top = fs::read_to_string(root.join("text_reports/top_genres.txt")).unwrap();
    assert!(top.contains("Drama"));
    assert!(root.join("text_reports/genre_summary.json").is_file());
    assert!(root.join("text_reports/statistics.txt").is_file());
    assert!(root.join("anime_lists/top_anime_Slice_of_Life.txt").is_file());
}

#[test]
fn test_threshold_excludes_small_genres() {
    let dir = TempDir::new().unwrap();
    let csv_path = write_dataset(&dir);

    let dataset = DataLoader::new(&csv_path).load_and_clean().unwrap();
    let rows = DataProcessor::expand_genres(&dataset).unwrap();

    let loose = StatsCalculator::rank_genres(&rows, 1).unwrap();
    let strict = StatsCalculator::rank_genres(&rows, 3).unwrap();

    assert!(strict.len() <= loose.len());
    assert!(loose.get("Mecha").is_some());
    assert!(strict.get("Mecha").is_none());
    assert!(strict.genres.iter().all(|g| g.anime_count >= 3));
}
