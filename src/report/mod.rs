//! Report generation
//!
//! A run goes load → aggregate → render:
//!
//! 1. [`Datasets::load`] parses the three input files (fatal on a missing
//!    file, empty file, or missing required column)
//! 2. [`Aggregates::compute`] builds the four statistics in memory
//! 3. each [`ChartKind`] is rendered to its fixed filename in the output
//!    directory, then an optional `report.json` manifest is written
//!
//! The caller gets back a [`Report`] whose `charts` field maps report name to
//! filename:
//!
//! | Report name | File |
//! |-------------|------|
//! | `age_distribution` | `age_distribution.png` |
//! | `rating_distribution` | `rating_distribution.png` |
//! | `top_rated_books` | `top_rated_books.png` |
//! | `top_avg_rated_books` | `top_avg_rated_books.png` |
//!
//! # Exports
//!
//! ```ignore
//! use bookstats::report;
//!
//! // Format picked from the extension
//! report::export("summary.json", &report)?;  // full JSON report
//! report::export("rankings.csv", &report)?;  // both book rankings as CSV
//! ```

pub mod csv;
pub mod json;

use crate::chart::{self, ChartLabels, Palette, RankedBar};
use crate::dataset::{Datasets, InputPaths, InputSummary};
use crate::error::{ReportError, Result};
use crate::stats::{
    AggregateOptions, Aggregates, DEFAULT_MIN_RATINGS, DEFAULT_RATING_BINS, DEFAULT_TOP_N,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "static";
pub const MANIFEST_FILE_NAME: &str = "report.json";

/// The four charts a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    AgeDistribution,
    RatingDistribution,
    TopRatedBooks,
    TopAvgRatedBooks,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::AgeDistribution,
        ChartKind::RatingDistribution,
        ChartKind::TopRatedBooks,
        ChartKind::TopAvgRatedBooks,
    ];

    /// Logical report name used by callers to look charts up
    pub fn key(self) -> &'static str {
        match self {
            ChartKind::AgeDistribution => "age_distribution",
            ChartKind::RatingDistribution => "rating_distribution",
            ChartKind::TopRatedBooks => "top_rated_books",
            ChartKind::TopAvgRatedBooks => "top_avg_rated_books",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::AgeDistribution => "age_distribution.png",
            ChartKind::RatingDistribution => "rating_distribution.png",
            ChartKind::TopRatedBooks => "top_rated_books.png",
            ChartKind::TopAvgRatedBooks => "top_avg_rated_books.png",
        }
    }

    pub fn title(self, top_n: usize) -> String {
        match self {
            ChartKind::AgeDistribution => "Age Distribution of Users".to_string(),
            ChartKind::RatingDistribution => "Rating Distribution".to_string(),
            ChartKind::TopRatedBooks => format!("Top {} Most Rated Books", top_n),
            ChartKind::TopAvgRatedBooks => format!("Top {} Books by Average Rating", top_n),
        }
    }

    /// `(x axis, y axis)` descriptions
    pub fn axes(self) -> (&'static str, &'static str) {
        match self {
            ChartKind::AgeDistribution => ("Age", "Count"),
            ChartKind::RatingDistribution => ("Rating", "Count"),
            ChartKind::TopRatedBooks => ("Rating Count", "Book Title"),
            ChartKind::TopAvgRatedBooks => ("Average Rating", "Book Title"),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Report name → filename for every chart
pub fn chart_filenames() -> BTreeMap<String, String> {
    ChartKind::ALL
        .iter()
        .map(|k| (k.key().to_string(), k.file_name().to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_min_ratings")]
    pub min_ratings: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_rating_bins")]
    pub rating_bins: usize,
    #[serde(default = "default_write_manifest")]
    pub write_manifest: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_min_ratings() -> usize {
    DEFAULT_MIN_RATINGS
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_rating_bins() -> usize {
    DEFAULT_RATING_BINS
}

fn default_write_manifest() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            min_ratings: default_min_ratings(),
            top_n: default_top_n(),
            rating_bins: default_rating_bins(),
            write_manifest: default_write_manifest(),
        }
    }
}

impl ReportConfig {
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            min_ratings: self.min_ratings,
            top_n: self.top_n,
            rating_bins: self.rating_bins,
        }
    }

    pub fn chart_path(&self, kind: ChartKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE_NAME)
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated: String,
    pub config: ReportConfig,
    pub inputs: InputSummary,
    pub aggregates: Aggregates,
    /// Report name → filename, relative to `config.output_dir`
    pub charts: BTreeMap<String, String>,
}

/// Runs the load → aggregate → render pipeline.
///
/// Charts are written straight to fixed filenames in the output directory.
/// Two generators pointed at the same directory at the same time race on
/// those files without any locking; whichever writes last wins, and a reader
/// may briefly see one run's age chart next to another run's rankings.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn aggregate(&self, data: &Datasets) -> Aggregates {
        Aggregates::compute(data, self.config.aggregate_options())
    }

    /// Render all four charts, calling `on_chart` after each one is written.
    pub fn render_charts<F>(
        &self,
        aggregates: &Aggregates,
        mut on_chart: F,
    ) -> Result<BTreeMap<String, String>>
    where
        F: FnMut(ChartKind),
    {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| ReportError::OutputDir {
            path: dir.clone(),
            source,
        })?;

        for kind in ChartKind::ALL {
            let path = self.config.chart_path(kind);
            render_chart(kind, aggregates, self.config.top_n, &path)?;
            log::info!("Wrote {} chart to {}", kind, path.display());
            on_chart(kind);
        }

        Ok(chart_filenames())
    }

    pub fn generate(&self, inputs: &InputPaths) -> Result<Report> {
        self.generate_with_progress(inputs, |_| {})
    }

    /// Full run. Nothing is written unless all three inputs parse.
    pub fn generate_with_progress<F>(&self, inputs: &InputPaths, on_chart: F) -> Result<Report>
    where
        F: FnMut(ChartKind),
    {
        let data = Datasets::load(inputs)?;
        let aggregates = self.aggregate(&data);
        let charts = self.render_charts(&aggregates, on_chart)?;

        let report = Report {
            generated: chrono::Local::now().to_rfc3339(),
            config: self.config.clone(),
            inputs: data.summary,
            aggregates,
            charts,
        };

        if self.config.write_manifest {
            let path = self.config.manifest_path();
            export(&path, &report)?;
            log::info!("Wrote manifest to {}", path.display());
        }

        Ok(report)
    }
}

/// Draw a single chart from precomputed aggregates
pub fn render_chart(
    kind: ChartKind,
    aggregates: &Aggregates,
    top_n: usize,
    path: &Path,
) -> Result<()> {
    let title = kind.title(top_n);
    let (x_desc, y_desc) = kind.axes();
    let labels = ChartLabels {
        title: &title,
        x_desc,
        y_desc,
    };

    match kind {
        ChartKind::AgeDistribution => {
            chart::draw_histogram(path, &aggregates.age_histogram, &[], chart::SKY_BLUE, labels)?
        }
        ChartKind::RatingDistribution => {
            let dist = &aggregates.rating_distribution;
            chart::draw_histogram(path, &dist.histogram, &dist.density, chart::PURPLE, labels)?
        }
        ChartKind::TopRatedBooks => {
            let bars: Vec<RankedBar> = aggregates
                .top_rated_books
                .iter()
                .map(|b| RankedBar {
                    label: b.title.clone().unwrap_or_default(),
                    value: b.count as f64,
                })
                .collect();
            chart::draw_ranked_bars(path, &bars, Palette::Magma, labels)?
        }
        ChartKind::TopAvgRatedBooks => {
            let bars: Vec<RankedBar> = aggregates
                .top_avg_rated_books
                .iter()
                .map(|b| RankedBar {
                    label: b.title.clone(),
                    value: b.average,
                })
                .collect();
            chart::draw_ranked_bars(path, &bars, Palette::CoolWarm, labels)?
        }
    }

    Ok(())
}

/// Write `report` in the format implied by the file extension
pub fn export<P: AsRef<Path>>(path: P, report: &Report) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = fs::File::create(path)?;

    match ext.as_str() {
        "json" => json::write(&mut file, report),
        _ => csv::write(&mut file, report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Book, Rating, User};

    fn sample_datasets() -> Datasets {
        let book = |isbn: &str, title: &str| Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: String::new(),
            year: String::new(),
            publisher: String::new(),
        };
        let rating = |isbn: &str, value: f64| Rating {
            isbn: isbn.to_string(),
            user_id: String::new(),
            value,
        };

        let mut ratings: Vec<Rating> = (0..6).map(|_| rating("A", 5.0)).collect();
        ratings.extend((0..4).map(|_| rating("B", 5.0)));
        ratings.push(rating("ORPHAN", 9.0));

        Datasets {
            users: [5.0, 15.0, 25.0, 35.0]
                .into_iter()
                .map(|age| User {
                    user_id: String::new(),
                    age: Some(age),
                    location: String::new(),
                })
                .collect(),
            books: vec![book("A", "Book A"), book("B", "Book B")],
            ratings,
            ..Default::default()
        }
    }

    fn sample_report() -> Report {
        let generator = ReportGenerator::new(ReportConfig::default());
        let data = sample_datasets();
        Report {
            generated: "2024-01-01T00:00:00+00:00".to_string(),
            config: generator.config().clone(),
            inputs: data.summary,
            aggregates: generator.aggregate(&data),
            charts: chart_filenames(),
        }
    }

    fn write_inputs(dir: &Path) -> InputPaths {
        let paths = InputPaths {
            users: dir.join("users.csv"),
            books: dir.join("books.csv"),
            ratings: dir.join("ratings.csv"),
        };
        fs::write(&paths.users, b"User-ID;Location;Age\n1;x;5\n2;y;15\n").unwrap();
        fs::write(&paths.books, b"ISBN;Book-Title\nA;Book A\n").unwrap();
        fs::write(&paths.ratings, b"User-ID;ISBN;Book-Rating\n1;A;5\n2;A;7\n").unwrap();
        paths
    }

    // ==========================================================================
    // CHART NAMES
    // ==========================================================================

    #[test]
    fn test_chart_filenames_mapping() {
        let map = chart_filenames();
        assert_eq!(map.len(), 4);
        assert_eq!(map["age_distribution"], "age_distribution.png");
        assert_eq!(map["rating_distribution"], "rating_distribution.png");
        assert_eq!(map["top_rated_books"], "top_rated_books.png");
        assert_eq!(map["top_avg_rated_books"], "top_avg_rated_books.png");
    }

    #[test]
    fn test_chart_kind_serializes_as_key() {
        for kind in ChartKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }

    #[test]
    fn test_chart_titles_follow_top_n() {
        assert_eq!(ChartKind::TopRatedBooks.title(10), "Top 10 Most Rated Books");
        assert_eq!(ChartKind::TopAvgRatedBooks.title(5), "Top 5 Books by Average Rating");
        assert_eq!(ChartKind::AgeDistribution.title(10), "Age Distribution of Users");
        assert_eq!(ChartKind::RatingDistribution.axes(), ("Rating", "Count"));
    }

    // ==========================================================================
    // CONFIGURATION
    // ==========================================================================

    #[test]
    fn test_config_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("static"));
        assert_eq!(config.min_ratings, 5);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.rating_bins, 10);
        assert!(config.write_manifest);
        assert_eq!(
            config.chart_path(ChartKind::TopRatedBooks),
            PathBuf::from("static/top_rated_books.png")
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ReportConfig = serde_json::from_str(r#"{"min_ratings": 3}"#).unwrap();
        assert_eq!(config.min_ratings, 3);
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    // ==========================================================================
    // AGGREGATION THROUGH THE GENERATOR
    // ==========================================================================

    #[test]
    fn test_generator_aggregate_scenario() {
        let report = sample_report();
        let agg = &report.aggregates;

        assert_eq!(agg.age_histogram.counts()[..4], [1, 1, 1, 1]);
        assert_eq!(agg.top_rated_books.len(), 3);
        assert_eq!(agg.top_rated_books[2].title, None);
        let avg: Vec<&str> = agg.top_avg_rated_books.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(avg, vec!["A"]);
    }

    // ==========================================================================
    // EXPORTS
    // ==========================================================================

    #[test]
    fn test_export_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.JSON");
        export(&path, &sample_report()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["charts"]["top_rated_books"], "top_rated_books.png");
        assert_eq!(value["config"]["min_ratings"], 5);
        assert_eq!(value["aggregates"]["top_avg_rated_books"][0]["isbn"], "A");
    }

    #[test]
    fn test_export_defaults_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rankings.txt");
        export(&path, &sample_report()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("ranking,rank,isbn,title,rating_count,average_rating"));
        assert!(text.contains("most_rated,1,A,Book A,6,"));
    }

    // ==========================================================================
    // FAILURE MODES
    // ==========================================================================

    #[test]
    fn test_bad_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_inputs(dir.path());
        paths.books = dir.path().join("comma.csv");
        fs::write(&paths.books, b"ISBN,Book-Title\nA,Book A\n").unwrap();

        let out = dir.path().join("static");
        let generator = ReportGenerator::new(ReportConfig {
            output_dir: out.clone(),
            ..Default::default()
        });

        let result = generator.generate(&paths);
        assert!(matches!(result, Err(ReportError::MissingColumn { .. })));
        assert!(!out.exists(), "no partial output on fatal parse failure");
    }

    #[test]
    fn test_output_dir_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("static");
        fs::write(&blocker, b"not a directory").unwrap();

        let generator = ReportGenerator::new(ReportConfig {
            output_dir: blocker,
            ..Default::default()
        });
        let result = generator.render_charts(&Aggregates::default(), |_| {});
        assert!(matches!(result, Err(ReportError::OutputDir { .. })));
    }

    // ==========================================================================
    // END TO END (needs system fonts)
    // ==========================================================================

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_generate_writes_fixed_files_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(dir.path());
        let out = dir.path().join("static");
        let generator = ReportGenerator::new(ReportConfig {
            output_dir: out.clone(),
            ..Default::default()
        });

        let mut rendered = Vec::new();
        let first = generator
            .generate_with_progress(&paths, |kind| rendered.push(kind))
            .unwrap();
        assert_eq!(rendered, ChartKind::ALL.to_vec());
        for file in first.charts.values() {
            assert!(out.join(file).exists(), "{} missing", file);
        }
        assert!(out.join(MANIFEST_FILE_NAME).exists());

        // Second run lands on the same names
        let second = generator.generate(&paths).unwrap();
        assert_eq!(first.charts, second.charts);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 5);
    }
}
