use bookstats::chart::truncate_label as truncate;
use bookstats::report::{self, ChartKind};
use bookstats::{InputPaths, Report, ReportConfig, ReportGenerator};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookstats")]
#[command(author, version, about = "Render summary charts for users/books/ratings datasets")]
struct Args {
    /// Users file (semicolon-delimited, ISO-8859-1)
    users: PathBuf,

    /// Books file
    books: PathBuf,

    /// Ratings file
    ratings: PathBuf,

    /// Directory the charts are written to
    #[arg(short, long, default_value = report::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Minimum number of ratings for the average-rating ranking
    #[arg(long, default_value_t = bookstats::stats::DEFAULT_MIN_RATINGS)]
    min_ratings: usize,

    /// Number of books per ranking
    #[arg(long = "top", default_value_t = bookstats::stats::DEFAULT_TOP_N)]
    top_n: usize,

    /// Number of bins in the rating histogram
    #[arg(long, default_value_t = bookstats::stats::DEFAULT_RATING_BINS)]
    rating_bins: usize,

    /// Also write the report to this file (.json, otherwise CSV)
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Don't write report.json next to the charts
    #[arg(long)]
    no_manifest: bool,

    /// Open the output directory when done
    #[arg(long)]
    open: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = ReportConfig {
        output_dir: args.output_dir.clone(),
        min_ratings: args.min_ratings,
        top_n: args.top_n.max(1),
        rating_bins: args.rating_bins.max(1),
        write_manifest: !args.no_manifest,
    };
    let inputs = InputPaths::new(&args.users, &args.books, &args.ratings);

    if !args.quiet {
        eprintln!("\x1b[1mBookstats - Book Rating Charts\x1b[0m");
        eprintln!("{}", "─".repeat(70));
    }

    let pb = if !args.quiet {
        let pb = ProgressBar::new(ChartKind::ALL.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        pb.set_message("loading inputs");
        Some(pb)
    } else {
        None
    };

    let generator = ReportGenerator::new(config);
    let result = generator.generate_with_progress(&inputs, |kind| {
        if let Some(ref pb) = pb {
            pb.inc(1);
            pb.set_message(kind.file_name());
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            std::process::exit(1);
        }
    };

    if !args.quiet {
        print_summary(&report);
    }

    if let Some(ref path) = args.export {
        if let Err(e) = report::export(path, &report) {
            eprintln!("Failed to write export: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mExport saved: {}\x1b[0m", path.display());
        }
    }

    if args.open {
        if let Err(e) = open::that(&report.config.output_dir) {
            eprintln!("Failed to open {}: {}", report.config.output_dir.display(), e);
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mReport complete.\x1b[0m");
    }
}

fn print_summary(report: &Report) {
    let inputs = &report.inputs;
    let agg = &report.aggregates;

    eprintln!("\x1b[1mInputs:\x1b[0m");
    let tables = [
        ("users", inputs.users),
        ("books", inputs.books),
        ("ratings", inputs.ratings),
    ];
    for (name, stats) in tables {
        if stats.skipped > 0 {
            eprintln!(
                "  {:<8} {:>8} loaded  \x1b[33m{} skipped\x1b[0m",
                name, stats.loaded, stats.skipped
            );
        } else {
            eprintln!("  {:<8} {:>8} loaded", name, stats.loaded);
        }
    }

    eprintln!("\n\x1b[1mRankings:\x1b[0m");
    eprintln!(
        "  {} rated books, {} with at least {} ratings",
        agg.rated_books, agg.eligible_books, report.config.min_ratings
    );
    match agg.top_rated_books.first() {
        Some(b) => eprintln!(
            "  \x1b[35mMost rated:\x1b[0m   {} ({} ratings)",
            truncate(b.title.as_deref().unwrap_or(&b.isbn), 50),
            b.count
        ),
        None => eprintln!("  \x1b[90mMost rated:   none\x1b[0m"),
    }
    match agg.top_avg_rated_books.first() {
        Some(b) => eprintln!(
            "  \x1b[34mBest average:\x1b[0m {} ({:.2} over {})",
            truncate(&b.title, 50),
            b.average,
            b.count
        ),
        None => eprintln!("  \x1b[90mBest average: none\x1b[0m"),
    }

    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mCharts:\x1b[0m");
    for (name, file) in &report.charts {
        eprintln!(
            "  \x1b[32m✓\x1b[0m {:<22} {}",
            name,
            report.config.output_dir.join(file).display()
        );
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
