//! JSON report output

use crate::error::Result;
use crate::report::Report;
use std::io::Write;

/// Pretty-printed report with a trailing newline. Same shape as the
/// `report.json` manifest.
pub fn write<W: Write>(writer: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputSummary;
    use crate::report::{chart_filenames, ReportConfig};
    use crate::stats::{Aggregates, BookAverage};

    fn report() -> Report {
        let mut aggregates = Aggregates::default();
        aggregates.top_avg_rated_books.push(BookAverage {
            isbn: "0439136350".to_string(),
            title: "Harry Potter and the Prisoner of Azkaban".to_string(),
            average: 9.25,
            count: 8,
        });
        Report {
            generated: "2024-05-01T12:00:00+02:00".to_string(),
            config: ReportConfig::default(),
            inputs: InputSummary::default(),
            aggregates,
            charts: chart_filenames(),
        }
    }

    #[test]
    fn test_json_is_parseable_and_complete() {
        let mut out = Vec::new();
        write(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["generated"], "2024-05-01T12:00:00+02:00");
        assert_eq!(value["charts"].as_object().unwrap().len(), 4);
        assert_eq!(value["aggregates"]["top_avg_rated_books"][0]["average"], 9.25);
        assert_eq!(value["config"]["output_dir"], "static");
        assert_eq!(value["inputs"]["ratings"]["loaded"], 0);
    }
}
