// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Text reports: the fixed-width table and delimited (CSV) output.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::stats::Statistics;

/// Column headers shared by every text format.
const HEADERS: [&str; 7] = ["Name", "AMean", "Mean", "Med", "Min", "Max", "Stdev%"];

/// Field separator used when none is given.
pub const DEFAULT_DELIMITER: char = '\t';

/// Quote character for delimited output.
const QUOTE: char = '|';

const NAME_MIN_WIDTH: usize = 20;
const COLUMN_WIDTH: usize = 12;

/// Shown in place of a stdev% that has no defined value.
const UNDEFINED: &str = "n/a";

/// One reported row. Time values are already multiplied by the suite scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub name: String,
    /// Mean minus the smallest mean in the result set
    pub amean: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation as a percentage of the mean (unscaled).
    /// `None` when the mean is zero, e.g. on a clock coarser than the action.
    pub stdev_pct: Option<f64>,
}

impl Summary {
    fn stdev_pct_text(&self, precision: Option<usize>) -> String {
        match (self.stdev_pct, precision) {
            (Some(pct), Some(p)) => format!("{:.p$}", pct),
            (Some(pct), None) => pct.to_string(),
            (None, _) => UNDEFINED.to_string(),
        }
    }
}

/// Summarize results in name order.
///
/// Fails with [`BenchError::EmptyResultSet`] when there is nothing to rank.
pub fn summarize(results: &BTreeMap<String, Statistics>, scale: f64) -> BenchResult<Vec<Summary>> {
    if results.is_empty() {
        return Err(BenchError::EmptyResultSet);
    }

    let means = results
        .iter()
        .map(|(name, stats)| {
            stats.mean().inspect_err(|e| {
                tracing::error!(benchmark = %name, error = %e, "cannot summarize result");
            })
        })
        .collect::<BenchResult<Vec<f64>>>()?;
    let min_mean = means.iter().copied().fold(f64::INFINITY, f64::min);

    results
        .iter()
        .zip(means)
        .map(|((name, stats), mean)| -> BenchResult<Summary> {
            let stdev = stats.stdev().inspect_err(|e| {
                tracing::error!(benchmark = %name, error = %e, "cannot summarize result");
            })?;

            let stdev_pct = if mean > 0.0 {
                Some(stdev / mean * 100.0)
            } else {
                tracing::warn!(benchmark = %name, "mean time is zero, stdev% is undefined");
                None
            };

            Ok(Summary {
                name: name.clone(),
                amean: (mean - min_mean) * scale,
                mean: mean * scale,
                median: stats.median()? * scale,
                min: stats.min()? * scale,
                max: stats.max()? * scale,
                stdev_pct,
            })
        })
        .collect()
}

/// Write the human-oriented fixed-width table.
///
/// Numeric columns are at least 12 wide and grow so that every cell is
/// followed by at least one space.
pub fn write_table<W: Write>(sink: &mut W, rows: &[Summary]) -> BenchResult<()> {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(NAME_MIN_WIDTH)
        + 2;

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                format!("{:.4}", r.amean),
                format!("{:.4}", r.mean),
                format!("{:.4}", r.median),
                format!("{:.4}", r.min),
                format!("{:.4}", r.max),
                r.stdev_pct_text(Some(2)),
            ]
        })
        .collect();

    // The last column is never padded.
    let mut widths = [COLUMN_WIDTH; 5];
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count() + 1);
        }
    }

    let mut header = format!("{:<name_width$}", HEADERS[0]);
    for (title, w) in HEADERS[1..HEADERS.len() - 1].iter().zip(widths) {
        header.push_str(&format!("{:<w$}", title));
    }
    header.push_str(HEADERS[HEADERS.len() - 1]);
    writeln!(sink, "{}", header).map_err(BenchError::io("writing result table"))?;

    for (row, cells) in rows.iter().zip(&cells) {
        let mut line = format!("{:<name_width$}", row.name);
        for (cell, w) in cells.iter().zip(widths) {
            line.push_str(&format!("{:<w$}", cell));
        }
        line.push_str(&cells[5]);
        writeln!(sink, "{}", line).map_err(BenchError::io("writing result table"))?;
    }
    Ok(())
}

/// Write delimited rows with minimal quoting and `\r\n` line endings.
pub fn write_csv<W: Write>(sink: &mut W, rows: &[Summary], delimiter: char) -> BenchResult<()> {
    write_record(sink, HEADERS.iter().map(|h| Cow::Borrowed(*h)), delimiter)?;

    for row in rows {
        let fields = [
            Cow::Borrowed(row.name.as_str()),
            Cow::Owned(row.amean.to_string()),
            Cow::Owned(row.mean.to_string()),
            Cow::Owned(row.median.to_string()),
            Cow::Owned(row.min.to_string()),
            Cow::Owned(row.max.to_string()),
            Cow::Owned(row.stdev_pct_text(None)),
        ];
        write_record(sink, fields.into_iter(), delimiter)?;
    }
    Ok(())
}

fn write_record<'f, W, I>(sink: &mut W, fields: I, delimiter: char) -> BenchResult<()>
where
    W: Write,
    I: Iterator<Item = Cow<'f, str>>,
{
    let line = fields
        .map(|field| quote_field(&field, delimiter).into_owned())
        .collect::<Vec<_>>()
        .join(delimiter.encode_utf8(&mut [0; 4]));

    write!(sink, "{}\r\n", line).map_err(BenchError::io("writing CSV record"))
}

/// Quote a field only if it contains the delimiter, the quote character or a
/// line break. Embedded quote characters are doubled.
fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || c == QUOTE || c == '\r' || c == '\n');

    if needs_quotes {
        let escaped = field.replace(QUOTE, "||");
        Cow::Owned(format!("{QUOTE}{escaped}{QUOTE}"))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(entries: &[(&str, &[f64])]) -> BTreeMap<String, Statistics> {
        entries
            .iter()
            .map(|(name, samples)| (name.to_string(), Statistics::from_samples(samples.to_vec())))
            .collect()
    }

    #[test]
    fn test_summarize_empty() {
        let err = summarize(&BTreeMap::new(), 1.0).unwrap_err();
        assert!(matches!(err, BenchError::EmptyResultSet));
    }

    #[test]
    fn test_summarize_ranks_against_fastest() {
        let rows = summarize(
            &results(&[("slow", &[4.0, 6.0]), ("fast", &[1.0, 3.0]), ("mid", &[2.0, 4.0])]),
            10.0,
        )
        .unwrap();

        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
        assert_eq!(rows[0].amean, 0.0);
        assert_eq!(rows[1].amean, 10.0);
        assert_eq!(rows[2].amean, 30.0);
        assert!(rows.iter().all(|r| r.amean >= 0.0));

        assert_eq!(rows[2].mean, 50.0);
        assert_eq!(rows[2].median, 50.0);
        assert_eq!(rows[2].min, 40.0);
        assert_eq!(rows[2].max, 60.0);
    }

    #[test]
    fn test_stdev_pct_is_dimensionless() {
        // stdev of [1, 3] is sqrt(2); mean is 2.
        let unscaled = summarize(&results(&[("x", &[1.0, 3.0])]), 1.0).unwrap();
        let scaled = summarize(&results(&[("x", &[1.0, 3.0])]), 1000.0).unwrap();

        let expected = 2f64.sqrt() / 2.0 * 100.0;
        assert!((unscaled[0].stdev_pct.unwrap() - expected).abs() < 1e-9);
        assert_eq!(unscaled[0].stdev_pct, scaled[0].stdev_pct);
    }

    #[test]
    fn test_summarize_propagates_statistic_errors() {
        let err = summarize(&results(&[("one", &[1.0])]), 1.0).unwrap_err();
        assert!(matches!(err, BenchError::InsufficientSamples { .. }));

        let err = summarize(&results(&[("none", &[])]), 1.0).unwrap_err();
        assert!(matches!(err, BenchError::EmptySeries { .. }));
    }

    #[test]
    fn test_write_table() {
        let rows = summarize(&results(&[("listDb", &[1.0, 3.0])]), 1.0).unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name                  AMean       Mean"));
        assert!(lines[0].ends_with("Stdev%"));
        assert!(lines[1].starts_with("listDb                0.0000      2.0000      2.0000"));
        assert!(lines[1].ends_with("70.71"));
    }

    #[test]
    fn test_write_table_long_names() {
        let long = "a_really_long_benchmark_name_here";
        let rows = summarize(&results(&[(long, &[1.0, 1.0])]), 1.0).unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with(&format!("{}  0.0000", long)));
    }

    #[test]
    fn test_write_table_wide_values() {
        // One second reported in microseconds.
        let rows = summarize(&results(&[("slow", &[1.0, 3.0])]), 1e6).unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        let fields: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(
            fields,
            vec![
                "slow",
                "0.0000",
                "2000000.0000",
                "2000000.0000",
                "1000000.0000",
                "3000000.0000",
                "70.71"
            ]
        );

        // Header columns stay aligned with the widened cells.
        let header = text.lines().next().unwrap();
        assert_eq!(header.find("Max"), row.find("3000000.0000"));
        assert_eq!(header.find("Stdev%"), row.find("70.71"));
    }

    #[test]
    fn test_zero_mean_has_no_stdev_pct() {
        let rows = summarize(&results(&[("z", &[0.0, 0.0])]), 1.0).unwrap();
        assert_eq!(rows[0].stdev_pct, None);

        let mut csv = Vec::new();
        write_csv(&mut csv, &rows, ',').unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert_eq!(csv.lines().nth(1), Some("z,0,0,0,0,0,n/a"));
        assert!(!csv.contains("NaN"));

        let mut table = Vec::new();
        write_table(&mut table, &rows).unwrap();
        let table = String::from_utf8(table).unwrap();
        assert!(table.lines().nth(1).unwrap().ends_with("n/a"));
    }

    #[test]
    fn test_write_csv() {
        let rows = summarize(&results(&[("b", &[2.0, 2.0]), ("a", &[1.0, 1.0])]), 1.0).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &rows, '\t').unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Name\tAMean\tMean\tMed\tMin\tMax\tStdev%\r\n\
             a\t0\t1\t1\t1\t1\t0\r\n\
             b\t1\t2\t2\t2\t2\t0\r\n"
        );
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain", ','), "plain");
        assert_eq!(quote_field("a,b", ','), "|a,b|");
        assert_eq!(quote_field("a,b", '\t'), "a,b");
        assert_eq!(quote_field("pipe|name", ','), "|pipe||name|");
        assert_eq!(quote_field("two\nlines", ','), "|two\nlines|");
    }
}
