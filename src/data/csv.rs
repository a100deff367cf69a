//! MNIST-style CSV reader.
//!
//! Format:
//! - UTF-8, comma-separated, one record per line
//! - First column is the integer class label, the remaining `input_count`
//!   columns are raw pixel intensities in [0, 255]
//! - An optional header row is skipped (first row whose leading cell is not
//!   numeric)
//! - Double-quoted fields are unwrapped

use std::path::Path;

use crate::data::encoding::Sample;
use crate::data::error::DatasetError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads and encodes every record of the CSV file at `path`.
pub fn load_mnist_csv(
    path: impl AsRef<Path>,
    input_count: usize,
    class_count: usize,
) -> Result<Vec<Sample>, DatasetError> {
    let bytes = std::fs::read(path)?;
    parse_mnist_csv(&bytes, input_count, class_count)
}

/// Parses CSV bytes into encoded samples.
///
/// Every row must carry exactly `input_count` pixels after the label, and the
/// label must be below `class_count`.
pub fn parse_mnist_csv(
    data: &[u8],
    input_count: usize,
    class_count: usize,
) -> Result<Vec<Sample>, DatasetError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| DatasetError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let mut lines = text.lines().enumerate().peekable();

    if let Some((_, first)) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut samples = Vec::new();

    for (line_idx, line) in lines {
        let row_num = line_idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        let (label_cell, pixel_cells) = match cells.split_first() {
            Some(split) => split,
            None => continue,
        };

        if pixel_cells.len() != input_count {
            return Err(DatasetError::Row {
                row: row_num,
                message: format!("expected {} pixel columns, got {}", input_count, pixel_cells.len()),
            });
        }

        let label: usize = label_cell.trim().parse().map_err(|_| DatasetError::Row {
            row: row_num,
            message: format!("label '{}' is not a non-negative integer", label_cell),
        })?;
        if label >= class_count {
            return Err(DatasetError::Row {
                row: row_num,
                message: format!("label {} >= class count {}", label, class_count),
            });
        }

        let pixels = parse_pixels(pixel_cells, row_num)?;
        samples.push(Sample::from_raw(label, &pixels, class_count));
    }

    if samples.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(samples)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// A header is a first row whose label cell is non-numeric.
fn is_header(line: &str) -> bool {
    parse_csv_row(line)
        .first()
        .map(|c| {
            let t = c.trim();
            !t.is_empty() && t.parse::<f64>().is_err()
        })
        .unwrap_or(false)
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses pixel cells, rejecting anything outside [0, 255] (NaN and infinities included).
fn parse_pixels(cells: &[String], row_num: usize) -> Result<Vec<f64>, DatasetError> {
    cells.iter()
        .enumerate()
        .map(|(i, c)| {
            let value = c.trim().parse::<f64>().map_err(|_| DatasetError::Row {
                row: row_num,
                message: format!("'{}' is not a valid number", c),
            })?;
            if !(0.0..=255.0).contains(&value) {
                return Err(DatasetError::Row {
                    row: row_num,
                    message: format!("pixel {} value '{}' is outside [0, 255]", i + 1, c.trim()),
                });
            }
            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_label_first_rows() {
        let csv = b"5,0,255,51\n0,255,0,0\n";
        let samples = parse_mnist_csv(csv, 3, 10).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, 5);
        assert_eq!(samples[0].target[5], 0.99);
        assert_eq!(samples[0].target.iter().filter(|&&t| t == 0.01).count(), 9);
        assert_abs_diff_eq!(samples[0].input[0], 0.01);
        assert_abs_diff_eq!(samples[0].input[1], 1.0);
        assert_abs_diff_eq!(samples[0].input[2], 0.208, epsilon = 1e-12);
        assert_eq!(samples[1].label, 0);
    }

    #[test]
    fn skips_header_blank_lines_and_quotes() {
        let csv = b"label,p1,p2\n\n\"1\",\"10\",20\n";
        let samples = parse_mnist_csv(csv, 2, 2).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label, 1);
    }

    #[test]
    fn reports_row_of_bad_records() {
        let err = parse_mnist_csv(b"1,2,3\n1,2\n", 2, 10).unwrap_err();
        assert!(matches!(err, DatasetError::Row { row: 2, .. }));

        let err = parse_mnist_csv(b"12,0,0\n", 2, 10).unwrap_err();
        assert!(err.to_string().contains("class count"));

        let err = parse_mnist_csv(b"1,0,x\n", 2, 10).unwrap_err();
        assert!(err.to_string().contains("not a valid number"));

        let err = parse_mnist_csv(b"-1,0,0\n", 2, 10).unwrap_err();
        assert!(err.to_string().contains("non-negative integer"));
    }

    #[test]
    fn rejects_pixels_outside_intensity_range() {
        for (csv, bad) in [
            (&b"0,NaN,10\n"[..], "NaN"),
            (&b"0,10,inf\n"[..], "inf"),
            (&b"1,-40,10\n"[..], "-40"),
            (&b"1,10,300\n"[..], "300"),
        ] {
            let err = parse_mnist_csv(csv, 2, 2).unwrap_err();
            assert!(matches!(err, DatasetError::Row { row: 1, .. }), "{} was accepted", bad);
            assert!(err.to_string().contains(bad), "{}", err);
        }

        let err = parse_mnist_csv(b"0,0,255\n1,10,256\n", 2, 2).unwrap_err();
        assert!(matches!(err, DatasetError::Row { row: 2, .. }));
        assert!(err.to_string().contains("pixel 2"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_mnist_csv(b"\n\n", 2, 2), Err(DatasetError::Empty)));
    }

    #[test]
    fn quoted_commas_stay_in_field() {
        assert_eq!(parse_csv_row("a,\"b,c\",\"d\"\"e\""), vec!["a", "b,c", "d\"e"]);
    }
}
