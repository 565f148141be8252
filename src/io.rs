/**
 * CosReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{RecError, Result};
use crate::matrix::{KeyedMatrix, Matrix};
use crate::types::{self, ItemRating, PreferenceMatrix, User};

/// Reads a matrix file without headers, one matrix row per line. Repeated delimiters are
/// tolerated, so values can be aligned with blanks.
pub fn csv_reader<P: AsRef<Path>>(file: P, delimiter: u8) -> Result<csv::Reader<File>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file)?;

    Ok(reader)
}

/// Parses all records into a dense matrix, all rows must have the same number of values.
pub fn matrix_from_csv<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<Matrix<f64>> {

    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        // The reader skips blank lines, so count lines in the file rather than records
        let line = record.position()
            .map(|position| position.line() as usize)
            .unwrap_or(index + 1);

        let row = record.iter()
            .filter(|field| !field.is_empty())
            .map(|field| {
                field.parse::<f64>()
                    .map_err(|_| RecError::Parse { line, value: field.to_owned() })
            })
            .collect::<Result<Vec<f64>>>()?;

        if !row.is_empty() {
            rows.push(row);
        }
    }

    Matrix::from_rows(rows)
}

/// Reads a rating matrix with one line per item and one column per user. Items are keyed
/// `P1..Pn` and users `U1..Um` in file order.
pub fn read_preference_matrix<P: AsRef<Path>>(file: P, delimiter: u8) -> Result<PreferenceMatrix> {
    let mut reader = csv_reader(file, delimiter)?;
    let matrix = matrix_from_csv(&mut reader)?;

    let items = types::consecutive_items(matrix.num_rows());
    let users = types::consecutive_users(matrix.num_cols());

    KeyedMatrix::new(matrix, items, users)
}

/// Reads a square matrix of pairwise similarities.
pub fn read_similarity_matrix<P: AsRef<Path>>(file: P, delimiter: u8) -> Result<Matrix<f64>> {
    let mut reader = csv_reader(file, delimiter)?;
    matrix_from_csv(&mut reader)
}

/// Struct used for JSON serialization of recommendations. Field names will be used in JSON.
#[derive(Serialize)]
struct Recommendation<'a> {
    user: String,
    item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_name: Option<&'a str>,
    rating: f64,
}

/// Writes one JSON object per recommended item.
pub fn write_recommendations_to<W: Write>(
    mut out: W,
    user: &User,
    recommendations: &[ItemRating],
) -> Result<()> {

    for item_rating in recommendations {
        let recommendation = Recommendation {
            user: user.to_string(),
            item: item_rating.item.to_string(),
            item_name: item_rating.item.name.as_ref().map(String::as_str),
            rating: item_rating.rating,
        };

        serde_json::to_writer(&mut out, &recommendation)?;
        writeln!(out)?;
    }

    out.flush()?;

    Ok(())
}

/// Output the recommendations in JSON format. If an `output_path` is supplied, we write to a
/// file at the specified path, otherwise, we output to stdout.
pub fn write_recommendations(
    user: &User,
    recommendations: &[ItemRating],
    output_path: Option<String>,
) -> Result<()> {

    let out: Box<dyn Write> = match output_path {
        Some(path) => Box::new(File::create(&Path::new(&path))?),
        _ => Box::new(io::stdout())
    };

    write_recommendations_to(out, user, recommendations)
}

#[cfg(test)]
mod tests {

    use std::io::Write;

    use super::*;
    use crate::types::Item;

    fn matrix_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn read_tab_separated_preferences() {
        let file = matrix_file("5\t4\t0\n0\t3\t1\n");
        let preferences = read_preference_matrix(file.path(), b'\t').unwrap();

        assert_eq!(preferences.num_rows(), 2);
        assert_eq!(preferences.num_cols(), 3);
        assert_eq!(preferences.get_by_key(&Item::new(2), &User::new(2)).unwrap(), 3.0);
        assert_eq!(preferences.row_keys()[1].to_string(), "P2");
        assert_eq!(preferences.col_keys()[2].to_string(), "U3");
    }

    #[test]
    fn read_aligned_similarities() {
        let file = matrix_file("0    0.5  0.25\n0.5  0    1\n0.25 1    0\n");
        let similarities = read_similarity_matrix(file.path(), b' ').unwrap();

        assert_eq!(similarities.num_rows(), 3);
        assert_eq!(similarities.row(2), &[0.25, 1.0, 0.0]);
    }

    #[test]
    fn invalid_values_are_reported() {
        let file = matrix_file("5\t4\n3\tx\n");
        let result = read_preference_matrix(file.path(), b'\t');

        match result {
            Err(RecError::Parse { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "x");
            },
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn invalid_values_after_blank_lines_report_the_file_line() {
        let file = matrix_file("5\t4\n\n3\tx\n");
        let result = read_preference_matrix(file.path(), b'\t');

        match result {
            Err(RecError::Parse { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "x");
            },
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn ragged_files_are_rejected() {
        let file = matrix_file("5\t4\n3\n");
        let result = read_preference_matrix(file.path(), b'\t');

        assert!(matches!(result, Err(RecError::RaggedRows { .. })));
    }

    #[test]
    fn missing_file() {
        let result = read_similarity_matrix("/does/not/exist.txt", b'\t');
        assert!(result.is_err());
    }

    #[test]
    fn recommendations_as_json_lines() {
        let recommendations = vec![
            ItemRating::new(Item::named(2, "pony"), 4.5),
            ItemRating::new(Item::new(7), 3.25),
        ];

        let mut out = Vec::new();
        write_recommendations_to(&mut out, &User::new(3), &recommendations).unwrap();

        let lines: Vec<serde_json::Value> = String::from_utf8(out).unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["user"], "U3");
        assert_eq!(lines[0]["item"], "P2");
        assert_eq!(lines[0]["item_name"], "pony");
        assert_eq!(lines[0]["rating"], 4.5);
        assert!(lines[1].get("item_name").is_none());
    }

    #[test]
    fn recommendations_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_owned();

        let recommendations = vec![ItemRating::new(Item::new(1), 5.0)];
        write_recommendations(&User::new(1), &recommendations, Some(path.clone())).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written.trim(), r#"{"user":"U1","item":"P1","rating":5.0}"#);
    }
}
