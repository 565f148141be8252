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

use std::fmt;
use std::hash::Hash;

use fnv::FnvHashMap;

use crate::error::{Axis, RecError, Result};

/// Dense matrix with row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy + Default> Matrix<T> {

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix { data: vec![T::default(); rows * cols], rows, cols }
    }

    /// Builds a matrix from a vector of rows, all rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {

        let cols = match rows.first() {
            Some(first_row) if !first_row.is_empty() => first_row.len(),
            _ => return Err(RecError::EmptyMatrix),
        };

        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * cols);

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(RecError::RaggedRows { row: row_index, expected: cols, actual: row.len() });
            }
            data.extend(row);
        }

        Ok(Matrix { data, rows: num_rows, cols })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Position of a cell in the flat storage, panics on cells outside of the matrix.
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows, "row {} is out of range for a matrix with {} rows", row, self.rows);
        assert!(col < self.cols, "column {} is out of range for a matrix with {} columns", col,
            self.cols);
        row * self.cols + col
    }

    /// Panics if the cell lies outside of the matrix.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.offset(row, col)]
    }

    /// Panics if the cell lies outside of the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let offset = self.offset(row, col);
        self.data[offset] = value;
    }

    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        self.check_bounds(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    pub fn try_set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_bounds(row, col)?;
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(RecError::IndexOutOfRange { axis: Axis::Row, index: row, len: self.rows });
        }
        if col >= self.cols {
            return Err(RecError::IndexOutOfRange { axis: Axis::Column, index: col, len: self.cols });
        }
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {} is out of range for a matrix with {} rows", row, self.rows);
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Columns are not stored contiguously, so this copies `rows` values.
    pub fn col(&self, col: usize) -> Vec<T> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |row| self.row(row))
    }

    pub fn transpose(&self) -> Self {
        let mut transposed = Matrix::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                transposed.set(col, row, self.get(row, col));
            }
        }
        transposed
    }

    pub fn delete_row(&mut self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(RecError::IndexOutOfRange { axis: Axis::Row, index: row, len: self.rows });
        }

        let start = row * self.cols;
        self.data.drain(start..start + self.cols);
        self.rows -= 1;

        Ok(())
    }

    pub fn delete_col(&mut self, col: usize) -> Result<()> {
        if col >= self.cols {
            return Err(RecError::IndexOutOfRange { axis: Axis::Column, index: col, len: self.cols });
        }

        let cols = self.cols;
        let mut position = 0;
        self.data.retain(|_| {
            let keep = position % cols != col;
            position += 1;
            keep
        });
        self.cols -= 1;

        Ok(())
    }
}

impl<T: Copy + Default + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            write!(f, "  [")?;
            for value in row {
                write!(f, "{:>8.4}", value)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

/// Dense matrix whose rows and columns can also be addressed by keys, e.g. items and users.
#[derive(Debug, Clone)]
pub struct KeyedMatrix<T, R, C> {
    matrix: Matrix<T>,
    row_key_to_index: FnvHashMap<R, usize>,
    col_key_to_index: FnvHashMap<C, usize>,
    row_keys: Vec<R>,
    col_keys: Vec<C>,
}

fn index_keys<K>(keys: &[K], axis: Axis) -> Result<FnvHashMap<K, usize>>
    where K: Clone + Eq + Hash + fmt::Display {

    let mut key_to_index = FnvHashMap::with_capacity_and_hasher(keys.len(), Default::default());

    for (index, key) in keys.iter().enumerate() {
        if key_to_index.insert(key.clone(), index).is_some() {
            return Err(RecError::DuplicateKey { axis, key: key.to_string() });
        }
    }

    Ok(key_to_index)
}

impl<T, R, C> KeyedMatrix<T, R, C>
    where T: Copy + Default,
          R: Clone + Eq + Hash + fmt::Display,
          C: Clone + Eq + Hash + fmt::Display {

    pub fn new(matrix: Matrix<T>, row_keys: Vec<R>, col_keys: Vec<C>) -> Result<Self> {

        if matrix.num_rows() != row_keys.len() {
            return Err(RecError::DimensionMismatch {
                axis: Axis::Row,
                expected: matrix.num_rows(),
                actual: row_keys.len(),
            });
        }

        if matrix.num_cols() != col_keys.len() {
            return Err(RecError::DimensionMismatch {
                axis: Axis::Column,
                expected: matrix.num_cols(),
                actual: col_keys.len(),
            });
        }

        let row_key_to_index = index_keys(&row_keys, Axis::Row)?;
        let col_key_to_index = index_keys(&col_keys, Axis::Column)?;

        Ok(KeyedMatrix { matrix, row_key_to_index, col_key_to_index, row_keys, col_keys })
    }

    pub fn num_rows(&self) -> usize {
        self.matrix.num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.matrix.num_cols()
    }

    pub fn row_keys(&self) -> &[R] {
        &self.row_keys
    }

    pub fn col_keys(&self) -> &[C] {
        &self.col_keys
    }

    pub fn matrix(&self) -> &Matrix<T> {
        &self.matrix
    }

    pub fn row_index(&self, key: &R) -> Result<usize> {
        self.row_key_to_index.get(key)
            .copied()
            .ok_or_else(|| RecError::KeyNotFound { axis: Axis::Row, key: key.to_string() })
    }

    pub fn col_index(&self, key: &C) -> Result<usize> {
        self.col_key_to_index.get(key)
            .copied()
            .ok_or_else(|| RecError::KeyNotFound { axis: Axis::Column, key: key.to_string() })
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.matrix.get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.matrix.set(row, col, value)
    }

    pub fn get_by_key(&self, row_key: &R, col_key: &C) -> Result<T> {
        Ok(self.matrix.get(self.row_index(row_key)?, self.col_index(col_key)?))
    }

    pub fn set_by_key(&mut self, row_key: &R, col_key: &C, value: T) -> Result<()> {
        let row = self.row_index(row_key)?;
        let col = self.col_index(col_key)?;
        self.matrix.set(row, col, value);
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[T] {
        self.matrix.row(row)
    }

    pub fn row_by_key(&self, key: &R) -> Result<&[T]> {
        Ok(self.matrix.row(self.row_index(key)?))
    }

    pub fn col(&self, col: usize) -> Vec<T> {
        self.matrix.col(col)
    }

    pub fn col_by_key(&self, key: &C) -> Result<Vec<T>> {
        Ok(self.matrix.col(self.col_index(key)?))
    }

    pub fn delete_row_by_key(&mut self, key: &R) -> Result<()> {
        let row = self.row_index(key)?;
        self.matrix.delete_row(row)?;
        self.row_keys.remove(row);
        self.row_key_to_index = index_keys(&self.row_keys, Axis::Row)?;
        Ok(())
    }

    pub fn delete_col_by_key(&mut self, key: &C) -> Result<()> {
        let col = self.col_index(key)?;
        self.matrix.delete_col(col)?;
        self.col_keys.remove(col);
        self.col_key_to_index = index_keys(&self.col_keys, Axis::Column)?;
        Ok(())
    }
}

impl<T, K> KeyedMatrix<T, K, K>
    where T: Copy + Default,
          K: Clone + Eq + Hash + fmt::Display {

    /// A square matrix of zeros with the same keys on both axes.
    pub fn square(keys: Vec<K>) -> Result<Self> {
        let dimensions = keys.len();
        KeyedMatrix::new(Matrix::zeros(dimensions, dimensions), keys.clone(), keys)
    }
}

impl<T, R, C> fmt::Display for KeyedMatrix<T, R, C>
    where T: Copy + Default + fmt::Display,
          R: Clone + Eq + Hash + fmt::Display,
          C: Clone + Eq + Hash + fmt::Display {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\t")?;
        for col_key in &self.col_keys {
            write!(f, "{}\t", col_key)?;
        }
        writeln!(f)?;

        for (row_key, row) in self.row_keys.iter().zip(self.matrix.rows()) {
            write!(f, "{}\t", row_key)?;
            for value in row {
                write!(f, "{:.2}\t", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn ratings() -> KeyedMatrix<f64, &'static str, u32> {
        let matrix = Matrix::from_rows(vec![
            vec![5.0, 0.0, 3.0],
            vec![0.0, 4.0, 1.0],
        ]).unwrap();

        KeyedMatrix::new(matrix, vec!["apple", "pony"], vec![10, 20, 30]).unwrap()
    }

    #[test]
    fn construction_checks_dimensions() {
        let matrix: Matrix<f64> = Matrix::zeros(2, 3);

        let too_few_rows = KeyedMatrix::new(matrix.clone(), vec!["a"], vec![1, 2, 3]);
        match too_few_rows {
            Err(RecError::DimensionMismatch { axis: Axis::Row, expected: 2, actual: 1 }) => {},
            other => panic!("unexpected result {:?}", other),
        }

        let too_many_cols = KeyedMatrix::new(matrix.clone(), vec!["a", "b"], vec![1, 2, 3, 4]);
        match too_many_cols {
            Err(RecError::DimensionMismatch { axis: Axis::Column, expected: 3, actual: 4 }) => {},
            other => panic!("unexpected result {:?}", other),
        }

        assert!(KeyedMatrix::new(matrix, vec!["a", "b"], vec![1, 2, 3]).is_ok());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let matrix: Matrix<f64> = Matrix::zeros(2, 1);
        let result = KeyedMatrix::new(matrix, vec!["a", "a"], vec![1]);

        assert!(matches!(result, Err(RecError::DuplicateKey { axis: Axis::Row, .. })));
    }

    #[test]
    fn keys_round_trip() {
        let ratings = ratings();

        for (index, key) in ratings.row_keys().iter().enumerate() {
            assert_eq!(ratings.row_index(key).unwrap(), index);
        }
        for (index, key) in ratings.col_keys().iter().enumerate() {
            assert_eq!(ratings.col_index(key).unwrap(), index);
        }
    }

    #[test]
    fn access_by_index_and_key() {
        let mut ratings = ratings();

        assert_eq!(ratings.get(0, 2), 3.0);
        assert_eq!(ratings.get_by_key(&"pony", &20).unwrap(), 4.0);

        ratings.set_by_key(&"pony", &10, 2.0).unwrap();
        assert_eq!(ratings.get(1, 0), 2.0);

        ratings.set(0, 1, 1.0);
        assert_eq!(ratings.get_by_key(&"apple", &20).unwrap(), 1.0);

        assert_eq!(ratings.row_by_key(&"apple").unwrap(), &[5.0, 1.0, 3.0]);
        assert_eq!(ratings.col_by_key(&30).unwrap(), vec![3.0, 1.0]);
    }

    #[test]
    fn unknown_keys_fail() {
        let mut ratings = ratings();

        assert!(matches!(ratings.get_by_key(&"dog", &10),
            Err(RecError::KeyNotFound { axis: Axis::Row, .. })));
        assert!(matches!(ratings.col_by_key(&40),
            Err(RecError::KeyNotFound { axis: Axis::Column, .. })));
        assert!(ratings.set_by_key(&"apple", &99, 1.0).is_err());
    }

    #[test]
    fn ragged_and_empty_rows() {
        let ragged = Matrix::from_rows(vec![vec![1, 2], vec![3]]);
        assert!(matches!(ragged, Err(RecError::RaggedRows { row: 1, expected: 2, actual: 1 })));

        let empty: Result<Matrix<i32>> = Matrix::from_rows(vec![]);
        assert!(matches!(empty, Err(RecError::EmptyMatrix)));
    }

    #[test]
    fn transpose() {
        let matrix = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let transposed = matrix.transpose();

        assert_eq!(transposed.num_rows(), 3);
        assert_eq!(transposed.num_cols(), 2);
        assert_eq!(transposed.row(2), &[3, 6]);
        assert_eq!(transposed.transpose(), matrix);
    }

    #[test]
    fn delete_rows_and_columns() {
        let mut matrix = Matrix::from_rows(vec![
            vec![1, 2, 3],
            vec![4, 5, 6],
            vec![7, 8, 9],
        ]).unwrap();

        matrix.delete_row(1).unwrap();
        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.row(1), &[7, 8, 9]);

        matrix.delete_col(0).unwrap();
        assert_eq!(matrix.num_cols(), 2);
        assert_eq!(matrix.row(0), &[2, 3]);
        assert_eq!(matrix.row(1), &[8, 9]);

        assert!(matches!(matrix.delete_row(2),
            Err(RecError::IndexOutOfRange { axis: Axis::Row, index: 2, len: 2 })));
        assert!(matrix.delete_col(5).is_err());
    }

    #[test]
    #[should_panic]
    fn get_rejects_column_past_the_end() {
        let matrix = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        matrix.get(0, 3);
    }

    #[test]
    #[should_panic]
    fn set_rejects_column_past_the_end() {
        let mut matrix = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        matrix.set(0, 3, 99.0);
    }

    #[test]
    #[should_panic]
    fn keyed_get_rejects_column_past_the_end() {
        ratings().get(0, 3);
    }

    #[test]
    fn checked_access() {
        let mut matrix = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();

        assert_eq!(matrix.try_get(1, 2).unwrap(), 6);
        assert!(matches!(matrix.try_get(0, 3),
            Err(RecError::IndexOutOfRange { axis: Axis::Column, index: 3, len: 3 })));
        assert!(matches!(matrix.try_get(2, 0),
            Err(RecError::IndexOutOfRange { axis: Axis::Row, index: 2, len: 2 })));

        assert!(matrix.try_set(0, 3, 99).is_err());
        assert_eq!(matrix.get(1, 0), 4);

        matrix.try_set(0, 2, 99).unwrap();
        assert_eq!(matrix.get(0, 2), 99);
    }

    #[test]
    fn deleting_by_key_keeps_keys_consistent() {
        let mut ratings = ratings();

        ratings.delete_row_by_key(&"apple").unwrap();
        ratings.delete_col_by_key(&20).unwrap();

        assert_eq!(ratings.row_keys(), &["pony"]);
        assert_eq!(ratings.col_keys(), &[10, 30]);
        assert_eq!(ratings.row_index(&"pony").unwrap(), 0);
        assert_eq!(ratings.col_index(&30).unwrap(), 1);
        assert_eq!(ratings.get_by_key(&"pony", &30).unwrap(), 1.0);
        assert!(ratings.row_index(&"apple").is_err());
    }

    #[test]
    fn square_matrix_has_zero_values() {
        let similarities: KeyedMatrix<f64, u32, u32> = KeyedMatrix::square(vec![1, 2, 3]).unwrap();

        assert_eq!(similarities.num_rows(), 3);
        assert_eq!(similarities.num_cols(), 3);
        assert!(similarities.matrix().rows().all(|row| row.iter().all(|value| *value == 0.0)));
    }

    #[test]
    fn display_shows_keys() {
        let rendered = ratings().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "\t10\t20\t30\t");
        assert_eq!(lines[1], "apple\t5.00\t0.00\t3.00\t");
        assert_eq!(lines.len(), 3);
    }
}
