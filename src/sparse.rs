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

use crate::matrix::Matrix;

/// Nonzero entries as (row, column, value) triples, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateList<T> {
    pub values: Vec<T>,
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

/// Compressed sparse row layout, the nonzeros of row `i` are at `row_ptr[i]..row_ptr[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Csr<T> {
    pub values: Vec<T>,
    pub col_indices: Vec<usize>,
    pub row_ptr: Vec<usize>,
}

/// ELLPACK layout, every row is padded to the largest number of nonzeros per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellpack<T> {
    pub values: Matrix<T>,
    pub col_indices: Matrix<usize>,
}

impl<T: Copy + Default + PartialEq> Matrix<T> {

    fn nonzeros(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        self.row(row).iter()
            .enumerate()
            .filter(|&(_, value)| *value != T::default())
            .map(|(col, value)| (col, *value))
    }

    pub fn to_coordinates(&self) -> CoordinateList<T> {
        let mut coordinates = CoordinateList { values: Vec::new(), rows: Vec::new(), cols: Vec::new() };

        for row in 0..self.num_rows() {
            for (col, value) in self.nonzeros(row) {
                coordinates.values.push(value);
                coordinates.rows.push(row);
                coordinates.cols.push(col);
            }
        }

        coordinates
    }

    pub fn to_csr(&self) -> Csr<T> {
        let mut csr = Csr { values: Vec::new(), col_indices: Vec::new(), row_ptr: Vec::with_capacity(self.num_rows() + 1) };

        for row in 0..self.num_rows() {
            csr.row_ptr.push(csr.values.len());
            for (col, value) in self.nonzeros(row) {
                csr.values.push(value);
                csr.col_indices.push(col);
            }
        }
        csr.row_ptr.push(csr.values.len());

        csr
    }

    pub fn to_ellpack(&self) -> Ellpack<T> {
        let width = (0..self.num_rows())
            .map(|row| self.nonzeros(row).count())
            .max()
            .unwrap_or(0);

        let mut values = Matrix::zeros(self.num_rows(), width);
        let mut col_indices = Matrix::zeros(self.num_rows(), width);

        for row in 0..self.num_rows() {
            for (position, (col, value)) in self.nonzeros(row).enumerate() {
                values.set(row, position, value);
                col_indices.set(row, position, col);
            }
        }

        Ellpack { values, col_indices }
    }
}

impl<T: fmt::Display> fmt::Display for CoordinateList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "CoordinateList (COO format):\n")?;
        for ((row, col), value) in self.rows.iter().zip(self.cols.iter()).zip(self.values.iter()) {
            writeln!(f, "({}, {}) -> {}", row, col, value)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Display for Csr<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "CSR (Compressed Sparse Row) format:\n")?;
        writeln!(f, "Values:    {:?}", self.values)?;
        writeln!(f, "Columns:   {:?}", self.col_indices)?;
        writeln!(f, "Row_index: {:?}", self.row_ptr)
    }
}

impl<T: Copy + Default + fmt::Display> fmt::Display for Ellpack<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "ELLPACK (ELL) format:\n")?;
        writeln!(f, "Values:")?;
        write!(f, "{}", self.values)?;
        writeln!(f, "\nIndices:")?;
        write!(f, "{}", self.col_indices)
    }
}
