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
use std::io;

use thiserror::Error;

/// The two axes of a matrix, used to say where a problem occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecError {
    #[error("matrix has {expected} {axis}s, but {actual} {axis} keys were supplied")]
    DimensionMismatch { axis: Axis, expected: usize, actual: usize },

    #[error("{axis} key {key} was supplied more than once")]
    DuplicateKey { axis: Axis, key: String },

    #[error("{axis} key {key} is not present in the matrix")]
    KeyNotFound { axis: Axis, key: String },

    #[error("cosine similarity is undefined for a vector of length zero")]
    ZeroLengthVector,

    #[error("no neighbours found to predict the rating of {item} by {user}")]
    NoNeighbors { user: String, item: String },

    #[error("{axis} {index} is out of range for a matrix with {len} {axis}s")]
    IndexOutOfRange { axis: Axis, index: usize, len: usize },

    #[error("expected a square matrix, but it has {rows} rows and {cols} columns")]
    NotSquare { rows: usize, cols: usize },

    #[error("row {row} has {actual} entries, expected {expected}")]
    RaggedRows { row: usize, expected: usize, actual: usize },

    #[error("unknown strategy '{0}', expected 'item' or 'user'")]
    UnknownStrategy(String),

    #[error("matrix must have at least one row and one column")]
    EmptyMatrix,

    #[error("cannot parse '{value}' on line {line} as a number")]
    Parse { line: usize, value: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecError>;
