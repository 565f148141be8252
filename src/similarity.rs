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
use std::sync::Mutex;

use scoped_pool::Pool;
use tracing::{debug, trace, warn};

use crate::error::{RecError, Result};
use crate::types::SimilarityMatrix;

pub fn vector_length(vector: &[f64]) -> f64 {
    vector.iter().map(|value| value * value).sum::<f64>().sqrt()
}

/// Dot product over the common prefix of both vectors.
pub fn dot_product(vector_a: &[f64], vector_b: &[f64]) -> f64 {
    vector_a.iter().zip(vector_b.iter()).map(|(a, b)| a * b).sum()
}

/// Cosine of the angle between two rating vectors. Missing ratings are zeros and are not imputed.
pub fn cosine_similarity(vector_a: &[f64], vector_b: &[f64]) -> Result<f64> {

    let length_a = vector_length(vector_a);
    let length_b = vector_length(vector_b);

    if length_a == 0.0 || length_b == 0.0 {
        return Err(RecError::ZeroLengthVector);
    }

    Ok(dot_product(vector_a, vector_b) / (length_a * length_b))
}

/// Computes the similarities of all pairs in the upper triangle, optionally on a thread pool.
pub struct SimilarityComputer {
    pool: Option<Pool>,
    num_threads: usize,
}

impl SimilarityComputer {

    pub fn sequential() -> Self {
        SimilarityComputer { pool: None, num_threads: 1 }
    }

    /// Uses a pool with `num_threads` workers, a single thread means sequential computation.
    pub fn with_threads(num_threads: usize) -> Self {
        if num_threads > 1 {
            SimilarityComputer { pool: Some(Pool::new(num_threads)), num_threads }
        } else {
            SimilarityComputer::sequential()
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Builds the symmetric similarity matrix for `keys`, where `vectors[i]` holds the ratings of
    /// `keys[i]`. The diagonal stays zero. Pairs involving a vector of length zero are stored as
    /// `NaN`, so that they never pass a neighbour threshold.
    pub fn compute<K>(&self, keys: Vec<K>, vectors: &[Vec<f64>]) -> Result<SimilarityMatrix<K>>
        where K: Clone + Eq + Hash + fmt::Display {

        let num_entities = keys.len();
        let upper_triangle: Vec<Mutex<Vec<Result<f64>>>> = (0..num_entities)
            .map(|_| Mutex::new(Vec::new()))
            .collect();

        match self.pool {
            Some(ref pool) => {
                pool.scoped(|scope| {
                    for (index, row) in upper_triangle.iter().enumerate() {
                        scope.execute(move || {
                            let similarities = similarities_to_successors(index, vectors);
                            // A poisoned lock can only stem from a panic in another row
                            if let Ok(mut row) = row.lock() {
                                *row = similarities;
                            }
                        });
                    }
                });
            },
            None => {
                for (index, row) in upper_triangle.iter().enumerate() {
                    if let Ok(mut row) = row.lock() {
                        *row = similarities_to_successors(index, vectors);
                    }
                }
            }
        }

        let mut similarity_matrix = SimilarityMatrix::square(keys)?;
        let mut num_invalid = 0;

        for (index, row) in upper_triangle.into_iter().enumerate() {
            let similarities = row.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
            num_invalid += store_successors(&mut similarity_matrix, index, similarities);
        }

        debug!(num_entities, num_invalid, threads = self.num_threads(), "built similarity matrix");

        Ok(similarity_matrix)
    }
}

impl Drop for SimilarityComputer {
    fn drop(&mut self) {
        if let Some(ref pool) = self.pool {
            pool.shutdown();
        }
    }
}

/// Writes the similarities of entity `index` to all entities after it into both triangles of the
/// matrix. Cells without a valid similarity, including those missing from `similarities`, become
/// `NaN`. Returns the number of such cells.
fn store_successors<K>(
    similarity_matrix: &mut SimilarityMatrix<K>,
    index: usize,
    similarities: Vec<Result<f64>>,
) -> usize
    where K: Clone + Eq + Hash + fmt::Display {

    let num_successors = similarity_matrix.num_rows() - index - 1;
    if similarities.len() < num_successors {
        warn!(index, expected = num_successors, actual = similarities.len(),
            "similarities missing, marking them as undefined");
    }

    let mut similarities = similarities.into_iter();
    let mut num_invalid = 0;

    for other_index in (index + 1)..similarity_matrix.num_rows() {
        let value = match similarities.next() {
            Some(Ok(similarity)) => similarity,
            Some(Err(error)) => {
                trace!(index, other_index, %error, "similarity undefined");
                num_invalid += 1;
                std::f64::NAN
            },
            None => {
                num_invalid += 1;
                std::f64::NAN
            },
        };
        similarity_matrix.set(index, other_index, value);
        similarity_matrix.set(other_index, index, value);
    }

    num_invalid
}

fn similarities_to_successors(index: usize, vectors: &[Vec<f64>]) -> Vec<Result<f64>> {
    vectors[index + 1..].iter()
        .map(|other| cosine_similarity(&vectors[index], other))
        .collect()
}

/// The most similar pair of rows `(a, b)` with `a < b`, ties are resolved in favour of the pair
/// found first. Rows of length zero are skipped.
pub fn closest_pair<'a, I>(rows: I) -> Option<(usize, usize, f64)>
    where I: IntoIterator<Item = &'a [f64]> {

    let rows: Vec<&[f64]> = rows.into_iter().collect();
    let mut closest: Option<(usize, usize, f64)> = None;

    for (index, row) in rows.iter().enumerate() {
        for (other_index, other_row) in rows.iter().enumerate().skip(index + 1) {
            if let Ok(similarity) = cosine_similarity(row, other_row) {
                let is_closer = match closest {
                    Some((_, _, best)) => similarity > best,
                    None => true,
                };
                if is_closer {
                    closest = Some((index, other_index, similarity));
                }
            }
        }
    }

    closest
}
