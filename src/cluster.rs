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

use tracing::debug;

use crate::error::{RecError, Result};
use crate::matrix::Matrix;

/// A single merge of two clusters during agglomeration.
#[derive(PartialEq, Debug, Clone)]
pub struct MergeStep {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub similarity: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Clustering {
    pub steps: Vec<MergeStep>,
    pub clusters: Vec<Vec<usize>>,
}

/// Renders a cluster of zero-based indices as one-based labels, e.g. `U1+U3`.
pub fn cluster_label(cluster: &[usize], prefix: &str) -> String {
    cluster.iter()
        .map(|index| format!("{}{}", prefix, index + 1))
        .collect::<Vec<_>>()
        .join("+")
}

/// Position and value of the largest similarity above the diagonal, the first one wins on ties.
fn most_similar_pair(similarities: &Matrix<f64>) -> Option<(usize, usize, f64)> {

    let mut best: Option<(usize, usize, f64)> = None;

    for row in 0..similarities.num_rows() {
        for col in (row + 1)..similarities.num_cols() {
            let similarity = similarities.get(row, col);
            let is_better = match best {
                Some((_, _, best_similarity)) => similarity > best_similarity,
                None => !similarity.is_nan(),
            };
            if is_better {
                best = Some((row, col, similarity));
            }
        }
    }

    best
}

/// Hierarchical agglomerative clustering with single linkage on a square similarity matrix.
/// Starts with one cluster per entity and merges the two most similar clusters until their
/// similarity drops below `threshold` or a single cluster remains.
pub fn agglomerate(similarities: &Matrix<f64>, threshold: f64) -> Result<Clustering> {

    if similarities.num_rows() != similarities.num_cols() {
        return Err(RecError::NotSquare { rows: similarities.num_rows(), cols: similarities.num_cols() });
    }

    let mut similarities = similarities.clone();
    let mut clusters: Vec<Vec<usize>> = (0..similarities.num_rows()).map(|index| vec![index]).collect();
    let mut steps = Vec::new();

    while clusters.len() > 1 {

        let (left, right, similarity) = match most_similar_pair(&similarities) {
            Some((left, right, similarity)) if similarity >= threshold => (left, right, similarity),
            _ => break,
        };

        debug!(left = %cluster_label(&clusters[left], "U"), right = %cluster_label(&clusters[right], "U"),
            similarity, "merging clusters");

        for other in 0..similarities.num_rows() {
            if other != left && other != right {
                let merged = similarities.get(left, other).max(similarities.get(right, other));
                similarities.set(left, other, merged);
                similarities.set(other, left, merged);
            }
        }

        similarities.delete_row(right)?;
        similarities.delete_col(right)?;

        // left < right, so removing right keeps the position of left
        let right_members = clusters.remove(right);
        steps.push(MergeStep {
            left: clusters[left].clone(),
            right: right_members.clone(),
            similarity,
        });
        clusters[left].extend(right_members);
    }

    Ok(Clustering { steps, clusters })
}
