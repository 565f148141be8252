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

use crate::error::Result;
use crate::types::SimilarityMatrix;

/// A neighbour of some target entity together with its similarity to the target.
#[derive(PartialEq, Debug, Clone)]
pub struct Neighbor<K> {
    pub key: K,
    pub similarity: f64,
}

/// Selects all entities whose similarity to `target` is at least `threshold`, in matrix order.
/// The target itself is never its own neighbour, undefined (`NaN`) similarities never qualify.
pub fn select_neighbors<K>(
    similarities: &SimilarityMatrix<K>,
    target: &K,
    threshold: f64,
) -> Result<Vec<Neighbor<K>>>
    where K: Clone + Eq + Hash + fmt::Display {

    let row = similarities.row_by_key(target)?;

    let neighbors = similarities.col_keys().iter()
        .zip(row.iter())
        .filter(|&(key, similarity)| key != target && *similarity >= threshold)
        .map(|(key, similarity)| Neighbor { key: key.clone(), similarity: *similarity })
        .collect();

    Ok(neighbors)
}
