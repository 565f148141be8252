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

use tracing::trace;

use crate::config::{DEFAULT_ITEM_THRESHOLD, DEFAULT_USER_THRESHOLD};
use crate::error::{RecError, Result};
use crate::neighbors::{self, Neighbor};
use crate::recommend::avg_user_rating;
use crate::similarity::SimilarityComputer;
use crate::types::{Item, PreferenceMatrix, SimilarityMatrix, User};

/// A way of predicting the rating of an item by a user from the ratings of similar entities.
pub trait RatingStrategy {

    /// The kind of entity compared by this strategy, users or items.
    type Key: Clone + Eq + Hash + fmt::Display;

    fn name(&self) -> &'static str;

    /// Minimum similarity of a neighbour.
    fn threshold(&self) -> f64;

    /// Computes the pairwise similarities of `candidates` from their rating vectors.
    fn build_similarity_matrix(
        &self,
        candidates: Vec<Self::Key>,
        preferences: &PreferenceMatrix,
        computer: &SimilarityComputer,
    ) -> Result<SimilarityMatrix<Self::Key>>;

    fn predict_rating(
        &self,
        preferences: &PreferenceMatrix,
        computer: &SimilarityComputer,
        user: &User,
        item: &Item,
    ) -> Result<f64>;
}

fn no_neighbors(user: &User, item: &Item) -> RecError {
    RecError::NoNeighbors { user: user.to_string(), item: item.to_string() }
}

/// Compares items (rows of the preference matrix) with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBasedStrategy {
    pub threshold: f64,
}

impl Default for ItemBasedStrategy {
    fn default() -> Self {
        ItemBasedStrategy { threshold: DEFAULT_ITEM_THRESHOLD }
    }
}

impl ItemBasedStrategy {
    pub fn new(threshold: f64) -> Self {
        ItemBasedStrategy { threshold }
    }
}

impl RatingStrategy for ItemBasedStrategy {

    type Key = Item;

    fn name(&self) -> &'static str {
        "item-based"
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn build_similarity_matrix(
        &self,
        candidates: Vec<Item>,
        preferences: &PreferenceMatrix,
        computer: &SimilarityComputer,
    ) -> Result<SimilarityMatrix<Item>> {

        let vectors = candidates.iter()
            .map(|item| preferences.row_by_key(item).map(|row| row.to_vec()))
            .collect::<Result<Vec<_>>>()?;

        computer.compute(candidates, &vectors)
    }

    /// Similarity-weighted average over the neighbouring items rated by the user. If the user
    /// rated none of them, each neighbour contributes its mean rating over all of its raters.
    fn predict_rating(
        &self,
        preferences: &PreferenceMatrix,
        computer: &SimilarityComputer,
        user: &User,
        item: &Item,
    ) -> Result<f64> {

        let user_index = preferences.col_index(user)?;
        preferences.row_index(item)?;

        // Items are always compared against the whole catalog
        let candidates = preferences.row_keys().to_vec();
        let similarities = self.build_similarity_matrix(candidates, preferences, computer)?;
        let neighbors = neighbors::select_neighbors(&similarities, item, self.threshold)?;

        trace!(%user, %item, num_neighbors = neighbors.len(), "selected neighbouring items");

        let mut rated_neighbors: Vec<(&Neighbor<Item>, f64)> = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors.iter() {
            let rating = preferences.get(preferences.row_index(&neighbor.key)?, user_index);
            if rating != 0.0 {
                rated_neighbors.push((neighbor, rating));
            }
        }

        let mut weighted_ratings = 0.0;
        let mut sum_of_similarities = 0.0;

        if !rated_neighbors.is_empty() {
            for (neighbor, rating) in rated_neighbors {
                weighted_ratings += rating * neighbor.similarity;
                sum_of_similarities += neighbor.similarity.abs();
            }
        } else {
            for neighbor in neighbors.iter() {
                let ratings = preferences.row_by_key(&neighbor.key)?;

                let mut weighted_neighbor_ratings = 0.0;
                let mut num_raters = 0;
                for rating in ratings.iter().filter(|rating| **rating != 0.0) {
                    weighted_neighbor_ratings += rating * neighbor.similarity;
                    num_raters += 1;
                }

                // Neighbours always have raters, otherwise their similarity would be undefined
                if num_raters > 0 {
                    weighted_ratings += weighted_neighbor_ratings / num_raters as f64;
                }
                sum_of_similarities += neighbor.similarity.abs();
            }
        }

        if sum_of_similarities == 0.0 {
            return Err(no_neighbors(user, item));
        }

        Ok(weighted_ratings / sum_of_similarities)
    }
}

/// Compares users (columns of the preference matrix) with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserBasedStrategy {
    pub threshold: f64,
}

impl Default for UserBasedStrategy {
    fn default() -> Self {
        UserBasedStrategy { threshold: DEFAULT_USER_THRESHOLD }
    }
}

impl UserBasedStrategy {
    pub fn new(threshold: f64) -> Self {
        UserBasedStrategy { threshold }
    }
}

impl RatingStrategy for UserBasedStrategy {

    type Key = User;

    fn name(&self) -> &'static str {
        "user-based"
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn build_similarity_matrix(
        &self,
        candidates: Vec<User>,
        preferences: &PreferenceMatrix,
        computer: &SimilarityComputer,
    ) -> Result<SimilarityMatrix<User>> {

        let vectors = candidates.iter()
            .map(|user| preferences.col_by_key(user))
            .collect::<Result<Vec<_>>>()?;

        computer.compute(candidates, &vectors)
    }

    /// The user's mean rating, shifted by the similarity-weighted deviations of the neighbours'
    /// ratings of the item from their own mean ratings.
    fn predict_rating(
        &self,
        preferences: &PreferenceMatrix,
        computer: &SimilarityComputer,
        user: &User,
        item: &Item,
    ) -> Result<f64> {

        let user_index = preferences.col_index(user)?;
        let item_index = preferences.row_index(item)?;

        // Only users who rated the item can be neighbours
        let candidates: Vec<User> = preferences.col_keys().iter()
            .enumerate()
            .filter(|&(col, _)| preferences.get(item_index, col) != 0.0 || col == user_index)
            .map(|(_, candidate)| *candidate)
            .collect();

        let similarities = self.build_similarity_matrix(candidates, preferences, computer)?;
        let neighbors = neighbors::select_neighbors(&similarities, user, self.threshold)?;

        trace!(%user, %item, num_neighbors = neighbors.len(), "selected neighbouring users");

        let mut weighted_deviations = 0.0;
        let mut sum_of_similarities = 0.0;

        for neighbor in neighbors.iter() {
            let rating = preferences.get(item_index, preferences.col_index(&neighbor.key)?);
            let deviation = rating - avg_user_rating(preferences, &neighbor.key)?;

            weighted_deviations += deviation * neighbor.similarity;
            sum_of_similarities += neighbor.similarity.abs();
        }

        if sum_of_similarities == 0.0 {
            return Err(no_neighbors(user, item));
        }

        Ok(avg_user_rating(preferences, user)? + weighted_deviations / sum_of_similarities)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::matrix::{KeyedMatrix, Matrix};
    use crate::types::{consecutive_items, consecutive_users};

    fn preferences(rows: Vec<Vec<f64>>) -> PreferenceMatrix {
        let matrix = Matrix::from_rows(rows).unwrap();
        let items = consecutive_items(matrix.num_rows());
        let users = consecutive_users(matrix.num_cols());
        KeyedMatrix::new(matrix, items, users).unwrap()
    }

    fn close_enough_to(value: f64, expected: f64) -> bool {
        (value - expected).abs() < 0.0001
    }

    #[test]
    fn default_thresholds() {
        assert_eq!(ItemBasedStrategy::default().threshold(), 0.85);
        assert_eq!(UserBasedStrategy::default().threshold(), 0.65);
        assert_eq!(ItemBasedStrategy::new(0.5).threshold(), 0.5);
    }

    #[test]
    fn item_based_uses_ratings_of_the_user() {
        let preferences = preferences(vec![
            vec![5.0, 4.0, 0.0],
            vec![4.0, 5.0, 3.0],
            vec![0.0, 1.0, 5.0],
        ]);

        let strategy = ItemBasedStrategy::default();
        let prediction = strategy.predict_rating(
            &preferences,
            &SimilarityComputer::sequential(),
            &User::new(3),
            &Item::new(1),
        ).unwrap();

        // P2 is the only neighbour of P1 and the user gave it a 3
        assert!(close_enough_to(prediction, 3.0));
    }

    #[test]
    fn item_based_falls_back_to_neighbour_means() {
        let preferences = preferences(vec![
            vec![5.0, 4.0, 0.0],
            vec![4.0, 5.0, 0.0],
            vec![0.0, 1.0, 5.0],
            vec![5.0, 5.0, 0.0],
        ]);

        let strategy = ItemBasedStrategy::default();
        let prediction = strategy.predict_rating(
            &preferences,
            &SimilarityComputer::sequential(),
            &User::new(3),
            &Item::new(1),
        ).unwrap();

        // Weighted mean of the means 4.5 (P2) and 5.0 (P4)
        assert!(close_enough_to(prediction, 4.752319629217066));
    }

    #[test]
    fn item_based_without_neighbours() {
        let preferences = preferences(vec![
            vec![5.0, 0.0, 0.0],
            vec![0.0, 5.0, 3.0],
        ]);

        let strategy = ItemBasedStrategy::default();
        let result = strategy.predict_rating(
            &preferences,
            &SimilarityComputer::sequential(),
            &User::new(2),
            &Item::new(1),
        );

        assert!(matches!(result, Err(RecError::NoNeighbors { .. })));
    }

    #[test]
    fn item_based_similarity_matrix_covers_candidates() {
        let preferences = preferences(vec![
            vec![5.0, 4.0],
            vec![0.0, 0.0],
            vec![4.0, 5.0],
        ]);

        let similarities = ItemBasedStrategy::default().build_similarity_matrix(
            preferences.row_keys().to_vec(),
            &preferences,
            &SimilarityComputer::sequential(),
        ).unwrap();

        assert_eq!(similarities.num_rows(), 3);
        assert!(similarities.get(0, 1).is_nan());
        assert!(close_enough_to(similarities.get(0, 2), 40.0 / 41.0));
    }

    #[test]
    fn user_based_mean_centered_prediction() {
        let preferences = preferences(vec![
            vec![5.0, 4.0, 0.0],
            vec![4.0, 4.0, 4.0],
            vec![1.0, 1.0, 5.0],
        ]);

        let strategy = UserBasedStrategy::new(0.5);
        let prediction = strategy.predict_rating(
            &preferences,
            &SimilarityComputer::sequential(),
            &User::new(3),
            &Item::new(1),
        ).unwrap();

        assert!(close_enough_to(prediction, 5.81326081022019));
    }

    #[test]
    fn user_based_without_neighbours() {
        let preferences = preferences(vec![
            vec![5.0, 4.0, 0.0],
            vec![4.0, 4.0, 4.0],
            vec![1.0, 1.0, 5.0],
        ]);

        // Both candidate similarities are below 0.65
        let result = UserBasedStrategy::default().predict_rating(
            &preferences,
            &SimilarityComputer::sequential(),
            &User::new(3),
            &Item::new(1),
        );

        assert!(matches!(result, Err(RecError::NoNeighbors { .. })));
    }

    #[test]
    fn user_based_compares_only_raters_of_the_item() {
        let preferences = preferences(vec![
            vec![5.0, 0.0, 0.0, 4.0],
            vec![4.0, 5.0, 4.0, 4.0],
        ]);

        let strategy = UserBasedStrategy::new(0.0);
        let prediction = strategy.predict_rating(
            &preferences,
            &SimilarityComputer::sequential(),
            &User::new(3),
            &Item::new(1),
        ).unwrap();

        // U2 never rated P1 and is no candidate, U1 and U4 deviate by +0.5 and 0.0 from their means
        let similarity_u1 = 16.0 / (41.0_f64.sqrt() * 4.0);
        let similarity_u4 = 16.0 / (32.0_f64.sqrt() * 4.0);
        let expected = 4.0 + (0.5 * similarity_u1) / (similarity_u1 + similarity_u4);

        assert!(close_enough_to(prediction, expected));
    }

    #[test]
    fn unknown_keys_are_reported() {
        let preferences = preferences(vec![vec![5.0, 4.0]]);
        let computer = SimilarityComputer::sequential();

        let unknown_user = ItemBasedStrategy::default()
            .predict_rating(&preferences, &computer, &User::new(9), &Item::new(1));
        let unknown_item = UserBasedStrategy::default()
            .predict_rating(&preferences, &computer, &User::new(1), &Item::new(9));

        assert!(matches!(unknown_user, Err(RecError::KeyNotFound { .. })));
        assert!(matches!(unknown_item, Err(RecError::KeyNotFound { .. })));
    }
}
