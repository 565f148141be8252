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

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{RecError, Result};
use crate::similarity::SimilarityComputer;
use crate::strategy::{ItemBasedStrategy, RatingStrategy, UserBasedStrategy};
use crate::types::{Item, ItemRating, PreferenceMatrix, User};

/// Mean of the nonzero ratings, zero if there are none.
pub fn mean_rating(ratings: &[f64]) -> f64 {

    let mut sum = 0.0;
    let mut num_ratings = 0;

    for rating in ratings.iter().filter(|rating| **rating != 0.0) {
        sum += rating;
        num_ratings += 1;
    }

    if num_ratings == 0 {
        0.0
    } else {
        sum / num_ratings as f64
    }
}

pub fn avg_user_rating(preferences: &PreferenceMatrix, user: &User) -> Result<f64> {
    Ok(mean_rating(&preferences.col_by_key(user)?))
}

pub fn avg_item_rating(preferences: &PreferenceMatrix, item: &Item) -> Result<f64> {
    Ok(mean_rating(preferences.row_by_key(item)?))
}

/// Removes all items whose mean rating is below `min_item_mean`, and afterwards all users who are
/// left without any rating. The remaining items and users keep their keys and relative order.
pub fn prune(preferences: &PreferenceMatrix, min_item_mean: f64) -> Result<PreferenceMatrix> {

    let mut pruned = preferences.clone();

    let weak_items: Vec<Item> = preferences.row_keys().iter()
        .zip(preferences.matrix().rows())
        .filter(|&(_, ratings)| mean_rating(ratings) < min_item_mean)
        .map(|(item, _)| item.clone())
        .collect();

    for item in &weak_items {
        pruned.delete_row_by_key(item)?;
    }

    let inactive_users: Vec<User> = pruned.col_keys().iter()
        .enumerate()
        .filter(|&(col, _)| pruned.col(col).iter().all(|rating| *rating == 0.0))
        .map(|(_, user)| *user)
        .collect();

    for user in &inactive_users {
        pruned.delete_col_by_key(user)?;
    }

    debug!(
        removed_items = weak_items.len(),
        removed_users = inactive_users.len(),
        min_item_mean,
        "pruned rating matrix"
    );

    Ok(pruned)
}

/// Predicts ratings and ranks items for users, based on a matrix of known ratings.
pub struct RecEngine<S> {
    preferences: PreferenceMatrix,
    strategy: S,
    computer: SimilarityComputer,
}

impl<S: RatingStrategy> RecEngine<S> {

    pub fn new(preferences: PreferenceMatrix, strategy: S) -> Self {
        RecEngine { preferences, strategy, computer: SimilarityComputer::sequential() }
    }

    /// Computes similarity matrices on `num_threads` threads.
    pub fn with_threads(preferences: PreferenceMatrix, strategy: S, num_threads: usize) -> Self {
        RecEngine { preferences, strategy, computer: SimilarityComputer::with_threads(num_threads) }
    }

    pub fn preferences(&self) -> &PreferenceMatrix {
        &self.preferences
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn avg_user_rating(&self, user: &User) -> Result<f64> {
        avg_user_rating(&self.preferences, user)
    }

    pub fn avg_item_rating(&self, item: &Item) -> Result<f64> {
        avg_item_rating(&self.preferences, item)
    }

    pub fn predict(&self, user: &User, item: &Item) -> Result<f64> {
        self.strategy.predict_rating(&self.preferences, &self.computer, user, item)
    }

    /// All candidate items for the user, best first. Users without any ratings get every item
    /// ranked by its mean rating. Otherwise, the unrated items are ranked by their predicted
    /// rating, items for which no prediction is possible are left out.
    pub fn rank_all(&self, user: &User) -> Result<Vec<ItemRating>> {

        let mut ratings = Vec::with_capacity(self.preferences.num_rows());

        if self.avg_user_rating(user)? == 0.0 {
            debug!(%user, "no ratings known, ranking items by their mean rating");

            for item in self.preferences.row_keys() {
                ratings.push(ItemRating::new(item.clone(), self.avg_item_rating(item)?));
            }
        } else {
            let user_index = self.preferences.col_index(user)?;

            for (item_index, item) in self.preferences.row_keys().iter().enumerate() {
                if self.preferences.get(item_index, user_index) != 0.0 {
                    continue;
                }

                match self.predict(user, item) {
                    Ok(rating) => ratings.push(ItemRating::new(item.clone(), rating)),
                    Err(RecError::NoNeighbors { .. }) => {
                        trace!(%user, %item, "no neighbours, skipping item");
                    },
                    Err(error) => return Err(error),
                }
            }
        }

        // Stable sort, ties keep matrix order
        ratings.sort();

        debug!(%user, strategy = self.strategy.name(), num_ratings = ratings.len(), "ranked items");

        Ok(ratings)
    }

    /// The `n` best items for the user.
    pub fn top_n(&self, user: &User, n: usize) -> Result<Vec<ItemRating>> {
        let mut ratings = self.rank_all(user)?;
        ratings.truncate(n);
        Ok(ratings)
    }

    /// The best items for the user, as long as their rating is at least `threshold`.
    pub fn above_threshold(&self, user: &User, threshold: f64) -> Result<Vec<ItemRating>> {
        let mut ratings = self.rank_all(user)?;
        let num_above = ratings.iter()
            .take_while(|item_rating| item_rating.rating >= threshold)
            .count();
        ratings.truncate(num_above);
        Ok(ratings)
    }
}

impl RecEngine<ItemBasedStrategy> {

    pub fn item_based(preferences: PreferenceMatrix, config: &EngineConfig) -> Self {
        RecEngine::with_threads(
            preferences,
            ItemBasedStrategy::new(config.item_threshold),
            config.num_threads,
        )
    }
}

impl RecEngine<UserBasedStrategy> {

    pub fn user_based(preferences: PreferenceMatrix, config: &EngineConfig) -> Self {
        RecEngine::with_threads(
            preferences,
            UserBasedStrategy::new(config.user_threshold),
            config.num_threads,
        )
    }
}
