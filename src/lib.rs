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

#[macro_use]
extern crate serde_derive;

use std::str::FromStr;

pub mod cluster;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod matrix;
pub mod neighbors;
pub mod recommend;
pub mod similarity;
pub mod sparse;
pub mod strategy;
pub mod types;


pub use config::EngineConfig;
pub use error::{RecError, Result};
pub use matrix::{KeyedMatrix, Matrix};
pub use recommend::RecEngine;
pub use strategy::{ItemBasedStrategy, RatingStrategy, UserBasedStrategy};
pub use types::{Item, ItemRating, PreferenceMatrix, SimilarityMatrix, User};

/// Which entities to compare when predicting ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    ItemBased,
    UserBased,
}

impl FromStr for StrategyKind {
    type Err = RecError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "item" | "item-based" => Ok(StrategyKind::ItemBased),
            "user" | "user-based" => Ok(StrategyKind::UserBased),
            _ => Err(RecError::UnknownStrategy(name.to_owned())),
        }
    }
}

/// How many of the ranked items to return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    TopN(usize),
    AboveThreshold(f64),
}

fn select<S: RatingStrategy>(engine: &RecEngine<S>, user: &User, selection: Selection)
    -> Result<Vec<ItemRating>> {

    match selection {
        Selection::TopN(n) => engine.top_n(user, n),
        Selection::AboveThreshold(threshold) => engine.above_threshold(user, threshold),
    }
}

/// Ranks the items for `user` from the ratings in `preferences`, with the given strategy.
pub fn recommendations(
    preferences: PreferenceMatrix,
    user: &User,
    strategy: StrategyKind,
    selection: Selection,
    config: &EngineConfig,
) -> Result<Vec<ItemRating>> {

    match strategy {
        StrategyKind::ItemBased => select(&RecEngine::item_based(preferences, config), user, selection),
        StrategyKind::UserBased => select(&RecEngine::user_based(preferences, config), user, selection),
    }
}
