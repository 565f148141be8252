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

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::matrix::KeyedMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct User {
    pub id: u32,
}

impl User {
    pub fn new(id: u32) -> Self {
        User { id }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "U{}", self.id)
    }
}

/// An item is identified by its id only, the name is for display purposes.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: u32,
    pub name: Option<String>,
}

impl Item {
    pub fn new(id: u32) -> Self {
        Item { id, name: None }
    }

    pub fn named(id: u32, name: &str) -> Self {
        Item { id, name: Some(name.to_owned()) }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "P{}", self.id)
    }
}

/// Ratings of items (rows) by users (columns), a zero denotes a missing rating.
pub type PreferenceMatrix = KeyedMatrix<f64, Item, User>;

/// Square matrix of pairwise similarities between users or items.
pub type SimilarityMatrix<K> = KeyedMatrix<f64, K, K>;

/// Users `U1..Un`, the ids are one-based.
pub fn consecutive_users(num_users: usize) -> Vec<User> {
    (1..=num_users as u32).map(User::new).collect()
}

/// Items `P1..Pn`, the ids are one-based.
pub fn consecutive_items(num_items: usize) -> Vec<Item> {
    (1..=num_items as u32).map(Item::new).collect()
}

/// A known or predicted rating for an item. Ordered by descending rating, so that sorting a
/// list of ratings puts the best ones first.
#[derive(PartialEq, Debug, Clone)]
pub struct ItemRating {
    pub item: Item,
    pub rating: f64,
}

impl ItemRating {
    pub fn new(item: Item, rating: f64) -> Self {
        ItemRating { item, rating }
    }
}

/// There is no total order on floating point numbers, incomparable ratings are treated as equal.
fn cmp_reverse(rating_a: &ItemRating, rating_b: &ItemRating) -> Ordering {
    match rating_a.rating.partial_cmp(&rating_b.rating) {
        Some(Ordering::Less) => Ordering::Greater,
        Some(Ordering::Greater) => Ordering::Less,
        Some(Ordering::Equal) => Ordering::Equal,
        None => Ordering::Equal
    }
}

impl Eq for ItemRating {}

impl Ord for ItemRating {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_reverse(self, other)
    }
}

impl PartialOrd for ItemRating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(cmp_reverse(self, other))
    }
}

#[cfg(test)]
mod tests {

    use fnv::FnvHashSet;
    use super::*;

    #[test]
    fn items_are_equal_by_id() {
        let mut items = FnvHashSet::default();
        items.insert(Item::named(3, "apple"));

        assert!(items.contains(&Item::new(3)));
        assert!(!items.contains(&Item::new(4)));
        assert_eq!(Item::named(3, "apple").to_string(), "P3");
        assert_eq!(User::new(7).to_string(), "U7");
    }

    #[test]
    fn item_rating_ordering_reversed() {
        let rating_a = ItemRating::new(Item::new(1), 0.5);
        let rating_b = ItemRating::new(Item::new(2), 1.5);
        let rating_c = ItemRating::new(Item::new(3), 0.3);

        assert!(rating_a > rating_b);
        assert!(rating_a < rating_c);
        assert!(rating_b < rating_c);

        let mut ratings = vec![rating_a, rating_b, rating_c];
        ratings.sort();

        let ids: Vec<u32> = ratings.iter().map(|rating| rating.item.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn consecutive_keys_are_one_based() {
        let users = consecutive_users(3);
        let items = consecutive_items(2);

        assert_eq!(users, vec![User::new(1), User::new(2), User::new(3)]);
        assert_eq!(items, vec![Item::new(1), Item::new(2)]);
    }
}
