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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;

pub const DEFAULT_ITEM_THRESHOLD: f64 = 0.85;
pub const DEFAULT_USER_THRESHOLD: f64 = 0.65;

/// Tunable parameters of the recommendation engine. Can be read from a JSON file, absent fields
/// take their default values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum similarity between two items to consider them neighbours
    pub item_threshold: f64,
    /// Minimum similarity between two users to consider them neighbours
    pub user_threshold: f64,
    /// Number of threads used for computing similarity matrices
    pub num_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            item_threshold: DEFAULT_ITEM_THRESHOLD,
            user_threshold: DEFAULT_USER_THRESHOLD,
            num_threads: 1,
        }
    }
}

impl EngineConfig {

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {

    use std::io::Write;
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "user_threshold": 0.5 }"#).unwrap();

        assert_eq!(config.user_threshold, 0.5);
        assert_eq!(config.item_threshold, DEFAULT_ITEM_THRESHOLD);
        assert_eq!(config.num_threads, 1);
    }

    #[test]
    fn read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "item_threshold": 0.9, "num_threads": 4 }}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();

        assert_eq!(config.item_threshold, 0.9);
        assert_eq!(config.user_threshold, DEFAULT_USER_THRESHOLD);
        assert_eq!(config.num_threads, 4);
    }

    #[test]
    fn malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "item_threshold = 0.9").unwrap();

        assert!(EngineConfig::from_file(file.path()).is_err());
    }
}
