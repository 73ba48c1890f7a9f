/*
    slr-tracking, sun-safe pass planning for satellite laser ranging
    Copyright (C) 2024-onwards slr-tracking contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub mod export;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read the configuration file: {0}")]
    ReadError(#[from] io::Error),

    #[error("cannot parse the YAML configuration: {0}")]
    ParseError(#[source] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PartialEq for ConfigError {
    /// Configuration errors never compare equal, by any path
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

/// Station and tracking settings loadable from YAML files.
pub trait ConfigRepr: Debug + Sized + Serialize + DeserializeOwned {
    /// Loads a single instance from the YAML file at `path`.
    fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let reader = BufReader::new(File::open(path)?);
        serde_yaml::from_reader(reader).map_err(ConfigError::ParseError)
    }

    /// Loads an ordered list of instances from the YAML file at `path`.
    fn load_many<P>(path: P) -> Result<Vec<Self>, ConfigError>
    where
        P: AsRef<Path>,
    {
        let reader = BufReader::new(File::open(path)?);
        serde_yaml::from_reader(reader).map_err(ConfigError::ParseError)
    }

    /// Parses an ordered list of instances from in-memory YAML.
    fn loads_many(data: &str) -> Result<Vec<Self>, ConfigError> {
        debug!("Loading YAML:\n{data}");
        serde_yaml::from_str(data).map_err(ConfigError::ParseError)
    }
}
