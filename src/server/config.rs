use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Result;
use ledge::DEFAULT_PORT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub listen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: format!("0.0.0.0:{DEFAULT_PORT}"),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn load() -> Result<Self> {
        let contents = match std::fs::read_to_string(Self::path()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("No config.toml, listening on the default port");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(toml::from_str(&contents)?)
    }
}
