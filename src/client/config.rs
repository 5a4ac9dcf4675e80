use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Result;
use ledge::camera::Follow;
use ledge::physics::Physics;
use ledge::DEFAULT_PORT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Relay address, `host:port`.
    pub server: String,
    /// Map file to play on instead of the built-in one.
    pub map: Option<PathBuf>,
    pub physics: Physics,
    pub camera: Follow,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: format!("127.0.0.1:{DEFAULT_PORT}"),
            map: None,
            physics: Physics::default(),
            camera: Follow::default(),
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
                log::info!("No config.toml, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(toml::from_str(&contents)?)
    }
}
