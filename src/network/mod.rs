use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::MovementState;
use crate::math::units::world::*;

pub mod client;
pub mod server;

/// Identifies a connected client, handed out by the relay.
#[derive(Serialize, Deserialize, PartialEq, Debug, Eq, Hash, Clone, Copy)]
#[serde(transparent)]
pub struct PeerId(pub Uuid);

impl PeerId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn raw(&self) -> Uuid {
        self.0
    }
}

impl Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a peer needs to draw someone else.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub position: Point2D,
    pub velocity: Vector2D,
    pub size: Size2D,
    pub health: u32,
    pub state: MovementState,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub id: PeerId,
    pub entity: Snapshot,
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("could not connect")]
    Connect,
    #[error("could not start listening")]
    Listen,
    #[error("invalid address {0:?}")]
    Address(String),
    #[error("could not encode packet")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("could not decode packet")]
    Decode(#[from] rmp_serde::decode::Error),
}

pub fn encode<T: Serialize>(packet: &T) -> Result<Vec<u8>, NetworkError> {
    Ok(rmp_serde::to_vec(packet)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, NetworkError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> Envelope {
        Envelope {
            id: PeerId::new_v4(),
            entity: Snapshot {
                position: Point2D::new(64.0, 128.0),
                velocity: Vector2D::new(-2.5, 0.0),
                size: Size2D::new(32.0, 64.0),
                health: 8,
                state: MovementState::Sliding,
            },
        }
    }

    #[test]
    fn packets_survive_the_wire() {
        let packet = server::Packet::Peer(client::Packet::Move(envelope()));
        let bytes = encode(&packet).unwrap();
        assert_eq!(decode::<server::Packet>(&bytes).unwrap(), packet);
    }

    #[test]
    fn garbage_is_an_error() {
        let result = decode::<client::Packet>(&[0xc1, 0x00, 0xff]);
        assert!(matches!(result, Err(NetworkError::Decode(_))));
    }
}
