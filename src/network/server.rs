use serde::{Deserialize, Serialize};

use super::{client, PeerId};

/// Packets sent from the relay to a client
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub enum Packet {
    /// Sent once, right after connecting.
    Init(PeerId),
    /// Something another client sent.
    Peer(client::Packet),
    Leave(PeerId),
}
