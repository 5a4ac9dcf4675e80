use serde::{Deserialize, Serialize};

use super::{Envelope, PeerId};

/// Packets sent from a client, the relay passes them on untouched
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub enum Packet {
    /// Announces a newcomer to everyone already connected.
    Join(Envelope),
    /// Answer to a [`Packet::Join`].
    Show(Envelope),
    Move(Envelope),
}

impl Packet {
    pub fn envelope(&self) -> &Envelope {
        match self {
            Packet::Join(envelope) | Packet::Show(envelope) | Packet::Move(envelope) => envelope,
        }
    }

    pub fn sender(&self) -> PeerId {
        self.envelope().id
    }

    pub fn name(&self) -> &'static str {
        match self {
            Packet::Join(_) => "join",
            Packet::Show(_) => "show",
            Packet::Move(_) => "move",
        }
    }
}
