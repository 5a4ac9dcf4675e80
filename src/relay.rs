//! Routing for the relay server.
//!
//! The relay never looks inside what clients send, it hands out ids and
//! forwards every packet to everyone else. Endpoints are generic so the
//! routing works the same with sockets or in tests.

use std::hash::Hash;

use bimap::BiMap;

use crate::network::{client, server, PeerId};

/// A packet and everyone who should get it.
#[derive(Debug, PartialEq)]
pub struct Outgoing<E> {
    pub targets: Vec<E>,
    pub packet: server::Packet,
}

pub struct Relay<E> {
    peers: BiMap<PeerId, E>,
}

impl<E> Relay<E>
where
    E: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self { peers: BiMap::new() }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn peer(&self, endpoint: E) -> Option<PeerId> {
        self.peers.get_by_right(&endpoint).copied()
    }

    /// Registers a new connection and greets it with its id.
    pub fn connect(&mut self, endpoint: E) -> Outgoing<E> {
        let id = PeerId::new_v4();
        self.peers.insert(id, endpoint);

        Outgoing {
            targets: vec![endpoint],
            packet: server::Packet::Init(id),
        }
    }

    /// Forwards a client packet to every other connection.
    pub fn forward(&self, from: E, packet: client::Packet) -> Option<Outgoing<E>> {
        if self.peer(from).is_none() {
            return None;
        }

        Some(Outgoing {
            targets: self.others(from),
            packet: server::Packet::Peer(packet),
        })
    }

    /// Drops a connection and tells everyone left behind.
    pub fn disconnect(&mut self, endpoint: E) -> Option<Outgoing<E>> {
        let (id, _) = self.peers.remove_by_right(&endpoint)?;

        Some(Outgoing {
            targets: self.peers.right_values().copied().collect(),
            packet: server::Packet::Leave(id),
        })
    }

    fn others(&self, exclude: E) -> Vec<E> {
        self.peers.right_values().copied().filter(|&endpoint| endpoint != exclude).collect()
    }
}

impl<E> Default for Relay<E>
where
    E: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::network::Envelope;

    fn greeted_id(outgoing: &Outgoing<u32>) -> PeerId {
        match outgoing.packet {
            server::Packet::Init(id) => id,
            ref other => panic!("expected init, got {other:?}"),
        }
    }

    #[test]
    fn connect_sends_init_to_newcomer_only() {
        let mut relay = Relay::new();
        relay.connect(1);
        let greeting = relay.connect(2);

        assert_eq!(greeting.targets, vec![2]);
        assert_eq!(relay.peer(2), Some(greeted_id(&greeting)));
        assert_eq!(relay.len(), 2);
    }

    #[test]
    fn forwards_to_everyone_but_the_sender() {
        let mut relay = Relay::new();
        let id = greeted_id(&relay.connect(1));
        relay.connect(2);
        relay.connect(3);

        let packet = client::Packet::Move(Envelope { id, entity: Entity::new(8).snapshot() });
        let mut outgoing = relay.forward(1, packet).unwrap();
        outgoing.targets.sort();

        assert_eq!(outgoing.targets, vec![2, 3]);
        assert_eq!(outgoing.packet, server::Packet::Peer(packet));
    }

    #[test]
    fn unknown_senders_are_dropped() {
        let relay = Relay::<u32>::new();
        let packet = client::Packet::Join(Envelope { id: PeerId::new_v4(), entity: Entity::new(8).snapshot() });
        assert!(relay.forward(9, packet).is_none());
    }

    #[test]
    fn disconnect_announces_leave() {
        let mut relay = Relay::new();
        let id = greeted_id(&relay.connect(1));
        relay.connect(2);

        let outgoing = relay.disconnect(1).unwrap();

        assert_eq!(outgoing.targets, vec![2]);
        assert_eq!(outgoing.packet, server::Packet::Leave(id));
        assert!(relay.disconnect(1).is_none(), "second disconnect is a no-op");
        assert_eq!(relay.len(), 1);
    }
}
