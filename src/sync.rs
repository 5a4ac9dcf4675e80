//! Keeps remote peers in step with the local player.
//!
//! Inbound packets are handed over in one batch per tick, so the peer table
//! only ever changes from the tick's thread of control.

use std::collections::HashMap;

use crate::entity::Entity;
use crate::math::units::world::Point2D;
use crate::network::{client, server, Envelope, PeerId};

/// Where outgoing packets go. Sends are fire-and-forget.
pub trait Outbound {
    fn send(&mut self, packet: &client::Packet);
}

impl Outbound for Vec<client::Packet> {
    fn send(&mut self, packet: &client::Packet) {
        self.push(*packet);
    }
}

#[derive(Debug, Default)]
pub struct NetworkSync {
    id: Option<PeerId>,
    peers: HashMap<PeerId, Entity>,
}

impl NetworkSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Our id, once the relay has sent it.
    pub fn id(&self) -> Option<PeerId> {
        self.id
    }

    pub fn peers(&self) -> &HashMap<PeerId, Entity> {
        &self.peers
    }

    pub fn peer(&self, id: PeerId) -> Option<&Entity> {
        self.peers.get(&id)
    }

    fn envelope(&self, local: &Entity) -> Option<Envelope> {
        self.id.map(|id| Envelope {
            id,
            entity: local.snapshot(),
        })
    }

    pub fn handle<O: Outbound>(&mut self, packet: server::Packet, local: &Entity, out: &mut O) {
        log::debug!("{packet:?}");

        match packet {
            server::Packet::Init(id) => {
                log::info!("Joined relay as {id}");
                self.id = Some(id);
                self.peers.remove(&id);

                if let Some(envelope) = self.envelope(local) {
                    out.send(&client::Packet::Join(envelope));
                }
            }
            server::Packet::Peer(packet) => self.handle_peer(packet, local, out),
            server::Packet::Leave(id) => {
                if self.peers.remove(&id).is_some() {
                    log::info!("Peer {id} left ({} remaining)", self.peers.len());
                }
            }
        }
    }

    fn handle_peer<O: Outbound>(&mut self, packet: client::Packet, local: &Entity, out: &mut O) {
        let Envelope { id, entity } = *packet.envelope();

        if Some(id) == self.id {
            log::warn!("Ignoring {} that claims to be from us", packet.name());
            return;
        }

        match packet {
            client::Packet::Join(_) => {
                log::info!("Peer {id} joined");
                self.peers.insert(id, Entity::from(entity));

                if let Some(envelope) = self.envelope(local) {
                    out.send(&client::Packet::Show(envelope));
                }
            }
            client::Packet::Show(_) => {
                self.peers.insert(id, Entity::from(entity));
            }
            client::Packet::Move(_) => match self.peers.get_mut(&id) {
                Some(peer) => peer.apply(entity),
                None => {
                    log::debug!("Move from unknown peer {id}, adding it");
                    self.peers.insert(id, Entity::from(entity));
                }
            },
        }
    }

    /// Sends a move if `local` ended the tick somewhere other than `previous`.
    pub fn emit_if_moved<O: Outbound>(&mut self, previous: Point2D, local: &Entity, out: &mut O) -> bool {
        if previous == local.position {
            return false;
        }

        match self.envelope(local) {
            Some(envelope) => {
                out.send(&client::Packet::Move(envelope));
                true
            }
            None => false,
        }
    }

    /// Forget every peer, used when the connection to the relay is lost.
    pub fn clear(&mut self) {
        self.id = None;
        self.peers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Snapshot;

    fn snapshot_at(x: f32, y: f32) -> Snapshot {
        let mut entity = Entity::new(8);
        entity.position = Point2D::new(x, y);
        entity.grounded = true;
        entity.snapshot()
    }

    fn joined() -> (NetworkSync, PeerId, Vec<client::Packet>) {
        let mut sync = NetworkSync::new();
        let mut out: Vec<client::Packet> = Vec::new();
        let id = PeerId::new_v4();
        sync.handle(server::Packet::Init(id), &Entity::new(8), &mut out);
        (sync, id, out)
    }

    #[test]
    fn init_announces_join() {
        let (sync, id, out) = joined();

        assert_eq!(sync.id(), Some(id));
        assert!(matches!(out.as_slice(), [client::Packet::Join(Envelope { id: sent, .. })] if *sent == id));
    }

    #[test]
    fn join_is_answered_with_show() {
        let (mut sync, id, mut out) = joined();
        out.clear();

        let other = PeerId::new_v4();
        let join = client::Packet::Join(Envelope { id: other, entity: snapshot_at(10.0, 20.0) });
        sync.handle(server::Packet::Peer(join), &Entity::new(8), &mut out);

        assert_eq!(sync.peer(other).map(|e| e.position), Some(Point2D::new(10.0, 20.0)));
        assert!(matches!(out.as_slice(), [client::Packet::Show(Envelope { id: sent, .. })] if *sent == id));
    }

    #[test]
    fn show_adds_peer_without_reply() {
        let (mut sync, _, mut out) = joined();
        out.clear();

        let other = PeerId::new_v4();
        let show = client::Packet::Show(Envelope { id: other, entity: snapshot_at(1.0, 2.0) });
        sync.handle(server::Packet::Peer(show), &Entity::new(8), &mut out);

        assert!(sync.peer(other).is_some());
        assert!(out.is_empty());
    }

    #[test]
    fn move_from_unknown_peer_creates_it() {
        let (mut sync, _, mut out) = joined();

        let other = PeerId::new_v4();
        for x in [5.0, 6.0] {
            let packet = client::Packet::Move(Envelope { id: other, entity: snapshot_at(x, 0.0) });
            sync.handle(server::Packet::Peer(packet), &Entity::new(8), &mut out);
        }

        assert_eq!(sync.peers().len(), 1);
        assert_eq!(sync.peer(other).map(|e| e.position.x), Some(6.0), "last writer wins");
    }

    #[test]
    fn leave_removes_peer() {
        let (mut sync, _, mut out) = joined();

        let other = PeerId::new_v4();
        let show = client::Packet::Show(Envelope { id: other, entity: snapshot_at(0.0, 0.0) });
        sync.handle(server::Packet::Peer(show), &Entity::new(8), &mut out);
        sync.handle(server::Packet::Leave(other), &Entity::new(8), &mut out);

        assert!(sync.peers().is_empty());
    }

    #[test]
    fn echoes_of_ourselves_are_ignored() {
        let (mut sync, id, mut out) = joined();

        let echo = client::Packet::Move(Envelope { id, entity: snapshot_at(0.0, 0.0) });
        sync.handle(server::Packet::Peer(echo), &Entity::new(8), &mut out);

        assert!(sync.peers().is_empty());
    }

    #[test]
    fn moves_only_go_out_on_change() {
        let (mut sync, _, mut out) = joined();
        out.clear();

        let mut local = Entity::new(8);
        let start = local.position;
        local.position.x += 4.0;

        assert!(sync.emit_if_moved(start, &local, &mut out));
        assert!(!sync.emit_if_moved(local.position, &local, &mut out));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn nothing_is_sent_before_init() {
        let mut sync = NetworkSync::new();
        let mut out: Vec<client::Packet> = Vec::new();
        let mut local = Entity::new(8);
        local.position.x = 100.0;

        assert!(!sync.emit_if_moved(Point2D::origin(), &local, &mut out));
        assert!(out.is_empty());
    }
}
