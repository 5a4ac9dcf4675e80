use thiserror::Error;

use crate::camera::{Camera, Follow};
use crate::entity::Player;
use crate::input::InputState;
use crate::math::saturating_i32;
use crate::math::units::{screen, world};
use crate::network::server;
use crate::physics::Physics;
use crate::render::{self, Renderer, PEER_COLOR, PLAYER_COLOR};
use crate::sync::{NetworkSync, Outbound};
use crate::world::{TileId, World};
use crate::TILE_SIZE;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("map has no spawn tile")]
    NoSpawn,
}

/// One client's view of the shared world.
pub struct Game {
    pub world: World,
    pub player: Player,
    pub camera: Camera,
    pub sync: NetworkSync,
    pub physics: Physics,
    ticks: u64,
}

impl Game {
    pub fn new(world: World, physics: Physics, follow: Follow) -> Result<Self, GameError> {
        let spawn = world.spawn().ok_or(GameError::NoSpawn)?;
        let position = (spawn.to_f32() * TILE_SIZE).cast_unit();

        let player = Player::at(position);
        let mut camera = Camera::new(follow);
        camera.position = player.entity.center();

        Ok(Self {
            world,
            player,
            camera,
            sync: NetworkSync::new(),
            physics,
            ticks: 0,
        })
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one frame: network inbox, physics, camera, then a move packet if
    /// the player ended up somewhere new.
    pub fn update<I, O>(&mut self, input: &InputState, inbox: I, out: &mut O)
    where
        I: IntoIterator<Item = server::Packet>,
        O: Outbound,
    {
        for packet in inbox {
            self.sync.handle(packet, &self.player.entity, out);
        }

        let previous = self.player.entity.position;

        self.physics.tick(&self.world, &mut self.player, input);
        self.camera.follow(&self.player.entity);

        self.sync.emit_if_moved(previous, &self.player.entity, out);

        self.ticks += 1;
    }

    /// Tile under a screen position, for pointer queries.
    pub fn tile_at(&self, point: screen::Point2D, screen_size: screen::Size2D) -> (world::Point2D, TileId) {
        let position = self.camera.to_world(point, screen_size);
        let tile = saturating_i32((position / TILE_SIZE).floor());
        (position, self.world.read(tile.x, tile.y))
    }

    pub fn draw<R: Renderer>(&self, renderer: &mut R, screen_size: screen::Size2D) -> Result<(), R::Error> {
        render::draw_world(renderer, &self.world, &self.camera, screen_size)?;

        for peer in self.sync.peers().values() {
            render::draw_entity(renderer, peer, &self.camera, screen_size, PEER_COLOR)?;
        }

        render::draw_entity(renderer, &self.player.entity, &self.camera, screen_size, PLAYER_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{client, Envelope, PeerId};
    use crate::render::tests::Recorder;
    use crate::world::Tile;

    fn game(map: &str) -> Game {
        Game::new(World::parse(map).unwrap(), Physics::default(), Follow::default()).unwrap()
    }

    #[test]
    fn spawns_on_marker() {
        let game = game("_*\n##");
        assert_eq!(game.player.entity.position, world::Point2D::new(64.0, 0.0));
    }

    #[test]
    fn needs_a_spawn() {
        let world = World::parse("__\n##").unwrap();
        let result = Game::new(world, Physics::default(), Follow::default());
        assert!(matches!(result, Err(GameError::NoSpawn)));
    }

    #[test]
    fn draws_world_then_peers_then_player() {
        let mut game = game("*_\n##");
        let mut out: Vec<client::Packet> = Vec::new();
        let peer = PeerId::new_v4();
        let show = client::Packet::Show(Envelope { id: peer, entity: game.player.entity.snapshot() });

        game.update(&InputState::default(), [server::Packet::Peer(show)], &mut out);

        let mut recorder = Recorder::default();
        game.draw(&mut recorder, screen::Size2D::new(1280.0, 720.0)).unwrap();

        let colors: Vec<_> = recorder.calls.iter().map(|(_, _, color)| *color).collect();
        assert_eq!(colors.len(), 4 + 2);
        assert_eq!(colors[4], PEER_COLOR);
        assert_eq!(colors[5], PLAYER_COLOR);
    }

    #[test]
    fn pointer_lookup() {
        let game = game("*_\n##");
        let screen_size = screen::Size2D::new(640.0, 480.0);

        let below = game.camera.to_screen(world::Point2D::new(10.0, 70.0), screen_size);
        let (_, id) = game.tile_at(below, screen_size);
        assert_eq!(id, Tile::Solid.id());
    }

    #[test]
    fn pointer_far_outside_the_map_is_empty() {
        let mut game = game("*_\n##");
        game.camera.position = world::Point2D::new(-1e12, 1e12);

        let (_, id) = game.tile_at(screen::Point2D::new(5.0, 5.0), screen::Size2D::new(640.0, 480.0));
        assert_eq!(id, Tile::Empty.id());
    }
}
