use serde::{Deserialize, Serialize};
use strum::Display;

use crate::math::units::world::*;
use crate::math::VectorExt;
use crate::network::Snapshot;
use crate::world::{Tile, TileId};
use crate::{ENTITY_HEIGHT, ENTITY_WIDTH, JUMP_POWER, MOVE_POWER, PLAYER_HEALTH};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    Sliding,
    Crouching,
    Jumping,
}

/// A simulated body. Local players wrap one in [`Player`], remote peers are
/// bare entities updated from the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub position: Point2D,
    pub velocity: Vector2D,
    pub size: Size2D,
    pub health: u32,
    pub state: MovementState,
    pub grounded: bool,
}

impl Entity {
    pub fn new(health: u32) -> Self {
        Self {
            position: Point2D::origin(),
            velocity: Vector2D::zero(),
            size: Size2D::new(ENTITY_WIDTH, ENTITY_HEIGHT),
            health,
            state: MovementState::Idle,
            grounded: false,
        }
    }

    pub fn bounds(&self) -> Box2D {
        Box2D::from_origin_and_size(self.position, self.size)
    }

    pub fn center(&self) -> Point2D {
        self.position.translate(self.size.to_vector().halve())
    }

    /// Strict overlap, boxes that only share an edge are not touching.
    pub fn is_touching(&self, other: &Box2D) -> bool {
        self.bounds().intersects(other)
    }

    /// What to show for this entity. Anything airborne is jumping, the
    /// stored state keeps whatever the ground logic last decided.
    pub fn pose(&self) -> MovementState {
        if self.grounded {
            self.state
        } else {
            MovementState::Jumping
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            velocity: self.velocity,
            size: self.size,
            health: self.health,
            state: self.pose(),
        }
    }

    pub fn apply(&mut self, snapshot: Snapshot) {
        self.position = snapshot.position;
        self.velocity = snapshot.velocity;
        self.size = snapshot.size;
        self.health = snapshot.health;
        self.grounded = snapshot.state != MovementState::Jumping;
        self.state = snapshot.state;
    }
}

impl From<Snapshot> for Entity {
    fn from(snapshot: Snapshot) -> Self {
        let mut entity = Entity::new(snapshot.health);
        entity.apply(snapshot);
        entity
    }
}

/// The locally controlled entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub entity: Entity,
    pub move_power: f32,
    pub jump_power: f32,
    pub crouching: bool,
    /// Tile the last grounding contact touched.
    pub standing_on: TileId,
}

impl Player {
    pub fn new() -> Self {
        Self {
            entity: Entity::new(PLAYER_HEALTH),
            move_power: MOVE_POWER,
            jump_power: JUMP_POWER,
            crouching: false,
            standing_on: Tile::Empty.id(),
        }
    }

    pub fn at(position: Point2D) -> Self {
        let mut player = Self::new();
        player.entity.position = position;
        player
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_needs_real_overlap() {
        let entity = Entity::new(1);
        let below = Box2D::from_origin_and_size(Point2D::new(0.0, 64.0), Size2D::splat(64.0));
        let overlapping = Box2D::from_origin_and_size(Point2D::new(0.0, 63.0), Size2D::splat(64.0));

        assert!(!entity.is_touching(&below), "sharing an edge is not touching");
        assert!(entity.is_touching(&overlapping));
    }

    #[test]
    fn center_is_half_the_size_in() {
        let mut entity = Entity::new(1);
        entity.position = Point2D::new(10.0, 20.0);
        assert_eq!(entity.center(), Point2D::new(26.0, 52.0));
    }

    #[test]
    fn snapshot_reports_airborne_as_jumping() {
        let mut entity = Entity::new(3);
        entity.state = MovementState::Walking;
        entity.grounded = false;
        assert_eq!(entity.snapshot().state, MovementState::Jumping);

        entity.grounded = true;
        assert_eq!(entity.snapshot().state, MovementState::Walking);
    }

    #[test]
    fn remote_entity_from_snapshot() {
        let mut local = Entity::new(5);
        local.position = Point2D::new(128.0, 64.0);
        local.grounded = true;

        let remote = Entity::from(local.snapshot());
        assert_eq!(remote.position, local.position);
        assert_eq!(remote.health, 5);
        assert!(remote.grounded);
    }
}
