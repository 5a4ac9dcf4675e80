use serde::{Deserialize, Serialize};

use crate::entity::{Entity, MovementState, Player};
use crate::input::{InputState, Key};
use crate::math::saturating_i32;
use crate::math::units::world::*;
use crate::world::{Tile, TileId, World};
use crate::{FRICTION, GRAVITY, SLIDE_BOOST, TILE_SIZE, WALK_THRESHOLD};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn of_vector(self, vector: Vector2D) -> f32 {
        match self {
            Axis::X => vector.x,
            Axis::Y => vector.y,
        }
    }

    fn of_point(self, point: Point2D) -> f32 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }

    fn of_size(self, size: Size2D) -> f32 {
        match self {
            Axis::X => size.width,
            Axis::Y => size.height,
        }
    }

    fn set_vector(self, vector: &mut Vector2D, value: f32) {
        match self {
            Axis::X => vector.x = value,
            Axis::Y => vector.y = value,
        }
    }

    fn set_point(self, point: &mut Point2D, value: f32) {
        match self {
            Axis::X => point.x = value,
            Axis::Y => point.y = value,
        }
    }
}

/// Result of resolving one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    /// A downward collision happened.
    pub grounded: bool,
    /// Highest tile id touched by a downward collision.
    pub standing_on: Option<TileId>,
    /// Tile whose correction was applied.
    pub tile: Option<TileId>,
}

/// Tunables for a tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub gravity: f32,
    pub friction: f32,
    pub slide_boost: f32,
    pub walk_threshold: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            slide_boost: SLIDE_BOOST,
            walk_threshold: WALK_THRESHOLD,
        }
    }
}

impl Physics {
    /// Advances the player by one frame.
    ///
    /// The vertical axis is integrated and resolved first, so that the
    /// grounded flag is already up to date when crouching is decided.
    pub fn tick(&self, world: &World, player: &mut Player, input: &InputState) {
        let jump_power = player.jump_power;
        let body = &mut player.entity;

        body.velocity.y += self.gravity;

        if input.is_held(Key::Jump) && body.grounded {
            body.velocity.y = -jump_power;
            if player.standing_on == Tile::Boost.id() {
                body.velocity.y -= jump_power / 4.0;
            }
        }

        body.grounded = false;
        body.position.y += body.velocity.y;

        let contact = resolve_collisions(world, body, Axis::Y);
        if let Some(id) = contact.standing_on {
            player.standing_on = id;
        }

        player.crouching = input.is_held(Key::Crouch) && body.grounded;

        let mut delta = player.move_power;
        if player.crouching {
            body.state = match body.state {
                MovementState::Walking => {
                    delta *= self.slide_boost;
                    MovementState::Sliding
                }
                MovementState::Sliding => {
                    delta = 0.0;
                    MovementState::Sliding
                }
                _ => {
                    delta = 0.0;
                    MovementState::Crouching
                }
            };
        } else {
            body.state = MovementState::Idle;
        }

        if input.is_held(Key::Right) {
            body.velocity.x += delta;
        }
        if input.is_held(Key::Left) {
            body.velocity.x -= delta;
        }

        body.position.x += body.velocity.x;

        let friction = if matches!(body.state, MovementState::Sliding | MovementState::Crouching) {
            self.friction * 0.5
        } else {
            self.friction
        };
        body.velocity.x *= 1.0 - friction;

        resolve_collisions(world, body, Axis::X);

        let ducking = matches!(body.state, MovementState::Sliding | MovementState::Crouching);
        if !ducking && body.velocity.x.abs() > self.walk_threshold {
            body.state = MovementState::Walking;
        }

        body.position = body.position.round();
    }
}

/// Pushes `entity` out of any solid tile around it along `axis`.
///
/// Only the 3x3 tiles around the entity's tile are checked, x-major. When
/// more than one tile overlaps, the last one scanned decides the correction.
/// Velocity along the axis is zeroed, or reversed on a bounce tile.
pub fn resolve_collisions(world: &World, entity: &mut Entity, axis: Axis) -> Contact {
    let speed = axis.of_vector(entity.velocity);
    let extent = axis.of_size(entity.size);
    let middle = saturating_i32((entity.position / TILE_SIZE).round());

    let mut contact = Contact::default();
    let mut correction = None;

    for x in middle.x.saturating_sub(1)..=middle.x.saturating_add(1) {
        for y in middle.y.saturating_sub(1)..=middle.y.saturating_add(1) {
            let id = world.read(x, y);
            if !World::is_solid(id) {
                continue;
            }

            let tile = World::tile_box(x, y);
            if !entity.is_touching(&tile) {
                continue;
            }

            if speed > 0.0 {
                correction = Some((axis.of_point(tile.min) - extent, id));

                if axis == Axis::Y {
                    contact.grounded = true;
                    contact.standing_on = Some(contact.standing_on.map_or(id, |current| current.max(id)));
                }
            } else if speed < 0.0 {
                correction = Some((axis.of_point(tile.max), id));
            }
        }
    }

    if let Some((edge, id)) = correction {
        axis.set_point(&mut entity.position, edge);

        let rebound = if id == Tile::Bounce.id() { -speed } else { 0.0 };
        axis.set_vector(&mut entity.velocity, rebound);

        contact.tile = Some(id);
    }

    if contact.grounded {
        entity.grounded = true;
    }

    contact
}
