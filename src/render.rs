//! Screen-space drawing passes.
//!
//! The core never touches pixels, it describes rounded rectangles in screen
//! coordinates and hands them to a [`Renderer`] supplied by the host.

use crate::camera::Camera;
use crate::entity::Entity;
use crate::math::units::{screen, world};
use crate::world::{Corners, Tile, World};
use crate::TILE_RADIUS;

pub const PLAYER_COLOR: Color = Color::from_hex(0x2d5ce1);
pub const PEER_COLOR: Color = Color::from_hex(0xfc6450);
pub const ENTITY_RADIUS: f32 = 8.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }
}

pub trait Renderer {
    type Error;

    /// Fills `rect` with `color`. `radii` is per corner, in the order
    /// top-left, top-right, bottom-right, bottom-left.
    fn fill_rounded_rect(&mut self, rect: screen::Rect, radii: [f32; 4], color: Color) -> Result<(), Self::Error>;
}

pub fn corner_radii(corners: Corners, radius: f32) -> [f32; 4] {
    corners.map(|rounded| if rounded { radius } else { 0.0 })
}

/// Draws every tile that lands on screen.
pub fn draw_world<R: Renderer>(
    renderer: &mut R,
    world: &World,
    camera: &Camera,
    screen_size: screen::Size2D,
) -> Result<(), R::Error> {
    let visible = screen::Rect::from_size(screen_size);

    for (position, id, corners) in world.tiles() {
        let tile = World::tile_box(position.x, position.y).to_rect();
        let rect = screen::Rect::new(camera.to_screen(tile.origin, screen_size), tile.size.cast_unit());
        if !rect.intersects(&visible) {
            continue;
        }

        let color = Tile::from_id(id).unwrap_or(Tile::Solid).color();
        renderer.fill_rounded_rect(rect, corner_radii(corners, TILE_RADIUS), color)?;
    }

    Ok(())
}

pub fn draw_entity<R: Renderer>(
    renderer: &mut R,
    entity: &Entity,
    camera: &Camera,
    screen_size: screen::Size2D,
    color: Color,
) -> Result<(), R::Error> {
    let origin = camera.to_screen(entity.position, screen_size);
    let size: world::Size2D = entity.size;
    let rect = screen::Rect::new(origin, size.cast_unit());

    renderer.fill_rounded_rect(rect, [ENTITY_RADIUS; 4], color)
}
