use std::path::Path;
use std::str::FromStr;

use ndarray::Array2;
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

use crate::math::units::{tile, world};
use crate::render::Color;
use crate::TILE_SIZE;

pub type TileId = i32;

/// Rounding flags for the four corners of a tile, `true` meaning rounded.
pub type Corners = [bool; 4];

/// Built-in map, used when no map file is configured.
pub const DEFAULT_MAP: &str = "\
*_________________
####__######____##
#____#######____##
############____##";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Tile {
    Spawn,
    Empty,
    Solid,
    Bounce,
    Boost,
}

impl Tile {
    pub const fn id(self) -> TileId {
        match self {
            Tile::Spawn => -1,
            Tile::Empty => 0,
            Tile::Solid => 1,
            Tile::Bounce => 2,
            Tile::Boost => 3,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Tile::Spawn => '*',
            Tile::Empty => '_',
            Tile::Solid => '#',
            Tile::Bounce => '=',
            Tile::Boost => '%',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::iter().find(|tile| tile.symbol() == symbol)
    }

    pub fn from_id(id: TileId) -> Option<Self> {
        Self::iter().find(|tile| tile.id() == id)
    }

    pub const fn color(self) -> Color {
        match self {
            Tile::Spawn | Tile::Empty => Color::from_hex(0xdfe6f5),
            Tile::Solid => Color::from_hex(0x08173f),
            Tile::Bounce => Color::from_hex(0xffd900),
            Tile::Boost => Color::from_hex(0xff2040),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
#[repr(usize)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("map is empty")]
    Empty,
    #[error("row {row} is {found} tiles wide, expected {expected} (maps must be rectangular)")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown tile {symbol:?} at x: {x} y: {y}")]
    UnknownTile { symbol: char, x: usize, y: usize },
    #[error("could not read map file")]
    Io(#[from] std::io::Error),
}

/// An immutable tile grid.
///
/// Tiles are stored row-major, so `grid[[y, x]]` lives at `y * width + x` in
/// the backing storage.
#[derive(Clone, Debug)]
pub struct World {
    size: tile::Size2D,
    grid: Array2<TileId>,
    corners: Array2<Corners>,
    spawn: Option<tile::Point2D>,
}

impl World {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(map: &str) -> Result<Self, WorldError> {
        let rows: Vec<&str> = map
            .trim_matches(|c| c == '\n' || c == '\r')
            .lines()
            .map(|row| row.trim_end_matches('\r'))
            .collect();

        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(WorldError::Empty);
        }

        let height = rows.len();
        let mut grid = Array2::zeros((height, width));
        let mut spawn = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(WorldError::Ragged { row: y, expected: width, found });
            }

            for (x, symbol) in row.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(WorldError::UnknownTile { symbol, x, y })?;
                grid[[y, x]] = tile.id();

                if tile == Tile::Spawn {
                    if let Some(previous) = spawn.replace(tile::Point2D::new(x as i32, y as i32)) {
                        log::warn!("Map has more than one spawn, ignoring the one at {:?}", previous);
                    }
                }
            }
        }

        let mut world = Self {
            size: tile::Size2D::new(width as i32, height as i32),
            grid,
            corners: Array2::from_elem((height, width), [false; 4]),
            spawn,
        };
        world.smooth_corners();

        Ok(world)
    }

    pub fn size(&self) -> tile::Size2D {
        self.size
    }

    /// Size of the whole map in world units.
    pub fn world_size(&self) -> world::Size2D {
        (self.size.to_f32() * TILE_SIZE).cast_unit()
    }

    /// Where the spawn marker is, if the map had one.
    pub fn spawn(&self) -> Option<tile::Point2D> {
        self.spawn
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size.width && y < self.size.height
    }

    /// Reads a tile, anything outside the map is [`Tile::Empty`].
    pub fn read(&self, x: i32, y: i32) -> TileId {
        if !self.contains(x, y) {
            return Tile::Empty.id();
        }
        self.grid[[y as usize, x as usize]]
    }

    pub fn is_solid(id: TileId) -> bool {
        id > 0
    }

    pub fn corners(&self, x: i32, y: i32) -> Corners {
        if !self.contains(x, y) {
            return [false; 4];
        }
        self.corners[[y as usize, x as usize]]
    }

    pub fn grid(&self) -> &Array2<TileId> {
        &self.grid
    }

    /// World-space box covering a tile.
    pub fn tile_box(x: i32, y: i32) -> world::Box2D {
        let origin = world::Point2D::new(x as f32, y as f32) * TILE_SIZE;
        world::Box2D::from_origin_and_size(origin, world::Size2D::splat(TILE_SIZE))
    }

    /// Iterates every tile as `(position, id, corners)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (tile::Point2D, TileId, Corners)> + '_ {
        self.grid
            .indexed_iter()
            .map(|((y, x), &id)| (tile::Point2D::new(x as i32, y as i32), id, self.corners[[y, x]]))
    }

    fn sharpen(&mut self, x: i32, y: i32, corner: Corner) {
        if !self.contains(x, y) {
            return;
        }
        self.corners[[y as usize, x as usize]][corner as usize] = false;
    }

    // Neighbours on the left and above have already been visited, so each
    // shared edge gets sharpened on both tiles exactly once.
    fn smooth_corners(&mut self) {
        use Corner::*;

        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let id = self.read(x, y);
                if id < 0 {
                    continue;
                }

                let solid = Self::is_solid(id);
                self.corners[[y as usize, x as usize]] = [true; 4];

                if solid == Self::is_solid(self.read(x - 1, y)) {
                    self.sharpen(x, y, TopLeft);
                    self.sharpen(x, y, BottomLeft);
                    self.sharpen(x - 1, y, TopRight);
                    self.sharpen(x - 1, y, BottomRight);
                }

                if solid == Self::is_solid(self.read(x, y - 1)) {
                    self.sharpen(x, y, TopLeft);
                    self.sharpen(x, y, TopRight);
                    self.sharpen(x, y - 1, BottomRight);
                    self.sharpen(x, y - 1, BottomLeft);
                }

                if !solid && x == self.size.width - 1 {
                    self.sharpen(x, y, TopRight);
                    self.sharpen(x, y, BottomRight);
                }

                if !solid && y == self.size.height - 1 {
                    self.sharpen(x, y, BottomRight);
                    self.sharpen(x, y, BottomLeft);
                }
            }
        }
    }
}

impl FromStr for World {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
