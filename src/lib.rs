pub mod camera;
pub mod entity;
pub mod game;
pub mod input;
pub mod math;
pub mod network;
pub mod physics;
pub mod relay;
pub mod render;
pub mod sync;
pub mod world;

pub const TILE_SIZE: f32 = 64.0;
pub const TILE_RADIUS: f32 = TILE_SIZE / 4.0;

pub const ENTITY_WIDTH: f32 = 32.0;
pub const ENTITY_HEIGHT: f32 = 64.0;
pub const PLAYER_HEALTH: u32 = 8;

pub const MOVE_POWER: f32 = 4.0;
pub const JUMP_POWER: f32 = 16.0;

// Tuned against a ~60hz frame callback, there is no fixed physics clock.
pub const GRAVITY: f32 = 2.0;
pub const FRICTION: f32 = 0.5;
pub const SLIDE_BOOST: f32 = 16.0;
pub const WALK_THRESHOLD: f32 = 1.0;

pub const CAMERA_SMOOTHING: f32 = 0.5;

pub const DEFAULT_PORT: u16 = 3042;
