mod config;
mod network;
mod painter;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use ggez::conf::{WindowMode, WindowSetup};
use ggez::event::{self, EventHandler, MouseButton};
use ggez::graphics::{Canvas, Color, DrawParam, Text};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{Context, ContextBuilder, GameResult};
use ledge::game::Game;
use ledge::input::{InputEvent, InputState, Key};
use ledge::math::units::screen;
use ledge::world::{Tile, World, DEFAULT_MAP};
use message_io::node::StoredNetEvent;

use crate::config::Config;
use crate::network::Network;
use crate::painter::Painter;

fn main() -> Result<()> {
    env_logger::init();

    let mut cb = ContextBuilder::new("ledge", "tylian")
        .window_setup(WindowSetup::default().title("Ledge").vsync(true))
        .window_mode(WindowMode::default().dimensions(1280.0, 720.0).resizable(true));

    if let Ok(runtime) = std::env::var("RUNTIME_PATH") {
        let runtime = PathBuf::from(runtime).join("client");
        log::info!("Setting runtime to {}", runtime.display());
        std::env::set_current_dir(&runtime).with_context(|| format!("enter {}", runtime.display()))?;
        cb = cb.add_resource_path(runtime.join("resources"));
    }

    let config = Config::load().context("load config")?;

    let world = match &config.map {
        Some(path) => World::load(path).with_context(|| format!("load map {}", path.display()))?,
        None => World::parse(DEFAULT_MAP).context("parse built-in map")?,
    };

    let game = Game::new(world, config.physics, config.camera).context("create game")?;
    let network = Network::connect(&config.server).context("connect to relay")?;

    let (ctx, event_loop) = cb.build().context("create window")?;

    let handler = GameHandler::new(game, network);
    event::run(ctx, event_loop, handler)
}

struct GameHandler {
    game: Game,
    network: Network,
    input: InputState,
}

impl GameHandler {
    fn new(game: Game, network: Network) -> Self {
        Self {
            game,
            network,
            input: InputState::default(),
        }
    }

    fn screen_size(ctx: &Context) -> screen::Size2D {
        screen::Size2D::from(ctx.gfx.drawable_size())
    }

    fn update_network(&mut self, ctx: &mut Context) -> Vec<ledge::network::server::Packet> {
        let mut inbox = Vec::new();

        while let Some(event) = self.network.receiver.try_receive() {
            match event.network() {
                StoredNetEvent::Connected(_, established) => {
                    if established {
                        log::info!("Connected to relay");
                    } else {
                        log::error!("Could not reach the relay");
                        ctx.request_quit();
                    }
                }
                StoredNetEvent::Accepted(_, _) => unreachable!(),
                StoredNetEvent::Message(_, bytes) => match ledge::network::decode(&bytes) {
                    Ok(packet) => inbox.push(packet),
                    Err(e) => log::error!("Error parsing packet {:?}", e),
                },
                StoredNetEvent::Disconnected(_) => {
                    log::error!("Lost connection to the relay");
                    self.game.sync.clear();
                    ctx.request_quit();
                }
            }
        }

        inbox
    }

    fn update_pointer(&mut self, ctx: &Context) {
        let screen_size = Self::screen_size(ctx);

        for click in self.input.take_clicks() {
            let (position, id) = self.game.tile_at(click, screen_size);
            let tile = Tile::from_id(id).unwrap_or(Tile::Empty);
            log::debug!("Clicked x: {} y: {} ({tile})", position.x, position.y);
        }
    }
}

fn bind(keycode: KeyCode) -> Option<Key> {
    match keycode {
        KeyCode::W | KeyCode::Up | KeyCode::Space => Some(Key::Jump),
        KeyCode::S | KeyCode::Down => Some(Key::Crouch),
        KeyCode::A | KeyCode::Left => Some(Key::Left),
        KeyCode::D | KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

impl EventHandler for GameHandler {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        let inbox = self.update_network(ctx);
        self.update_pointer(ctx);
        self.game.update(&self.input, inbox, &mut self.network);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let screen_size = Self::screen_size(ctx);
        let mut canvas = Canvas::from_frame(ctx, Color::from_rgb(0xdf, 0xe6, 0xf5));

        self.game.draw(&mut Painter::new(&ctx.gfx, &mut canvas), screen_size)?;

        let player = &self.game.player.entity;
        let mut debug_lines = Text::new(format!("FPS: {:.02}\n", ctx.time.fps()));
        debug_lines.add(format!("Position: {:0.2?}  State: {}\n", player.position, player.pose()));
        debug_lines.add(format!("Velocity: {:.02?}  Peers: {}", player.velocity, self.game.sync.peers().len()));

        canvas.draw(&debug_lines, DrawParam::from([8.0, 8.0]).color(Color::BLACK));

        canvas.finish(ctx)
    }

    fn key_down_event(&mut self, _ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        // Override default so esc doesn't close game
        if let Some(key) = input.keycode.and_then(bind) {
            self.input.handle(InputEvent::KeyDown(key));
        }
        Ok(())
    }

    fn key_up_event(&mut self, _ctx: &mut Context, input: KeyInput) -> GameResult {
        if let Some(key) = input.keycode.and_then(bind) {
            self.input.handle(InputEvent::KeyUp(key));
        }
        Ok(())
    }

    fn mouse_button_down_event(&mut self, _ctx: &mut Context, button: MouseButton, x: f32, y: f32) -> GameResult {
        if button == MouseButton::Left {
            self.input.handle(InputEvent::Click(screen::Point2D::new(x, y)));
        }
        Ok(())
    }

    fn quit_event(&mut self, _ctx: &mut Context) -> GameResult<bool> {
        log::info!("Goodbye!");
        self.network.stop();
        Ok(false)
    }
}
