mod config;
mod network;

use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::WriteStyle;
use ledge::network::client::Packet as ClientPacket;
use ledge::network::NetworkError;
use ledge::relay::{Outgoing, Relay};
use log::LevelFilter;
use message_io::network::Endpoint;
use message_io::node::StoredNetEvent;

use crate::config::Config;
use crate::network::Network;

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .write_style(WriteStyle::Always)
        .init();

    #[cfg(not(debug_assertions))]
    env_logger::init();

    if let Ok(runtime) = std::env::var("RUNTIME_PATH") {
        let runtime = PathBuf::from(runtime).join("server");
        log::warn!("Setting runtime to {}", runtime.display());
        std::env::set_current_dir(&runtime).with_context(|| format!("enter {}", runtime.display()))?;
    }

    let server = RelayServer::new()?;
    server.run();
    Ok(())
}

struct RelayServer {
    network: Network,
    relay: Relay<Endpoint>,
}

impl RelayServer {
    fn new() -> Result<Self> {
        let config = Config::load().context("load config")?;
        let network = Network::listen(&config).context("start listening")?;

        Ok(Self {
            network,
            relay: Relay::new(),
        })
    }

    fn run(mut self) {
        loop {
            let event = self.network.receiver.receive();

            match event.network() {
                StoredNetEvent::Connected(_, _) => unreachable!(),
                StoredNetEvent::Accepted(endpoint, _listener) => {
                    let greeting = self.relay.connect(endpoint);
                    log::info!(
                        "Client ({}) connected (total clients: {})",
                        endpoint.addr(),
                        self.relay.len()
                    );
                    self.send(greeting);
                }
                StoredNetEvent::Message(endpoint, bytes) => {
                    if let Err(e) = self.handle_message(endpoint, &bytes) {
                        log::warn!(
                            "Disconnecting client ({}), message handler returned an error: {e}",
                            endpoint.addr(),
                        );
                        self.network.handler.network().remove(endpoint.resource_id());
                        self.handle_disconnect(endpoint, "invalid packet");
                    }
                }
                StoredNetEvent::Disconnected(endpoint) => {
                    self.handle_disconnect(endpoint, "connection closed");
                }
            }
        }
    }

    fn handle_message(&mut self, endpoint: Endpoint, bytes: &[u8]) -> Result<(), NetworkError> {
        let packet: ClientPacket = ledge::network::decode(bytes)?;

        match self.relay.forward(endpoint, packet) {
            Some(outgoing) => self.send(outgoing),
            None => log::warn!("Dropping {} from unknown client ({})", packet.name(), endpoint.addr()),
        }

        Ok(())
    }

    fn handle_disconnect(&mut self, endpoint: Endpoint, reason: &str) {
        let Some(leave) = self.relay.disconnect(endpoint) else {
            return;
        };

        log::info!(
            "Client ({}) disconnected (total clients: {}): {}",
            endpoint.addr(),
            self.relay.len(),
            reason
        );

        self.send(leave);
    }

    fn send(&mut self, outgoing: Outgoing<Endpoint>) {
        if let Err(e) = self.network.send_all(&outgoing.targets, &outgoing.packet) {
            log::error!("Could not send {:?}: {e}", outgoing.packet);
        }
    }
}

impl Drop for RelayServer {
    fn drop(&mut self) {
        self.network.stop();
    }
}
