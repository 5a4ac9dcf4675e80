use std::net::SocketAddr;

use ledge::network::server::Packet;
use ledge::network::NetworkError;
use message_io::events::EventReceiver;
use message_io::network::{Endpoint, Transport};
use message_io::node::{self, NodeHandler, NodeTask, StoredNodeEvent};

use crate::config::Config;

pub struct Network {
    pub handler: NodeHandler<()>,
    pub receiver: EventReceiver<StoredNodeEvent<()>>,

    #[allow(dead_code)] // RAII
    task: NodeTask,
}

impl Network {
    pub fn listen(config: &Config) -> Result<Self, NetworkError> {
        let (handler, listener) = node::split::<()>();

        let server_addr: SocketAddr = config
            .listen
            .parse()
            .map_err(|_| NetworkError::Address(config.listen.clone()))?;
        let (_, server_addr) = handler
            .network()
            .listen(Transport::FramedTcp, server_addr)
            .map_err(|_| NetworkError::Listen)?;

        log::info!("Listening on {}", server_addr);

        let (task, receiver) = listener.enqueue();

        Ok(Self { handler, task, receiver })
    }

    pub fn stop(&self) {
        self.handler.stop();
    }

    /// Encodes `packet` once and sends it to every target.
    pub fn send_all(&mut self, targets: &[Endpoint], packet: &Packet) -> Result<(), NetworkError> {
        if targets.is_empty() {
            return Ok(());
        }

        let bytes = ledge::network::encode(packet)?;
        for &endpoint in targets {
            self.handler.network().send(endpoint, &bytes);
        }

        Ok(())
    }
}
