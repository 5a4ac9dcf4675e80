use std::net::SocketAddr;

use ledge::network::client::Packet;
use ledge::network::NetworkError;
use ledge::sync::Outbound;
use message_io::events::EventReceiver;
use message_io::network::{Endpoint, Transport};
use message_io::node::{self, NodeHandler, NodeTask, StoredNodeEvent};

pub struct Network {
    pub handler: NodeHandler<()>,
    pub receiver: EventReceiver<StoredNodeEvent<()>>,
    pub endpoint: Endpoint,

    #[allow(dead_code)] // RAII
    task: NodeTask,
}

impl Network {
    pub fn connect(server: &str) -> Result<Self, NetworkError> {
        let server_addr: SocketAddr = server.parse().map_err(|_| NetworkError::Address(server.to_owned()))?;

        let (handler, listener) = node::split::<()>();

        let (endpoint, server_addr) = handler
            .network()
            .connect(Transport::FramedTcp, server_addr)
            .map_err(|_| NetworkError::Connect)?;
        log::info!("Connecting to {}", server_addr);

        let (task, receiver) = listener.enqueue();

        Ok(Self {
            handler,
            task,
            receiver,
            endpoint,
        })
    }

    pub fn stop(&self) {
        self.handler.stop();
    }
}

impl Outbound for Network {
    fn send(&mut self, packet: &Packet) {
        match ledge::network::encode(packet) {
            Ok(bytes) => {
                self.handler.network().send(self.endpoint, &bytes);
            }
            Err(e) => log::error!("Dropping {}: {e}", packet.name()),
        }
    }
}
