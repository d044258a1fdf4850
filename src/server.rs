use std::{net::SocketAddr, sync::Arc};

use log::{debug, error, info, warn};
use tokio::{
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

use crate::{
    config::Config,
    error::RconError,
    session::{Session, SessionEnd},
};

/// Threaded listener: every accepted connection gets its own [Session] task
/// writing commands to standard output.
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
}

impl Server {
    pub async fn bind(config: Config) -> Result<Self, RconError> {
        let listener = TcpListener::bind(config.addr())
            .await
            .map_err(RconError::BindError)?;

        Ok(Server {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RconError> {
        self.listener.local_addr().map_err(RconError::BindError)
    }

    /// Binds and serves in the background.
    pub async fn start(config: Config) -> Result<(SocketAddr, JoinHandle<()>), RconError> {
        let server = Server::bind(config).await?;
        let addr = server.local_addr()?;
        let handle = tokio::spawn(server.run());

        Ok((addr, handle))
    }

    pub async fn run(self) {
        match self.listener.local_addr() {
            Ok(addr) => info!("server running on {}", addr),
            Err(e) => warn!("server running on unknown address: {}", e),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let config = Arc::clone(&self.config);
                    tokio::spawn(Server::process(stream, addr, config));
                }
                Err(e) => error!("{}", RconError::AcceptError(e)),
            }
        }
    }

    async fn process(stream: TcpStream, addr: SocketAddr, config: Arc<Config>) {
        info!("accept from {:?}", addr);

        match Session::new(stream, std::io::stdout(), config).run().await {
            Ok(SessionEnd::PeerClosed) => info!("{} disconnected", addr),
            Ok(SessionEnd::SendFailed(e)) => debug!("{} gone, cannot reply: {}", addr, e),
            Err(e) => warn!("closing {}: {:?}", addr, e),
        }
    }
}
