use log::info;
use mock_rcon::{config::Config, logger, server::Server};
use std::error::Error;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load();
    logger::init(config.log_level)?;

    let server = Server::bind(config).await?;
    let handle = tokio::spawn(server.run());

    tokio::select!(
        _ = handle => {}
        _ = signal::ctrl_c() => {}
    );

    info!("bye");
    Ok(())
}
