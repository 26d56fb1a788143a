use anyhow::Result;
use log::error;
use crate::initialization::init;
use crate::routes::create_router;
use crate::server::serve;

mod config;
mod errors;
mod handlers;
mod initialization;
mod logging;
mod manager_forecast;
mod models;
mod routes;
mod server;
mod transformer;

#[tokio::main]
async fn main() -> Result<()> {
    // Without configuration and logging there is nowhere to report to but stderr
    let (config, state) = init()?;

    let router = create_router(state, config.server.cors);

    if let Err(e) = serve(&config.server, router).await {
        error!("server failed: {}", e);
        return Err(e)?;
    }

    Ok(())
}
