use anyhow::Context;
use podcheck::configuration::get_configuration;
use podcheck::startup::run;
use podcheck::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("podcheck".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let settings = get_configuration().context("Failed to read configuration.")?;

    let address = format!("{}:{}", settings.app.host, settings.app.port);
    tracing::info!("Start server at {:?}", &address);
    let listener =
        TcpListener::bind(&address).with_context(|| format!("failed to bind to {}", address))?;

    run(listener, settings).await?.await?;
    Ok(())
}
