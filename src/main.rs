use std::{env, error::Error};

use tokio::{fs, net, signal};
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

use company_logs::{db, server, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing `.env` is fine, the variables may come from the environment.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = fs::read_to_string("config.toml").await?;
    let config = toml::from_str::<Config>(&config)?
        .with_env_overrides(|name| env::var(name).ok());

    let store = db::connect(config.db)?;
    tracing::info!(endpoint = %store.endpoint(), "using remote store");

    let app = server::router(server::AppState::new(store))
        .layer(server::cors(&config.http.cors)?);

    let listener = net::TcpListener::bind(config.http.server.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown");
            }
        })
        .await?;

    Ok(())
}
