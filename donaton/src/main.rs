//! Startup of the DonatonUIS backend services

use donaton::{App, AppConfig, error::Error};
use tracing_subscriber::{EnvFilter, prelude::*};

fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = App::new(AppConfig::from_env()?);
    app.verify()?;

    for name in app.container().bound_names() {
        tracing::info!("bound {name}");
    }
    Ok(())
}
