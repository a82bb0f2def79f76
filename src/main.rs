mod config;
mod model;
mod pipeline;
mod sink;

use crate::config::Config;
use crate::model::WeatherModel;
use crate::sink::PgConnector;
use anyhow::Result;

fn init_tracing() -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,weathergen=info".into());
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing()?;

    tracing::info!(
        host = %config.db_host,
        port = config.db_port,
        db = %config.db_name,
        user = %config.db_user,
        station = %config.station_id,
        period_sec = config.period_sec,
        "starting weather generator"
    );

    let model = WeatherModel::new(config.seed);
    let connector = PgConnector::new(&config);

    tokio::select! {
        res = pipeline::run(config, model, connector) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
    }
}
