use crate::config::Config;
use crate::model::WeatherSample;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to connect to sink: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to write batch: {0}")]
    Write(#[source] sqlx::Error),
}

/// A live connection to the event store. One batch insert is one
/// transaction; rows land in the order they are passed.
#[async_trait]
pub trait EventSink: Send {
    async fn insert_batch(&mut self, rows: &[WeatherSample]) -> Result<(), SinkError>;
}

/// Hands out fresh sink connections for the ingestion loop. A
/// connection is never reused across reconnects; the loop drops it and
/// asks for a new one.
#[async_trait]
pub trait SinkConnector: Send + Sync {
    type Sink: EventSink;

    async fn connect(&self) -> Result<Self::Sink, SinkError>;
}

pub struct PgSink {
    conn: PgConnection,
}

#[async_trait]
impl EventSink for PgSink {
    async fn insert_batch(&mut self, rows: &[WeatherSample]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self.conn.begin().await.map_err(SinkError::Write)?;
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO weather_events \
             (ts, station_id, temperature_c, humidity_pct, pressure_hpa, wind_speed_mps, wind_dir_deg) ",
        );
        builder.push_values(rows.iter(), |mut b, row| {
            b.push_bind(row.ts)
                .push_bind(&row.station_id)
                .push_bind(row.temperature_c)
                .push_bind(row.humidity_pct)
                .push_bind(row.pressure_hpa)
                .push_bind(row.wind_speed_mps)
                .push_bind(row.wind_dir_deg);
        });
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(SinkError::Write)?;
        tx.commit().await.map_err(SinkError::Write)?;
        Ok(())
    }
}

pub struct PgConnector {
    options: PgConnectOptions,
}

impl PgConnector {
    pub fn new(config: &Config) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .database(&config.db_name)
            .username(&config.db_user)
            .password(&config.db_password);
        Self { options }
    }
}

#[async_trait]
impl SinkConnector for PgConnector {
    type Sink = PgSink;

    async fn connect(&self) -> Result<PgSink, SinkError> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(SinkError::Connect)?;
        Ok(PgSink { conn })
    }
}
