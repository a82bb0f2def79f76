use crate::config::Config;
use crate::model::{WeatherModel, WeatherSample};
use crate::sink::{EventSink, SinkConnector, SinkError};
use chrono::Utc;
use tokio::time::sleep;

/// Sample buffer flushed as a single transactional insert once it
/// reaches the configured threshold.
struct Batch {
    rows: Vec<WeatherSample>,
    threshold: usize,
}

impl Batch {
    fn new(threshold: usize) -> Self {
        Self {
            rows: Vec::with_capacity(threshold),
            threshold: threshold.max(1),
        }
    }

    fn push(&mut self, row: WeatherSample) {
        self.rows.push(row);
    }

    fn is_full(&self) -> bool {
        self.rows.len() >= self.threshold
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn rows(&self) -> &[WeatherSample] {
        &self.rows
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}

/// The Connected half of the loop: one sink connection plus the batch
/// being accumulated on it. Dropping the session releases the
/// connection and discards whatever was still buffered.
struct Session<S: EventSink> {
    sink: S,
    batch: Batch,
}

impl<S: EventSink> Session<S> {
    fn new(sink: S, batch_size: usize) -> Self {
        Self {
            sink,
            batch: Batch::new(batch_size),
        }
    }

    fn buffered(&self) -> usize {
        self.batch.len()
    }

    /// Buffer one sample, flushing the whole batch in one transaction
    /// when the threshold is reached. An error leaves the batch with
    /// the caller to abandon: delivery is at-most-once by contract.
    async fn tick(&mut self, sample: WeatherSample) -> Result<(), SinkError> {
        self.batch.push(sample);
        if self.batch.is_full() {
            let len = self.batch.len();
            self.sink.insert_batch(self.batch.rows()).await?;
            self.batch.clear();
            tracing::debug!(rows = len, "flushed batch");
        }
        Ok(())
    }
}

/// Drive the model forever: Disconnected -> Connected -> per-tick
/// sample/buffer/flush -> back to Disconnected on any sink error.
///
/// Connect and write failures are handled identically: the connection
/// and any unflushed samples are abandoned, the failure is logged and
/// the loop reconnects after `reconnect_backoff`. Retries are
/// unbounded; the only way out of this function is process
/// termination.
pub async fn run<C: SinkConnector>(
    config: Config,
    mut model: WeatherModel,
    connector: C,
) -> anyhow::Result<()> {
    loop {
        let sink = match connector.connect().await {
            Ok(sink) => sink,
            Err(err) => {
                tracing::warn!(error = %err, "sink connect failed; retrying");
                sleep(config.reconnect_backoff()).await;
                continue;
            }
        };
        tracing::info!(
            host = %config.db_host,
            port = config.db_port,
            db = %config.db_name,
            "connected; inserting events"
        );

        let mut session = Session::new(sink, config.batch_size);
        loop {
            let sample = model.sample(Utc::now(), &config.station_id);
            if let Err(err) = session.tick(sample).await {
                tracing::warn!(
                    error = %err,
                    dropped = session.buffered(),
                    "sink write failed; dropping batch and reconnecting"
                );
                break;
            }
            sleep(config.period()).await;
        }

        drop(session);
        sleep(config.reconnect_backoff()).await;
    }
}
