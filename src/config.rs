use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub period_sec: f64,
    pub station_id: String,
    pub seed: u64,
    pub batch_size: usize,
    pub reconnect_backoff_sec: u64,
}

impl Config {
    /// Every option has a working default; a malformed value falls back
    /// to the default rather than aborting startup.
    pub fn from_env() -> Self {
        dotenv().ok();

        let db_host = env::var("DB_HOST").unwrap_or_else(|_| "app_db".to_string());
        let db_port = env::var("DB_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5432);
        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "appdb".to_string());
        let db_user = env::var("DB_USER").unwrap_or_else(|_| "appuser".to_string());
        let db_password = env::var("DB_PASSWORD").unwrap_or_else(|_| "apppassword".to_string());

        let period_sec = env::var("PERIOD_SEC")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(1.0);
        let station_id = env::var("STATION_ID").unwrap_or_else(|_| "AMS-01".to_string());
        let seed = env::var("SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(42);
        let batch_size = env::var("BATCH_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v != 0)
            .unwrap_or(10);
        let reconnect_backoff_sec = env::var("RECONNECT_BACKOFF_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3);

        Self {
            db_host,
            db_port,
            db_name,
            db_user,
            db_password,
            period_sec,
            station_id,
            seed,
            batch_size,
            reconnect_backoff_sec,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.period_sec)
    }

    pub fn reconnect_backoff(&self) -> Duration {
        Duration::from_secs(self.reconnect_backoff_sec)
    }
}
